// 🔗 Canonicalizer - Raw URL → canonical dedup key
// Pure and total: never fails, unparseable input falls back to the trimmed string

use url::Url;

// ============================================================================
// LOOKUP TABLES
// ============================================================================

/// Query keys removed during canonicalization (compared case-insensitively)
pub const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "gclid",
    "fbclid",
    "mc_cid",
    "mc_eid",
    "igshid",
    "yclid",
    "_hsenc",
    "_hsmi",
    "mkt_tok",
    "ref",
    "cmp",
    "spm",
    "ved",
    "si",
    "s",
    "trk",
    "scid",
    "ck_subscriber_id",
];

const DEFAULT_PORTS: &[(&str, u16)] = &[("http", 80), ("https", 443)];

fn default_port(scheme: &str) -> Option<u16> {
    DEFAULT_PORTS
        .iter()
        .find(|(s, _)| *s == scheme)
        .map(|(_, port)| *port)
}

// ============================================================================
// CANONICALIZATION
// ============================================================================

/// Normalize a raw URL into its canonical dedup key
///
/// Rules:
/// - lower-case scheme and host
/// - drop default ports (80 for http, 443 for https)
/// - drop the fragment
/// - strip trailing `/` from non-root paths
/// - remove tracking query parameters, keep the rest in original order
///
/// URLs that fail to parse, or that have no host, come back trimmed but otherwise
/// untouched. `canonicalize(&canonicalize(u)) == canonicalize(u)` for every input.
pub fn canonicalize(raw_url: &str) -> String {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let parsed = match Url::parse(trimmed) {
        Ok(parsed) => parsed,
        Err(_) => return trimmed.to_string(),
    };

    let host = match parsed.host_str() {
        Some(host) if !host.is_empty() => host.to_lowercase(),
        _ => return trimmed.to_string(),
    };

    let scheme = parsed.scheme().to_lowercase();
    let mut canonical = format!("{}://{}", scheme, host);

    if let Some(port) = parsed.port() {
        if default_port(&scheme) != Some(port) {
            canonical.push(':');
            canonical.push_str(&port.to_string());
        }
    }

    canonical.push_str(strip_trailing_slash(parsed.path()));

    if let Some(query) = parsed.query() {
        let kept: Vec<&str> = query
            .split('&')
            .filter(|pair| !pair.is_empty() && !is_tracking_pair(pair))
            .collect();

        if !kept.is_empty() {
            canonical.push('?');
            canonical.push_str(&kept.join("&"));
        }
    }

    canonical
}

/// Repeated trailing slashes collapse too, otherwise `/a//` would need two passes
fn strip_trailing_slash(path: &str) -> &str {
    if path.len() <= 1 || !path.ends_with('/') {
        return path;
    }

    match path.trim_end_matches('/') {
        "" => "/",
        stripped => stripped,
    }
}

fn is_tracking_pair(pair: &str) -> bool {
    let raw_key = pair.split('=').next().unwrap_or(pair);
    let key = urlencoding::decode(raw_key)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw_key.to_string())
        .to_lowercase();

    TRACKING_PARAMS.contains(&key.as_str())
}

// ============================================================================
// HELPERS
// ============================================================================

/// Host component of a URL or canonical key (no port), lower-cased
///
/// Returns an empty string when there is no host.
pub fn domain_of(url: &str) -> String {
    Url::parse(url.trim())
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_lowercase))
        .unwrap_or_default()
}

/// Collapse whitespace runs to a single space and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_tracking_params_and_fragment() {
        assert_eq!(
            canonicalize("https://example.com/page?utm_source=email&id=123#section"),
            "https://example.com/page?id=123"
        );
    }

    #[test]
    fn test_default_port_and_case() {
        assert_eq!(
            canonicalize("https://EXAMPLE.com:443/Path/"),
            "https://example.com/Path"
        );
        assert_eq!(canonicalize("HTTP://Example.COM:80/a"), "http://example.com/a");
    }

    #[test]
    fn test_keeps_non_default_port() {
        assert_eq!(
            canonicalize("http://example.com:8080/x/"),
            "http://example.com:8080/x"
        );
        assert_eq!(
            canonicalize("https://example.com:80/"),
            "https://example.com:80/"
        );
    }

    #[test]
    fn test_root_path_is_kept() {
        assert_eq!(canonicalize("https://example.com/"), "https://example.com/");
        assert_eq!(canonicalize("https://example.com"), "https://example.com/");
    }

    #[test]
    fn test_query_order_preserved() {
        assert_eq!(
            canonicalize("https://a.com/s?z=1&fbclid=abc&a=2&REF=home&q"),
            "https://a.com/s?z=1&a=2&q"
        );
    }

    #[test]
    fn test_query_emptied_drops_question_mark() {
        assert_eq!(
            canonicalize("https://a.com/s?utm_medium=x&gclid=y"),
            "https://a.com/s"
        );
        assert_eq!(canonicalize("https://a.com/s?"), "https://a.com/s");
    }

    #[test]
    fn test_percent_encoded_tracking_key() {
        assert_eq!(
            canonicalize("https://a.com/?utm%5Fsource=x&id=1"),
            "https://a.com/?id=1"
        );
    }

    #[test]
    fn test_unparseable_falls_back_to_trimmed() {
        assert_eq!(canonicalize("  not a url  "), "not a url");
        assert_eq!(canonicalize("example.com/page/"), "example.com/page/");
        assert_eq!(canonicalize("mailto:someone@example.com"), "mailto:someone@example.com");
        assert_eq!(canonicalize(""), "");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "https://example.com/page?utm_source=email&id=123#section",
            "https://EXAMPLE.com:443/Path/",
            "http://a.com/x//",
            "HTTPS://Sub.Example.org:8443/a/b/?b=2&a=1&s=3",
            "ftp://Files.Example.com/pub/",
            "garbage",
            "javascript:void(0)",
        ];

        for input in inputs {
            let once = canonicalize(input);
            assert_eq!(canonicalize(&once), once, "not idempotent for {}", input);
        }
    }

    #[test]
    fn test_domain_of() {
        assert_eq!(domain_of("https://Example.com:8080/x"), "example.com");
        assert_eq!(domain_of("not a url"), "");
        assert_eq!(domain_of("mailto:a@b.com"), "");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  Rust \t\n  Book  "), "Rust Book");
        assert_eq!(normalize_whitespace(""), "");
    }
}

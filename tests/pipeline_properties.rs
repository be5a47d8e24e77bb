// Property tests for the canonicalize → group → merge → report pipeline

use bookmark_dedupe::report::compare_rows;
use bookmark_dedupe::{
    canonicalize, domain_of, merge_collections, BookmarkRecord, DeduplicationEngine,
    DedupeSettings,
};
use proptest::prelude::*;
use std::cmp::Ordering;

fn url_strategy() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["http", "https", "HTTP", "HtTpS"]),
        "[a-zA-Z]{1,6}",
        prop::sample::select(vec!["com", "org", "io"]),
        prop::option::of(prop::sample::select(vec![80u16, 443, 8080])),
        prop::collection::vec("[a-zA-Z0-9]{0,4}", 0..3),
        any::<bool>(),
        prop::collection::vec(
            (
                prop::sample::select(vec!["id", "q", "utm_source", "ref", "page", "S", "fbclid"]),
                "[a-z0-9]{0,3}",
            ),
            0..4,
        ),
        prop::option::of("[a-z]{0,4}"),
    )
        .prop_map(|(scheme, host, tld, port, segments, slash, query, fragment)| {
            let mut url = format!("{}://{}.{}", scheme, host, tld);
            if let Some(port) = port {
                url.push_str(&format!(":{}", port));
            }
            for segment in segments {
                url.push('/');
                url.push_str(&segment);
            }
            if slash {
                url.push('/');
            }
            if !query.is_empty() {
                let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                url.push('?');
                url.push_str(&pairs.join("&"));
            }
            if let Some(fragment) = fragment {
                url.push('#');
                url.push_str(&fragment);
            }
            url
        })
}

fn record_strategy() -> impl Strategy<Value = BookmarkRecord> {
    (
        url_strategy(),
        prop::sample::select(vec![
            "Rust",
            "Rust Book",
            "Rust Blog",
            "The Rust Programming Language",
            "Docs",
            "",
        ]),
        prop::sample::select(vec!["a.html", "b.json", "c.html"]),
    )
        .prop_map(|(url, title, source)| BookmarkRecord::new(url, title).with_source(source))
}

fn settings_strategy() -> impl Strategy<Value = DedupeSettings> {
    (any::<bool>(), 0u8..=100).prop_map(|(fuzzy_enabled, threshold)| DedupeSettings {
        fuzzy_enabled,
        threshold,
        max_fuzzy_comparisons: None,
    })
}

proptest! {
    #[test]
    fn canonicalize_is_idempotent(url in url_strategy()) {
        let once = canonicalize(&url);
        prop_assert_eq!(canonicalize(&once), once);
    }

    #[test]
    fn canonical_key_drops_fragment_and_tracking(url in url_strategy()) {
        let key = canonicalize(&url);
        prop_assert!(!key.contains('#'));
        prop_assert!(!key.contains("utm_source="));
        prop_assert!(!key.contains("fbclid="));
    }

    #[test]
    fn counts_are_conserved(
        records in prop::collection::vec(record_strategy(), 0..40),
        settings in settings_strategy(),
    ) {
        let total = records.len();
        let outcome = merge_collections(records, &settings).unwrap();

        let merged_total: usize = outcome.merged.iter().map(|m| m.count).sum();
        let report_total: usize = outcome.report.iter().map(|r| r.count).sum();

        prop_assert_eq!(merged_total, total);
        prop_assert_eq!(report_total, total);
        prop_assert_eq!(outcome.summary.duplicates_removed, total - outcome.merged.len());
    }

    #[test]
    fn pipeline_is_deterministic(
        records in prop::collection::vec(record_strategy(), 0..40),
        settings in settings_strategy(),
    ) {
        let first = merge_collections(records.clone(), &settings).unwrap();
        let second = merge_collections(records, &settings).unwrap();

        prop_assert_eq!(first.merged, second.merged);
        prop_assert_eq!(first.report, second.report);
    }

    #[test]
    fn groups_never_cross_domains(
        records in prop::collection::vec(record_strategy(), 0..40),
        threshold in 0u8..=100,
    ) {
        let engine = DeduplicationEngine::new(DedupeSettings {
            fuzzy_enabled: true,
            threshold,
            max_fuzzy_comparisons: None,
        })
        .unwrap();

        for group in engine.group(records) {
            for member in &group.members {
                prop_assert_eq!(domain_of(&canonicalize(&member.url)), group.domain.clone());
            }
        }
    }

    #[test]
    fn report_rows_strictly_ordered(
        records in prop::collection::vec(record_strategy(), 0..40),
        settings in settings_strategy(),
    ) {
        let outcome = merge_collections(records, &settings).unwrap();

        for pair in outcome.report.windows(2) {
            prop_assert_eq!(compare_rows(&pair[0], &pair[1]), Ordering::Less);
        }
    }
}

#[test]
fn identical_titles_on_different_domains_stay_apart() {
    let records = vec![
        BookmarkRecord::new("https://a.com/docs", "Docs"),
        BookmarkRecord::new("https://b.com/docs", "Docs"),
        BookmarkRecord::new("https://a.com/other", "Docs"),
    ];

    let outcome = merge_collections(
        records,
        &DedupeSettings {
            fuzzy_enabled: true,
            threshold: 0,
            max_fuzzy_comparisons: None,
        },
    )
    .unwrap();

    assert_eq!(outcome.merged.len(), 2);
    assert_eq!(outcome.merged[0].count, 2);
    assert_eq!(outcome.merged[0].folder_path, vec!["Merged", "a.com"]);
    assert_eq!(outcome.merged[1].folder_path, vec!["Merged", "b.com"]);
}

// 📤 Exporters - Merged bookmarks → Netscape HTML, report rows → CSV / JSON

use crate::models::{MergedBookmark, ReportRow};
use crate::report::MergeOutcome;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

// ============================================================================
// NETSCAPE HTML
// ============================================================================

const NETSCAPE_HEADER: &str = "<!DOCTYPE NETSCAPE-Bookmark-file-1>
<!-- This is an automatically generated file.
     It will be read and overwritten.
     DO NOT EDIT! -->
<META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks</H1>
<DL><p>
";

/// Render merged bookmarks as a Netscape bookmark file
///
/// Folders are sorted by path, bookmarks inside a folder by title (case-insensitive).
pub fn render_netscape_html(merged: &[MergedBookmark]) -> String {
    let mut folders: BTreeMap<Vec<String>, Vec<&MergedBookmark>> = BTreeMap::new();
    for bookmark in merged {
        folders
            .entry(bookmark.folder_path.clone())
            .or_default()
            .push(bookmark);
    }

    let mut out = String::from(NETSCAPE_HEADER);
    let mut open: Vec<String> = Vec::new();

    for (path, bookmarks) in folders.iter_mut() {
        bookmarks.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.url.cmp(&b.url))
        });

        let common = open
            .iter()
            .zip(path.iter())
            .take_while(|(a, b)| a == b)
            .count();

        while open.len() > common {
            open.pop();
            out.push_str(&indent(open.len() + 1));
            out.push_str("</DL><p>\n");
        }

        for name in &path[common..] {
            let depth = open.len() + 1;
            out.push_str(&format!("{}<DT><H3>{}</H3>\n", indent(depth), escape_html(name)));
            out.push_str(&format!("{}<DL><p>\n", indent(depth)));
            open.push(name.clone());
        }

        for bookmark in bookmarks.iter() {
            let add_date = bookmark
                .added_at
                .map(|added| format!(" ADD_DATE=\"{}\"", added.timestamp()))
                .unwrap_or_default();

            out.push_str(&format!(
                "{}<DT><A HREF=\"{}\"{}>{}</A>\n",
                indent(open.len() + 1),
                escape_html(&bookmark.url),
                add_date,
                escape_html(&bookmark.title)
            ));
        }
    }

    while !open.is_empty() {
        open.pop();
        out.push_str(&indent(open.len() + 1));
        out.push_str("</DL><p>\n");
    }

    out.push_str("</DL><p>\n");
    out
}

pub fn write_netscape_html(merged: &[MergedBookmark], path: &Path) -> Result<()> {
    fs::write(path, render_netscape_html(merged))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("wrote {} bookmarks to {}", merged.len(), path.display());
    Ok(())
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ============================================================================
// REPORTS
// ============================================================================

/// CSV columns: canonical_url, title, count, example_folders, sources
pub fn write_report_csv(rows: &[ReportRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    for row in rows {
        writer.serialize(row).context("Failed to write report row")?;
    }
    writer.flush()?;

    tracing::info!("wrote {} report rows to {}", rows.len(), path.display());
    Ok(())
}

/// Summary + report rows as pretty JSON
pub fn write_report_json(outcome: &MergeOutcome, path: &Path) -> Result<()> {
    let json = serde_json::json!({
        "summary": outcome.summary,
        "report": outcome.report,
    });

    let text = serde_json::to_string_pretty(&json)?;
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookmarkRecord;
    use crate::parser::{BookmarkParser, NetscapeHtmlParser};
    use crate::report::merge_collections;
    use crate::settings::DedupeSettings;
    use chrono::{TimeZone, Utc};

    fn create_test_outcome() -> MergeOutcome {
        let added = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let records = vec![
            BookmarkRecord::new("https://b.com/page?utm_source=x", "Tom & Jerry <3")
                .with_folder_path(["Bar"])
                .with_source("one.html"),
            BookmarkRecord::new("https://b.com/page", "Tom & Jerry <3")
                .with_added_at(added)
                .with_folder_path(["Other", "Cartoons"])
                .with_source("two.json"),
            BookmarkRecord::new("https://a.com/", "Alpha").with_source("one.html"),
            BookmarkRecord::new("https://b.com/about", "About").with_source("two.json"),
        ];

        merge_collections(records, &DedupeSettings::default()).unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"a&b<c>"d'"#), "a&amp;b&lt;c&gt;&quot;d&#x27;");
    }

    #[test]
    fn test_html_structure() {
        let outcome = create_test_outcome();
        let html = render_netscape_html(&outcome.merged);

        assert!(html.starts_with("<!DOCTYPE NETSCAPE-Bookmark-file-1>"));
        assert_eq!(html.matches("<DL><p>").count(), html.matches("</DL><p>").count());
        assert_eq!(html.matches("<DT><H3>Merged</H3>").count(), 1);
        assert!(html.contains("<DT><H3>a.com</H3>"));
        assert!(html.contains("ADD_DATE=\"1609459200\""));
        assert!(html.contains("Tom &amp; Jerry &lt;3"));

        // sorted by title inside the b.com folder
        let about = html.find(">About<").unwrap();
        let tom = html.find(">Tom &amp;").unwrap();
        assert!(about < tom);
    }

    #[test]
    fn test_html_roundtrips_through_parser() {
        let outcome = create_test_outcome();
        let file = tempfile::Builder::new().suffix(".html").tempfile().unwrap();
        write_netscape_html(&outcome.merged, file.path()).unwrap();

        let records = NetscapeHtmlParser.parse(file.path()).unwrap();

        assert_eq!(records.len(), outcome.merged.len());
        assert_eq!(records[0].folder_path, vec!["Merged", "a.com"]);
        assert!(records
            .iter()
            .any(|r| r.title == "Tom & Jerry <3" && r.folder_path == vec!["Merged", "b.com"]));
    }

    #[test]
    fn test_report_csv_columns() {
        let outcome = create_test_outcome();
        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write_report_csv(&outcome.report, file.path()).unwrap();

        let mut reader = csv::Reader::from_path(file.path()).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(
            headers,
            vec!["canonical_url", "title", "count", "example_folders", "sources"]
        );

        let rows: Vec<ReportRow> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows, outcome.report);
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[0].example_folders, "Bar | Other/Cartoons");
        assert_eq!(rows[0].sources, "one.html | two.json");
    }

    #[test]
    fn test_report_json() {
        let outcome = create_test_outcome();
        let file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write_report_json(&outcome, file.path()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(file.path()).unwrap()).unwrap();
        assert_eq!(value["summary"]["input_records"], 4);
        assert_eq!(value["report"].as_array().unwrap().len(), 3);
    }
}

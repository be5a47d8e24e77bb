// 🏗️ Parser Framework - Export files → BookmarkRecords
// One parser per export format, all producing the same record type

use crate::canonical::normalize_whitespace;
use crate::error::DedupeError;
use crate::models::BookmarkRecord;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// CORE TYPES
// ============================================================================

/// SourceFormat - Which export format a file is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    /// Chrome / Chromium / Edge / Brave `Bookmarks` JSON
    ChromeJson,
    /// Netscape bookmark file (Firefox, Safari, every browser's HTML export)
    NetscapeHtml,
}

impl SourceFormat {
    /// Human-readable name for display
    pub fn name(&self) -> &str {
        match self {
            SourceFormat::ChromeJson => "Chrome JSON",
            SourceFormat::NetscapeHtml => "Netscape HTML",
        }
    }
}

/// BookmarkParser - Core trait, one implementation per format
pub trait BookmarkParser: Send + Sync {
    /// Parse a file into records, in document order
    fn parse(&self, file_path: &Path) -> Result<Vec<BookmarkRecord>>;

    fn format(&self) -> SourceFormat;
}

// ============================================================================
// FACTORY FUNCTIONS
// ============================================================================

/// `.json` is a Chrome export, anything else is treated as Netscape HTML
pub fn detect_source(file_path: &Path) -> SourceFormat {
    let is_json = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        SourceFormat::ChromeJson
    } else {
        SourceFormat::NetscapeHtml
    }
}

pub fn get_parser(format: SourceFormat) -> Box<dyn BookmarkParser> {
    match format {
        SourceFormat::ChromeJson => Box::new(ChromeJsonParser),
        SourceFormat::NetscapeHtml => Box::new(NetscapeHtmlParser),
    }
}

/// Label stored in `source_label`: the file name
fn source_label(file_path: &Path) -> String {
    file_path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| file_path.display().to_string())
}

fn read_lossy(file_path: &Path) -> Result<String> {
    let bytes = fs::read(file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// ============================================================================
// MULTI-FILE PARSING
// ============================================================================

/// Records from every file that parsed, plus the files that didn't
#[derive(Debug, Default)]
pub struct ParseBatch {
    /// File order first, then document order within each file
    pub records: Vec<BookmarkRecord>,
    pub failures: Vec<(PathBuf, String)>,
}

/// Parse files in the order given; one bad file never stops the rest
pub fn parse_many<P: AsRef<Path>>(paths: &[P]) -> ParseBatch {
    let mut batch = ParseBatch::default();

    for path in paths {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("skipping {}: file not found", path.display());
            batch
                .failures
                .push((path.to_path_buf(), "file not found".to_string()));
            continue;
        }

        let parser = get_parser(detect_source(path));
        match parser.parse(path) {
            Ok(records) => {
                tracing::info!(
                    "parsed {} bookmarks from {} ({})",
                    records.len(),
                    path.display(),
                    parser.format().name()
                );
                batch.records.extend(records);
            }
            Err(err) => {
                tracing::warn!("skipping {}: {:#}", path.display(), err);
                batch.failures.push((path.to_path_buf(), format!("{:#}", err)));
            }
        }
    }

    batch
}

// ============================================================================
// CHROME JSON
// ============================================================================

/// Roots walked, with the folder label given to each
const CHROME_ROOTS: &[(&str, &str)] = &[
    ("bookmark_bar", "Bookmark Bar"),
    ("other", "Other"),
    ("synced", "Synced"),
    ("mobile", "Mobile"),
];

/// Microseconds between 1601-01-01 and 1970-01-01
const CHROME_EPOCH_OFFSET_MICROS: i64 = 11_644_473_600_000_000;

#[derive(Debug, Deserialize)]
struct ChromeFile {
    roots: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct ChromeNode {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    date_added: Option<serde_json::Value>,
    #[serde(default)]
    children: Vec<ChromeNode>,
}

pub struct ChromeJsonParser;

impl ChromeJsonParser {
    fn walk(
        node: &ChromeNode,
        folders: &mut Vec<String>,
        source: &str,
        out: &mut Vec<BookmarkRecord>,
    ) {
        match node.kind.as_str() {
            "url" => {
                let url = node.url.trim();
                if url.is_empty() {
                    return;
                }

                let title = match node.name.trim() {
                    "" => url,
                    name => name,
                };

                let mut record = BookmarkRecord::new(url, title)
                    .with_folder_path(folders.iter().cloned())
                    .with_source(source);
                if let Some(added) = node.date_added.as_ref().and_then(chrome_timestamp) {
                    record = record.with_added_at(added);
                }
                out.push(record);
            }
            "folder" => {
                folders.push(node.name.trim().to_string());
                for child in &node.children {
                    Self::walk(child, folders, source, out);
                }
                folders.pop();
            }
            _ => {}
        }
    }
}

impl BookmarkParser for ChromeJsonParser {
    fn parse(&self, file_path: &Path) -> Result<Vec<BookmarkRecord>> {
        let content = read_lossy(file_path)?;
        let file: ChromeFile = serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", file_path.display()))?;

        let roots = file.roots.ok_or_else(|| DedupeError::Parse {
            path: file_path.to_path_buf(),
            message: "missing \"roots\" object".to_string(),
        })?;

        let source = source_label(file_path);
        let mut records = Vec::new();

        for (key, label) in CHROME_ROOTS {
            let Some(value) = roots.get(*key) else {
                continue;
            };

            let root: ChromeNode = serde_json::from_value(value.clone())
                .with_context(|| format!("Invalid \"{}\" root", key))?;

            // the root's own name is replaced by its label
            let mut folders = vec![label.to_string()];
            for child in &root.children {
                Self::walk(child, &mut folders, &source, &mut records);
            }
        }

        Ok(records)
    }

    fn format(&self) -> SourceFormat {
        SourceFormat::ChromeJson
    }
}

/// Chrome stores microseconds since 1601 as a decimal string; 0 means unknown
fn chrome_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    let micros: i64 = match value {
        serde_json::Value::String(s) => s.trim().parse().ok()?,
        serde_json::Value::Number(n) => n.as_i64()?,
        _ => return None,
    };

    if micros <= 0 {
        return None;
    }

    DateTime::from_timestamp_micros(micros - CHROME_EPOCH_OFFSET_MICROS)
}

// ============================================================================
// NETSCAPE HTML
// ============================================================================

pub struct NetscapeHtmlParser;

impl BookmarkParser for NetscapeHtmlParser {
    fn parse(&self, file_path: &Path) -> Result<Vec<BookmarkRecord>> {
        let content = read_lossy(file_path)?;
        let document = Html::parse_document(&content);
        let link_selector =
            Selector::parse("a[href]").map_err(|e| anyhow!("invalid selector a[href]: {e}"))?;

        let source = source_label(file_path);
        let mut records = Vec::new();

        for link in document.select(&link_selector) {
            let url = link.value().attr("href").unwrap_or_default().trim();
            if url.is_empty() || url.starts_with("data:") {
                continue;
            }

            let text = normalize_whitespace(&link.text().collect::<Vec<_>>().join(" "));
            let title = if text.is_empty() { url.to_string() } else { text };

            let mut record = BookmarkRecord::new(url, title)
                .with_folder_path(folder_path(&link))
                .with_source(source.as_str());
            if let Some(added) = link
                .value()
                .attr("add_date")
                .and_then(|raw| raw.trim().parse::<i64>().ok())
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
            {
                record = record.with_added_at(added);
            }
            records.push(record);
        }

        Ok(records)
    }

    fn format(&self) -> SourceFormat {
        SourceFormat::NetscapeHtml
    }
}

/// Folder names of the `<DT><H3>` entries enclosing a link, outermost first
fn folder_path(link: &ElementRef<'_>) -> Vec<String> {
    let mut folders: Vec<String> = link
        .ancestors()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "dt")
        .filter_map(|dt| {
            dt.children()
                .filter_map(ElementRef::wrap)
                .find(|child| child.value().name() == "h3")
        })
        .map(|h3| normalize_whitespace(&h3.text().collect::<Vec<_>>().join(" ")))
        .collect();

    folders.reverse();
    folders
}

// ============================================================================
// TESTS
// ============================================================================

// 📚 Bookmark Models - Records in, merged bookmarks out
// Input records are immutable; merging always produces new values

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============================================================================
// BOOKMARK RECORD (one imported entry)
// ============================================================================

/// One bookmark as read from an export file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    /// Raw URL, exactly as found in the source
    pub url: String,

    pub title: String,

    /// Folder hierarchy, outermost first (may be empty)
    #[serde(default)]
    pub folder_path: Vec<String>,

    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,

    /// Which input file/origin this came from
    #[serde(default)]
    pub source_label: String,
}

impl BookmarkRecord {
    /// Create a record with only url and title set
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        BookmarkRecord {
            url: url.into(),
            title: title.into(),
            folder_path: Vec::new(),
            added_at: None,
            source_label: String::new(),
        }
    }

    /// Builder pattern: set folder hierarchy
    pub fn with_folder_path<I, S>(mut self, folders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.folder_path = folders.into_iter().map(Into::into).collect();
        self
    }

    /// Builder pattern: set timestamp
    pub fn with_added_at(mut self, added_at: DateTime<Utc>) -> Self {
        self.added_at = Some(added_at);
        self
    }

    /// Builder pattern: set source label
    pub fn with_source(mut self, source_label: impl Into<String>) -> Self {
        self.source_label = source_label.into();
        self
    }

    /// Folder hierarchy as a single `a/b/c` string
    pub fn folder_display(&self) -> String {
        self.folder_path.join("/")
    }
}

// ============================================================================
// MERGED BOOKMARK (one output entry per group)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedBookmark {
    pub canonical_url: String,

    /// Original URL of the earliest-added member
    pub url: String,

    /// Most frequent member title
    pub title: String,

    /// `["Merged", <domain>]`
    pub folder_path: Vec<String>,

    /// Earliest timestamp among members
    pub added_at: Option<DateTime<Utc>>,

    /// Distinct original folder paths, first-seen order, bounded
    pub example_folders: Vec<String>,

    pub sources: BTreeSet<String>,

    /// Number of original records merged into this one
    pub count: usize,
}

// ============================================================================
// REPORT ROW (one CSV line)
// ============================================================================

/// Separator used for list-valued report columns
pub const REPORT_LIST_SEPARATOR: &str = " | ";

/// Field order matches the CSV column order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub canonical_url: String,
    pub title: String,
    pub count: usize,
    pub example_folders: String,
    pub sources: String,
}

impl From<&MergedBookmark> for ReportRow {
    fn from(merged: &MergedBookmark) -> Self {
        ReportRow {
            canonical_url: merged.canonical_url.clone(),
            title: merged.title.clone(),
            count: merged.count,
            example_folders: merged.example_folders.join(REPORT_LIST_SEPARATOR),
            sources: merged
                .sources
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(REPORT_LIST_SEPARATOR),
        }
    }
}

// ============================================================================
// MERGE SUMMARY (statistics for the whole run)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSummary {
    pub input_records: usize,
    pub merged_bookmarks: usize,
    pub duplicates_removed: usize,
    /// Records that joined a group through title similarity
    pub fuzzy_joined: usize,
    pub distinct_sources: usize,
    /// Records grouped exact-match-only after the fuzzy budget ran out
    pub exact_only_records: usize,
}

impl MergeSummary {
    pub fn fuzzy_budget_exhausted(&self) -> bool {
        self.exact_only_records > 0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} bookmarks in, {} unique out ({} duplicates removed, {} via title similarity) from {} source(s)",
            self.input_records,
            self.merged_bookmarks,
            self.duplicates_removed,
            self.fuzzy_joined,
            self.distinct_sources
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

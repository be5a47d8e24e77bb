// 📊 Report Builder - Merged list + ordered statistics rows
//
// mergedList keeps group-creation order; reportRows are sorted by
// count desc, title asc (case-insensitive), canonical_url asc.

use crate::deduplication::{DedupeGroup, DeduplicationEngine};
use crate::error::Result;
use crate::merge::resolve;
use crate::models::{BookmarkRecord, MergeSummary, MergedBookmark, ReportRow};
use crate::settings::DedupeSettings;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Resolve every group and produce (merged list, sorted report rows)
pub fn build(groups: &[DedupeGroup]) -> (Vec<MergedBookmark>, Vec<ReportRow>) {
    let merged: Vec<MergedBookmark> = groups.iter().map(resolve).collect();

    let mut rows: Vec<ReportRow> = merged.iter().map(ReportRow::from).collect();
    rows.sort_by(compare_rows);

    (merged, rows)
}

/// Total order over report rows
pub fn compare_rows(a: &ReportRow, b: &ReportRow) -> Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        .then_with(|| a.canonical_url.cmp(&b.canonical_url))
        .then_with(|| a.title.cmp(&b.title))
}

// ============================================================================
// PIPELINE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeOutcome {
    pub merged: Vec<MergedBookmark>,
    pub report: Vec<ReportRow>,
    pub summary: MergeSummary,
}

/// Full run: validate settings → group → resolve → build
pub fn merge_collections(
    records: Vec<BookmarkRecord>,
    settings: &DedupeSettings,
) -> Result<MergeOutcome> {
    let engine = DeduplicationEngine::new(settings.clone())?;

    let input_records = records.len();
    let distinct_sources = records
        .iter()
        .filter(|r| !r.source_label.is_empty())
        .map(|r| r.source_label.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    let outcome = engine.group_with_stats(records);
    let fuzzy_joined = outcome.groups.iter().map(DedupeGroup::fuzzy_members).sum();
    let (merged, report) = build(&outcome.groups);

    let summary = MergeSummary {
        input_records,
        merged_bookmarks: merged.len(),
        duplicates_removed: input_records - merged.len(),
        fuzzy_joined,
        distinct_sources,
        exact_only_records: outcome.exact_only_records,
    };

    tracing::info!("{}", summary.summary());

    Ok(MergeOutcome {
        merged,
        report,
        summary,
    })
}

// ============================================================================
// TESTS
// ============================================================================

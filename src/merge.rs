// 🧬 Merge Resolver - One group → one merged bookmark
// Combines provenance (sources, folders, timestamps) and picks a representative title

use crate::canonical::normalize_whitespace;
use crate::deduplication::DedupeGroup;
use crate::models::{BookmarkRecord, MergedBookmark};
use std::collections::{BTreeSet, HashMap};

/// Root folder for every merged bookmark
pub const MERGED_FOLDER: &str = "Merged";

/// Maximum number of original folder paths kept per merged bookmark
pub const EXAMPLE_FOLDER_LIMIT: usize = 5;

/// Collapse a group into its merged bookmark
pub fn resolve(group: &DedupeGroup) -> MergedBookmark {
    let members = &group.members;

    let folder_path = if group.domain.is_empty() {
        vec![MERGED_FOLDER.to_string()]
    } else {
        vec![MERGED_FOLDER.to_string(), group.domain.clone()]
    };

    let sources: BTreeSet<String> = members
        .iter()
        .filter(|m| !m.source_label.is_empty())
        .map(|m| m.source_label.clone())
        .collect();

    MergedBookmark {
        canonical_url: group.canonical_url.clone(),
        url: earliest_member(members).map(|m| m.url.clone()).unwrap_or_default(),
        title: representative_title(members),
        folder_path,
        added_at: members.iter().filter_map(|m| m.added_at).min(),
        example_folders: example_folders(members),
        sources,
        count: members.len(),
    }
}

/// Most frequent (whitespace-normalized) title; ties go to the earliest member
fn representative_title(members: &[BookmarkRecord]) -> String {
    // title → (frequency, first position)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();

    for (position, member) in members.iter().enumerate() {
        counts
            .entry(normalize_whitespace(&member.title))
            .or_insert((0, position))
            .0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, pos_a)), (_, (count_b, pos_b))| {
            count_a.cmp(count_b).then(pos_b.cmp(pos_a))
        })
        .map(|(title, _)| title)
        .unwrap_or_default()
}

/// Member with the earliest timestamp; first member when none have one
fn earliest_member(members: &[BookmarkRecord]) -> Option<&BookmarkRecord> {
    let mut representative = members.first()?;

    for member in &members[1..] {
        if let Some(added) = member.added_at {
            if representative.added_at.map_or(true, |current| added < current) {
                representative = member;
            }
        }
    }

    Some(representative)
}

fn example_folders(members: &[BookmarkRecord]) -> Vec<String> {
    let mut seen = Vec::new();

    for member in members {
        if seen.len() == EXAMPLE_FOLDER_LIMIT {
            break;
        }

        let folder = member.folder_display();
        if !folder.is_empty() && !seen.contains(&folder) {
            seen.push(folder);
        }
    }

    seen
}

// ============================================================================
// TESTS
// ============================================================================

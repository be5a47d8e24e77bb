// 🧮 Similarity Scorer - Partial title ratio in [0, 100]
//
// Best-aligned substring comparison: the shorter title is slid over the longer
// one and each alignment is scored with a normalized Levenshtein ratio (strsim).
// Argument order matters only for equal-length titles: the engine always passes
// the group representative as `title_a` and the candidate as `title_b`.

use strsim::normalized_levenshtein;

use crate::canonical::normalize_whitespace;

/// Highest score for titles that are not exactly equal
const NEAR_MATCH_CEILING: u8 = 99;

/// Titles are compared on their first `MAX_COMPARED_CHARS` characters only.
///
/// Each alignment costs O(n²) and there are O(n) alignments, so long titles
/// (URLs used as titles) are truncated. Titles that differ only past this
/// prefix score 99.
pub const MAX_COMPARED_CHARS: usize = 128;

/// Score two titles, 0 (unrelated) ..= 100 (identical)
///
/// - empty (or whitespace-only) titles score 0
/// - 100 only for titles equal after whitespace normalization, so a threshold
///   of 100 means exact title equality
/// - comparison is case-insensitive otherwise
pub fn similarity(title_a: &str, title_b: &str) -> u8 {
    let a = normalize_whitespace(title_a);
    let b = normalize_whitespace(title_b);

    if a.is_empty() || b.is_empty() {
        return 0;
    }

    if a == b {
        return 100;
    }

    let a = comparable(&a);
    let b = comparable(&b);

    // floor keeps `score >= threshold` equivalent to the unrounded ratio
    let score = (partial_ratio(&a, &b) * 100.0).floor() as u8;
    score.min(NEAR_MATCH_CEILING)
}

/// Lower-cased, truncated to `MAX_COMPARED_CHARS`
fn comparable(title: &str) -> String {
    title.to_lowercase().chars().take(MAX_COMPARED_CHARS).collect()
}

/// Best ratio in [0.0, 1.0] over every alignment of the shorter string
fn partial_ratio(a: &str, b: &str) -> f64 {
    let (needle, haystack) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };

    if haystack.contains(needle) {
        return 1.0;
    }

    let n = needle.chars().count();
    // byte offset of every char boundary, including the end
    let bounds: Vec<usize> = haystack
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(haystack.len()))
        .collect();
    let m = bounds.len() - 1;

    let mut best: f64 = 0.0;

    // Full-length alignments
    for start in 0..=(m - n) {
        let window = &haystack[bounds[start]..bounds[start + n]];
        best = best.max(normalized_levenshtein(needle, window));
    }

    // Alignments hanging off either end; an overhang of `len` chars scores at
    // most len / n, so stop once that can no longer beat `best`
    for len in (1..n).rev() {
        if len as f64 / n as f64 <= best {
            break;
        }
        let head = &haystack[..bounds[len]];
        let tail = &haystack[bounds[m - len]..];
        best = best
            .max(normalized_levenshtein(needle, head))
            .max(normalized_levenshtein(needle, tail));
    }

    best
}

// ============================================================================
// TESTS
// ============================================================================

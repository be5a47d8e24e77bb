// Bookmark Dedupe - Core Library
// Exposes the merge engine plus the parsers/exporters around it, for the CLI and tests

pub mod models;
pub mod canonical;      // Canonicalizer - URL → dedup key
pub mod similarity;     // Similarity Scorer - partial title ratio
pub mod deduplication;  // Grouping Engine - exact + fuzzy groups
pub mod merge;          // Merge Resolver - group → merged bookmark
pub mod report;         // Report Builder + end-to-end pipeline
pub mod settings;
pub mod error;
pub mod parser;
pub mod export;
pub mod logging;

// Re-export commonly used types
pub use models::{
    BookmarkRecord, MergedBookmark, ReportRow, MergeSummary,
};
pub use canonical::{canonicalize, domain_of, normalize_whitespace, TRACKING_PARAMS};
pub use similarity::similarity;
pub use deduplication::{
    DeduplicationEngine, DedupeGroup, GroupingOutcome, MatchStrategy,
};
pub use merge::{resolve, EXAMPLE_FOLDER_LIMIT};
pub use report::{build, merge_collections, MergeOutcome};
pub use settings::{load_settings, DedupeSettings};
pub use error::DedupeError;
pub use parser::{
    BookmarkParser, SourceFormat, ParseBatch,
    ChromeJsonParser, NetscapeHtmlParser,
    detect_source, get_parser, parse_many,
};
pub use export::{
    render_netscape_html, write_netscape_html, write_report_csv, write_report_json,
};

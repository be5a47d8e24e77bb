use anyhow::{bail, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use bookmark_dedupe::{
    load_settings, logging, merge_collections, parse_many, write_netscape_html,
    write_report_csv, write_report_json,
};

/// Merge and deduplicate browser bookmark exports
#[derive(Debug, Parser)]
#[command(name = "bookmark-dedupe", version)]
#[command(about = "Merge and deduplicate browser bookmarks (Netscape HTML / Chrome JSON)", long_about = None)]
struct Cli {
    /// Input bookmark files, processed in the order given
    #[arg(short, long, num_args = 1.., required = true, value_name = "FILE")]
    input: Vec<PathBuf>,

    /// Merged Netscape HTML output
    #[arg(short, long, default_value = "merged_bookmarks.html")]
    out: PathBuf,

    /// Dedupe report CSV (default: <out stem>_dedupe_report.csv next to --out)
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Also write summary + report as JSON
    #[arg(long, value_name = "FILE")]
    json_report: Option<PathBuf>,

    /// Similarity threshold for fuzzy title matching (0-100)
    #[arg(short, long, value_name = "N")]
    similarity: Option<u8>,

    /// Disable fuzzy title matching
    #[arg(long)]
    no_fuzzy: bool,

    /// Stop fuzzy matching after N title comparisons
    #[arg(long, value_name = "N")]
    max_fuzzy_comparisons: Option<usize>,

    /// Settings file (default: ~/.config/bookmark-dedupe/config.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Debug logging for the merge engine
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("❌ Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // 1. Settings: config file, then CLI overrides
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(threshold) = cli.similarity {
        settings.threshold = threshold;
    }
    if cli.no_fuzzy {
        settings.fuzzy_enabled = false;
    }
    if cli.max_fuzzy_comparisons.is_some() {
        settings.max_fuzzy_comparisons = cli.max_fuzzy_comparisons;
    }
    settings.validate()?;

    // 2. Parse inputs
    println!("📂 Parsing {} file(s)...", cli.input.len());
    let batch = parse_many(&cli.input);
    for (path, reason) in &batch.failures {
        eprintln!("⚠️  Skipped {}: {}", path.display(), reason);
    }
    if batch.records.is_empty() {
        bail!("no bookmarks found in input files");
    }
    println!("✓ Parsed {} bookmarks", batch.records.len());

    // 3. Merge
    let outcome = merge_collections(batch.records, &settings)?;
    println!("✓ Merged to {} unique bookmarks", outcome.merged.len());
    if outcome.summary.fuzzy_budget_exhausted() {
        println!(
            "⚠️  Fuzzy budget exhausted: {} bookmarks matched by URL only",
            outcome.summary.exact_only_records
        );
    }

    // 4. Export
    write_netscape_html(&outcome.merged, &cli.out)?;
    println!("✓ Exported merged bookmarks to {}", cli.out.display());

    let report_path = cli.report.unwrap_or_else(|| default_report_path(&cli.out));
    write_report_csv(&outcome.report, &report_path)?;
    println!("✓ Exported dedupe report to {}", report_path.display());

    if let Some(json_path) = cli.json_report {
        write_report_json(&outcome, &json_path)?;
        println!("✓ Exported JSON report to {}", json_path.display());
    }

    println!("\n{}", outcome.summary.summary());
    Ok(())
}

/// `out/merged.html` → `out/merged_dedupe_report.csv`
fn default_report_path(out: &Path) -> PathBuf {
    let stem = out
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("merged_bookmarks");
    out.with_file_name(format!("{}_dedupe_report.csv", stem))
}

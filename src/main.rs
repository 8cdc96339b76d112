// src/main.rs

mod cli;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use cli::Args;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use translation_status::{exporter, ingest, HistoryTracker, StalenessAnalyzer};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let start_time = Instant::now();

    let commits = ingest::load_commit_records(&args.history)
        .with_context(|| format!("Failed to load commit history from {}", args.history.display()))?;
    let current_files = ingest::load_current_files(&args.files)
        .with_context(|| format!("Failed to load current files from {}", args.files.display()))?;

    let tracker = HistoryTracker::new(&commits, &current_files).context("Failed to build file history")?;
    info!(
        "History built in {:.2?}: {} paths, {} renames",
        start_time.elapsed(),
        tracker.all_paths().count(),
        tracker.rename_events().len()
    );

    let now = Utc::now();
    let languages = args.target_languages();
    let results = StalenessAnalyzer::new(&tracker, &current_files)
        .with_now(now)
        .with_progress(!args.no_progress)
        .analyze(&languages);

    let summary = exporter::export(&results, &args.output, now)
        .with_context(|| format!("Failed to write reports to {}", args.output.display()))?;

    info!(
        "Wrote {} report files for {} translations in {:.2?}",
        summary.files_written,
        summary.exported,
        start_time.elapsed()
    );
    Ok(())
}

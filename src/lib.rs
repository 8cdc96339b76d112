// src/lib.rs

//! Translation freshness for a multi-language documentation tree.
//!
//! Rebuilds per-file commit history (following renames) from a pre-extracted
//! commit log and compares every English page against each translation.

pub mod analyzer;
pub mod dates;
pub mod error;
pub mod exporter;
pub mod history;
pub mod ingest;
pub mod model;

pub use analyzer::StalenessAnalyzer;
pub use error::{Error, Result};
pub use history::HistoryTracker;

// src/analyzer.rs

use crate::history::HistoryTracker;
use crate::model::*;
use chrono::{DateTime, Utc};
use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::info;

/// Root of the English source tree
pub const ENGLISH_ROOT: &str = "content/en/";

/// Category of files sitting directly under the language directory
pub const OVERALL_CATEGORY: &str = "overall";

/// Category of paths outside the `content/<lang>/...` layout
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Latest revision of every English path, built once per run
type EnglishLatest<'a> = HashMap<&'a str, &'a FileRevision>;

/// Compares every English file against its translations.
pub struct StalenessAnalyzer<'a> {
    tracker: &'a HistoryTracker,
    current_files: &'a HashSet<String>,
    now: DateTime<Utc>,
    show_progress: bool,
}

impl<'a> StalenessAnalyzer<'a> {
    pub fn new(tracker: &'a HistoryTracker, current_files: &'a HashSet<String>) -> Self {
        StalenessAnalyzer { tracker, current_files, now: Utc::now(), show_progress: false }
    }

    /// Reference clock for measuring how long a missing translation has been missing.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Status of every translation of every live English file, keyed by translated path.
    pub fn analyze(&self, languages: &[Language]) -> BTreeMap<String, TranslationStatusResult> {
        // 1. English files that have history and still exist
        let mut english_paths: Vec<&'a str> = self
            .tracker
            .all_paths()
            .filter(|path| path.starts_with(ENGLISH_ROOT) && self.current_files.contains(*path))
            .collect();
        english_paths.sort_unstable();

        // 2. Their latest commits
        let english_latest = self.english_latest(&english_paths);

        let bar = if self.show_progress {
            ProgressBar::new(english_paths.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        bar.set_message("Analyzing translations");

        // 3. Every (English file, language) pair
        let results: BTreeMap<String, TranslationStatusResult> = english_paths
            .par_iter()
            .progress_with(bar.clone())
            .filter_map(|&path| english_latest.get(path).map(|&latest| (path, latest)))
            .flat_map_iter(|(english_path, latest)| {
                languages.iter().map(move |&language| {
                    let target = translated_path(english_path, language);
                    let result = self.analyze_pair(english_path, latest, &target, language);
                    (target, result)
                })
            })
            .collect();
        bar.finish_with_message("Analysis complete");

        info!(
            "Analyzed {} English files across {} languages: {} results",
            english_latest.len(),
            languages.len(),
            results.len()
        );

        results
    }

    fn english_latest(&self, english_paths: &[&'a str]) -> EnglishLatest<'a> {
        english_paths
            .iter()
            .filter_map(|&path| self.tracker.latest_commit(path).map(|latest| (path, latest)))
            .collect()
    }

    fn analyze_pair(
        &self,
        english_path: &str,
        english_latest: &FileRevision,
        target_path: &str,
        language: Language,
    ) -> TranslationStatusResult {
        let category = extract_category(target_path);

        let Some(target_latest) = self.tracker.latest_commit(target_path) else {
            return self.missing_translation(english_path, english_latest, target_path, language, category);
        };

        let missing_commits: Vec<FileRevision> = self
            .tracker
            .commits_since(english_path, target_latest.date)
            .into_iter()
            .cloned()
            .collect();
        let stats = ChangeStats::from_revisions(&missing_commits);

        let days_behind = english_latest.date.signed_duration_since(target_latest.date).num_days().max(0);
        let status = if days_behind <= 0 { TranslationStatus::UpToDate } else { TranslationStatus::Outdated };

        TranslationStatusResult {
            target_path: target_path.to_string(),
            english_path: english_path.to_string(),
            target_latest_date: Some(target_latest.date),
            english_latest_date: english_latest.date,
            language,
            category,
            days_behind,
            commits_behind: missing_commits.len(),
            total_change_lines: stats.total_change_lines(),
            insertions_behind_lines: stats.insertion_lines,
            deletions_behind_lines: stats.deletion_lines,
            status,
            severity: Severity::from_change_lines(stats.total_change_lines()),
            missing_commits,
        }
    }

    /// The translation was never committed: everything ever done to the English file is missing.
    fn missing_translation(
        &self,
        english_path: &str,
        english_latest: &FileRevision,
        target_path: &str,
        language: Language,
        category: String,
    ) -> TranslationStatusResult {
        let history: Vec<FileRevision> = self.tracker.history(english_path).into_iter().cloned().collect();
        let stats = ChangeStats::from_revisions(&history);
        let days_behind = self
            .now
            .signed_duration_since(english_latest.date.with_timezone(&Utc))
            .num_days()
            .max(0);

        TranslationStatusResult {
            target_path: target_path.to_string(),
            english_path: english_path.to_string(),
            target_latest_date: None,
            english_latest_date: english_latest.date,
            language,
            category,
            days_behind,
            commits_behind: history.len(),
            total_change_lines: stats.total_change_lines(),
            insertions_behind_lines: stats.insertion_lines,
            deletions_behind_lines: stats.deletion_lines,
            status: TranslationStatus::NotTranslated,
            severity: Severity::from_change_lines(stats.total_change_lines()),
            missing_commits: history,
        }
    }
}

/// `content/en/docs/x.md` -> `content/<lang>/docs/x.md`
pub fn translated_path(english_path: &str, language: Language) -> String {
    match english_path.strip_prefix(ENGLISH_ROOT) {
        Some(rest) => format!("content/{}/{}", language.code(), rest),
        None => english_path.to_string(),
    }
}

/// First directory below the language segment of a `content/<lang>/...` path.
pub fn extract_category(path: &str) -> String {
    let Some((lang, rest)) = path.strip_prefix("content/").and_then(|p| p.split_once('/')) else {
        return UNKNOWN_CATEGORY.to_string();
    };
    if lang.is_empty() || !lang.chars().all(|c| c.is_ascii_lowercase() || c == '-') {
        return UNKNOWN_CATEGORY.to_string();
    }

    match rest.split_once('/') {
        Some((category, tail)) if !category.is_empty() && !tail.is_empty() => category.to_string(),
        Some(_) => UNKNOWN_CATEGORY.to_string(),
        None if !rest.is_empty() => OVERALL_CATEGORY.to_string(),
        None => UNKNOWN_CATEGORY.to_string(),
    }
}

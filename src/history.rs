// src/history.rs

use crate::dates::parse_commit_date;
use crate::error::{Error, Result};
use crate::model::*;
use chrono::{DateTime, FixedOffset};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Per-path change history rebuilt from a raw commit log, following renames.
#[derive(Debug, Default)]
pub struct HistoryTracker {
    /// Revisions keyed by the literal path they were recorded under, oldest first
    revisions: HashMap<String, Vec<FileRevision>>,
    /// Every rename ever observed, oldest first
    renames: Vec<RenameEvent>,
}

impl HistoryTracker {
    /// Builds the tracker. `current_files` is the snapshot of paths that exist
    /// today; tracked paths missing from it are treated as deleted.
    pub fn new(commits: &[CommitRecord], current_files: &HashSet<String>) -> Result<Self> {
        // 1. Parse commit dates and sort chronologically, input order is not trusted
        let mut dated = commits
            .iter()
            .map(|commit| {
                parse_commit_date(&commit.date)
                    .map(|date| (date, commit))
                    .map_err(|e| Error::Commit { hash: commit.hash.clone(), source: Box::new(e) })
            })
            .collect::<Result<Vec<_>>>()?;
        dated.sort_by_key(|&(date, _)| date);

        // 2. Record renames and materialize one revision per (commit, path)
        let mut tracker = HistoryTracker::default();
        for (date, commit) in dated {
            for change in &commit.files {
                if let Some(old_path) = &change.old_path {
                    tracker.renames.push(RenameEvent {
                        hash: commit.hash.clone(),
                        date,
                        old_path: old_path.clone(),
                        new_path: change.path.clone(),
                    });
                }

                let operation = if change.old_path.is_some() { Operation::Renamed } else { Operation::Modified };
                tracker.revisions.entry(change.path.clone()).or_default().push(FileRevision {
                    hash: commit.hash.clone(),
                    date,
                    author: commit.author.clone(),
                    message: commit.message.clone(),
                    path: change.path.clone(),
                    insertions: change.insertions,
                    deletions: change.deletions,
                    operation,
                    old_path: change.old_path.clone(),
                });
            }
        }

        // 3. The earliest revision of each path is its creation, unless it is a rename
        for entries in tracker.revisions.values_mut() {
            if let Some(oldest) = entries.iter_mut().min_by_key(|rev| rev.date) {
                if oldest.operation == Operation::Modified {
                    oldest.operation = Operation::Added;
                }
            }
        }

        // 4. Paths gone from the snapshot were deleted. Only touches `modified`.
        for (path, entries) in tracker.revisions.iter_mut() {
            if current_files.contains(path) {
                continue;
            }
            for rev in entries.iter_mut().filter(|rev| rev.operation == Operation::Modified) {
                rev.operation = Operation::Deleted;
            }
        }

        debug!(
            "Built history for {} paths from {} commits ({} renames)",
            tracker.revisions.len(),
            commits.len(),
            tracker.renames.len()
        );

        Ok(tracker)
    }

    /// Walks the rename log newest-first, undoing renames whose new path is the
    /// current identity. With `until`, renames at or before that date are kept.
    ///
    /// A single pass over the log bounds the walk even for cyclic renames.
    fn walk_renames(&self, path: &str, until: Option<DateTime<FixedOffset>>) -> Vec<String> {
        let mut chain = vec![path.to_string()];
        for event in self.renames.iter().rev() {
            if until.is_some_and(|date| event.date <= date) {
                break;
            }
            if chain.last().is_some_and(|current| *current == event.new_path) {
                chain.push(event.old_path.clone());
            }
        }
        chain
    }

    /// Every revision of the file's identity chain, newest first.
    pub fn history(&self, path: &str) -> Vec<&FileRevision> {
        let mut seen = HashSet::new();
        let mut history: Vec<&FileRevision> = self
            .walk_renames(path, None)
            .into_iter()
            .filter(|identity| seen.insert(identity.clone()))
            .filter_map(|identity| self.revisions.get(&identity))
            .flatten()
            .collect();
        history.sort_by(|a, b| b.date.cmp(&a.date));
        history
    }

    /// Paths the file has held, newest (the given path) first.
    pub fn rename_history(&self, path: &str) -> Vec<String> {
        self.walk_renames(path, None)
    }

    /// What the file known today as `path` was called at `date`.
    pub fn path_as_of(&self, path: &str, date: DateTime<FixedOffset>) -> String {
        self.walk_renames(path, Some(date))
            .pop()
            .unwrap_or_else(|| path.to_string())
    }

    pub fn latest_commit(&self, path: &str) -> Option<&FileRevision> {
        self.history(path).first().copied()
    }

    pub fn oldest_commit(&self, path: &str) -> Option<&FileRevision> {
        self.history(path).last().copied()
    }

    /// Revisions strictly newer than `since`, newest first.
    pub fn commits_since(&self, path: &str, since: DateTime<FixedOffset>) -> Vec<&FileRevision> {
        self.history(path).into_iter().filter(|rev| rev.date > since).collect()
    }

    pub fn stats(&self, path: &str) -> Option<FileStats> {
        let history = self.history(path);
        if history.is_empty() {
            return None;
        }

        let total_insertions = history.iter().map(|rev| rev.insertions).sum();
        let total_deletions = history.iter().map(|rev| rev.deletions).sum();
        Some(FileStats {
            total_commits: history.len(),
            total_insertions,
            total_deletions,
            total_changes: total_insertions + total_deletions,
            rename_count: self.rename_history(path).len() - 1,
        })
    }

    /// Every literal path that has a revision of its own.
    pub fn all_paths(&self) -> impl Iterator<Item = &str> {
        self.revisions.keys().map(String::as_str)
    }

    pub fn rename_events(&self) -> &[RenameEvent] {
        &self.renames
    }
}

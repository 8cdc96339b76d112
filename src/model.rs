// src/model.rs

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single file touched by a commit, as extracted from `git log --numstat`
#[derive(Debug, Clone, Deserialize)]
pub struct FileChange {
    /// Path after the commit (the new path for renames)
    pub path: String,
    #[serde(default)]
    pub insertions: u64,
    #[serde(default)]
    pub deletions: u64,
    /// Present only when the change is a rename
    #[serde(default)]
    pub old_path: Option<String>,
}

/// Per-commit totals written alongside the file list. Not used by the analysis.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitSummary {
    pub total_files: u64,
    pub total_insertions: u64,
    pub total_deletions: u64,
    pub total_changes: u64,
}

/// One commit of the raw log
#[derive(Debug, Clone, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    pub author: String,
    pub date: String,
    pub message: String,
    #[serde(default)]
    pub files: Vec<FileChange>,
    #[serde(default)]
    pub summary: Option<CommitSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Added,
    Modified,
    Deleted,
    Renamed,
}

/// A commit as seen from one path
#[derive(Debug, Clone, Serialize)]
pub struct FileRevision {
    pub hash: String,
    pub date: DateTime<FixedOffset>,
    pub author: String,
    pub message: String,
    pub path: String,
    pub insertions: u64,
    pub deletions: u64,
    pub operation: Operation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
}

/// A path change observed in the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEvent {
    pub hash: String,
    pub date: DateTime<FixedOffset>,
    pub old_path: String,
    pub new_path: String,
}

/// Aggregates over the full identity chain of a path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileStats {
    pub total_commits: usize,
    pub total_insertions: u64,
    pub total_deletions: u64,
    pub total_changes: u64,
    pub rename_count: usize,
}

/// Content languages of the documentation tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Language {
    Bn,
    De,
    En,
    Es,
    Fr,
    Hi,
    Id,
    It,
    Ja,
    Ko,
    Pl,
    PtBr,
    Ru,
    Uk,
    Vi,
    ZhCn,
}

impl Language {
    pub const ALL: [Language; 16] = [
        Language::Bn,
        Language::De,
        Language::En,
        Language::Es,
        Language::Fr,
        Language::Hi,
        Language::Id,
        Language::It,
        Language::Ja,
        Language::Ko,
        Language::Pl,
        Language::PtBr,
        Language::Ru,
        Language::Uk,
        Language::Vi,
        Language::ZhCn,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::Bn => "bn",
            Language::De => "de",
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::Hi => "hi",
            Language::Id => "id",
            Language::It => "it",
            Language::Ja => "ja",
            Language::Ko => "ko",
            Language::Pl => "pl",
            Language::PtBr => "pt-br",
            Language::Ru => "ru",
            Language::Uk => "uk",
            Language::Vi => "vi",
            Language::ZhCn => "zh-cn",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        Language::ALL.into_iter().find(|lang| lang.code() == code)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationStatus {
    UpToDate,
    Outdated,
    NotTranslated,
}

/// How large the gap between a translation and its English source is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Current,
    Minor,
    Moderate,
    Significant,
    Critical,
}

impl Severity {
    /// Buckets a total of changed lines. Upper bounds are inclusive.
    pub fn from_change_lines(total_change_lines: u64) -> Severity {
        match total_change_lines {
            0 => Severity::Current,
            1..=50 => Severity::Minor,
            51..=200 => Severity::Moderate,
            201..=500 => Severity::Significant,
            _ => Severity::Critical,
        }
    }
}

/// Line totals over a set of revisions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeStats {
    pub insertion_lines: u64,
    pub deletion_lines: u64,
}

impl ChangeStats {
    pub fn from_revisions<'a>(revisions: impl IntoIterator<Item = &'a FileRevision>) -> ChangeStats {
        revisions.into_iter().fold(ChangeStats::default(), |acc, rev| ChangeStats {
            insertion_lines: acc.insertion_lines + rev.insertions,
            deletion_lines: acc.deletion_lines + rev.deletions,
        })
    }

    pub fn total_change_lines(&self) -> u64 {
        self.insertion_lines + self.deletion_lines
    }
}

/// Freshness verdict for one translated file
#[derive(Debug, Clone, Serialize)]
pub struct TranslationStatusResult {
    pub target_path: String,
    pub english_path: String,
    pub target_latest_date: Option<DateTime<FixedOffset>>,
    pub english_latest_date: DateTime<FixedOffset>,
    pub language: Language,
    pub category: String,
    pub days_behind: i64,
    pub commits_behind: usize,
    pub total_change_lines: u64,
    pub insertions_behind_lines: u64,
    pub deletions_behind_lines: u64,
    pub status: TranslationStatus,
    pub severity: Severity,
    /// Newest first
    pub missing_commits: Vec<FileRevision>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_boundaries_are_inclusive() {
        let cases = [
            (0, Severity::Current),
            (1, Severity::Minor),
            (50, Severity::Minor),
            (51, Severity::Moderate),
            (200, Severity::Moderate),
            (201, Severity::Significant),
            (500, Severity::Significant),
            (501, Severity::Critical),
            (10_000, Severity::Critical),
        ];
        for (lines, expected) in cases {
            assert_eq!(Severity::from_change_lines(lines), expected, "lines = {lines}");
        }
    }

    #[test]
    fn language_codes_round_trip_through_lookup() {
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
        assert_eq!(Language::from_code("zh"), None);
        assert_eq!(serde_json::to_string(&Language::PtBr).unwrap(), "\"pt-br\"");
        assert_eq!(Language::ZhCn.to_string(), "zh-cn");
    }

    #[test]
    fn commit_record_accepts_optional_fields() {
        let line = r#"{"hash":"abc","author":"a","date":"2024-01-01 00:00:00 +0000","message":"m",
            "files":[{"path":"content/en/new.md","insertions":1,"deletions":0,"old_path":"content/en/old.md"},
                     {"path":"content/en/x.md","insertions":3,"deletions":2}],
            "summary":{"total_files":2,"total_insertions":4,"total_deletions":2,"total_changes":6}}"#;
        let record: CommitRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.files.len(), 2);
        assert_eq!(record.files[0].old_path.as_deref(), Some("content/en/old.md"));
        assert!(record.files[1].old_path.is_none());
        assert_eq!(record.summary.map(|s| s.total_changes), Some(6));
    }

    #[test]
    fn statuses_serialize_snake_case() {
        assert_eq!(serde_json::to_string(&TranslationStatus::NotTranslated).unwrap(), "\"not_translated\"");
        assert_eq!(serde_json::to_string(&Severity::Significant).unwrap(), "\"significant\"");
        assert_eq!(serde_json::to_string(&Operation::Renamed).unwrap(), "\"renamed\"");
    }
}

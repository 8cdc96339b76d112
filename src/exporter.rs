// src/exporter.rs

use crate::analyzer::UNKNOWN_CATEGORY;
use crate::error::{Error, Result};
use crate::model::*;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

const EXPORTED_EXTENSIONS: [&str; 2] = ["md", "html"];

/// Per-language cell of the matrix report
#[derive(Debug, Serialize)]
pub struct TranslationSummary {
    pub status: TranslationStatus,
    pub severity: Severity,
    pub days_behind: i64,
    pub commits_behind: usize,
    pub total_change_lines: u64,
    pub target_latest_date: Option<DateTime<FixedOffset>>,
    pub english_latest_date: DateTime<FixedOffset>,
}

#[derive(Debug, Serialize)]
pub struct Article<'a> {
    pub english_path: &'a str,
    pub translations: BTreeMap<Language, TranslationSummary>,
}

/// One `matrix/<category>.json` file
#[derive(Debug, Serialize)]
pub struct CategoryMatrix<'a> {
    pub last_updated: DateTime<Utc>,
    pub articles: Vec<Article<'a>>,
}

/// One entry of a `details/<lang>/<category>.json` file
#[derive(Debug, Serialize)]
pub struct TranslationDetail<'a> {
    pub target_path: &'a str,
    pub english_path: &'a str,
    pub target_latest_date: Option<DateTime<FixedOffset>>,
    pub english_latest_date: DateTime<FixedOffset>,
    pub days_behind: i64,
    pub commits_behind: usize,
    pub total_change_lines: u64,
    pub insertions_behind_lines: u64,
    pub deletions_behind_lines: u64,
    pub status: TranslationStatus,
    pub severity: Severity,
    pub missing_commits: &'a [FileRevision],
}

/// language -> category -> english path -> detail
pub type DetailReport<'a> = BTreeMap<Language, BTreeMap<&'a str, BTreeMap<&'a str, TranslationDetail<'a>>>>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub exported: usize,
    pub skipped: usize,
    pub files_written: usize,
}

/// Only markdown/html pages in a known category are reported.
pub fn should_export(result: &TranslationStatusResult) -> bool {
    let extension = Path::new(&result.english_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let supported = extension.is_some_and(|ext| EXPORTED_EXTENSIONS.contains(&ext.as_str()));

    supported && result.category != UNKNOWN_CATEGORY
}

/// Groups results by category, then by English article.
pub fn build_matrix<'a>(
    results: &[&'a TranslationStatusResult],
    last_updated: DateTime<Utc>,
) -> BTreeMap<&'a str, CategoryMatrix<'a>> {
    let mut by_category: BTreeMap<&'a str, BTreeMap<&'a str, BTreeMap<Language, TranslationSummary>>> = BTreeMap::new();
    for &result in results {
        let summary = TranslationSummary {
            status: result.status,
            severity: result.severity,
            days_behind: result.days_behind,
            commits_behind: result.commits_behind,
            total_change_lines: result.total_change_lines,
            target_latest_date: result.target_latest_date,
            english_latest_date: result.english_latest_date,
        };
        by_category
            .entry(result.category.as_str())
            .or_default()
            .entry(result.english_path.as_str())
            .or_default()
            .insert(result.language, summary);
    }

    by_category
        .into_iter()
        .map(|(category, articles)| {
            let articles = articles
                .into_iter()
                .map(|(english_path, translations)| Article { english_path, translations })
                .collect();
            (category, CategoryMatrix { last_updated, articles })
        })
        .collect()
}

pub fn build_details<'a>(results: &[&'a TranslationStatusResult]) -> DetailReport<'a> {
    let mut report = DetailReport::new();
    for &result in results {
        let detail = TranslationDetail {
            target_path: &result.target_path,
            english_path: &result.english_path,
            target_latest_date: result.target_latest_date,
            english_latest_date: result.english_latest_date,
            days_behind: result.days_behind,
            commits_behind: result.commits_behind,
            total_change_lines: result.total_change_lines,
            insertions_behind_lines: result.insertions_behind_lines,
            deletions_behind_lines: result.deletions_behind_lines,
            status: result.status,
            severity: result.severity,
            missing_commits: &result.missing_commits,
        };
        report
            .entry(result.language)
            .or_default()
            .entry(result.category.as_str())
            .or_default()
            .insert(result.english_path.as_str(), detail);
    }
    report
}

/// Writes `matrix/<category>.json` and `details/<lang>/<category>.json` under `output_dir`.
pub fn export(
    results: &BTreeMap<String, TranslationStatusResult>,
    output_dir: &Path,
    now: DateTime<Utc>,
) -> Result<ExportSummary> {
    let selected: Vec<&TranslationStatusResult> = results.values().filter(|r| should_export(r)).collect();
    let mut summary = ExportSummary {
        exported: selected.len(),
        skipped: results.len() - selected.len(),
        files_written: 0,
    };

    let matrix_dir = output_dir.join("matrix");
    for (category, matrix) in build_matrix(&selected, now) {
        write_json(&matrix_dir.join(format!("{category}.json")), &matrix)?;
        summary.files_written += 1;
    }

    let details_dir = output_dir.join("details");
    for (language, categories) in build_details(&selected) {
        let lang_dir = details_dir.join(language.code());
        for (category, details) in categories {
            write_json(&lang_dir.join(format!("{category}.json")), &details)?;
            summary.files_written += 1;
        }
    }

    info!(
        "Exported {} results ({} skipped) into {} files under {}",
        summary.exported,
        summary.skipped,
        summary.files_written,
        output_dir.display()
    );
    Ok(summary)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|source| Error::Export { path: path.to_path_buf(), source })?;
    writer.flush().map_err(|e| Error::io(path, e))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_commit_date;
    use chrono::TimeZone;
    use serde_json::Value;

    fn result(target: &str, english: &str, language: Language, category: &str) -> TranslationStatusResult {
        TranslationStatusResult {
            target_path: target.to_string(),
            english_path: english.to_string(),
            target_latest_date: None,
            english_latest_date: parse_commit_date("2024-01-10 00:00:00 +0000").unwrap(),
            language,
            category: category.to_string(),
            days_behind: 12,
            commits_behind: 1,
            total_change_lines: 7,
            insertions_behind_lines: 5,
            deletions_behind_lines: 2,
            status: TranslationStatus::NotTranslated,
            severity: Severity::Minor,
            missing_commits: Vec::new(),
        }
    }

    fn sample() -> BTreeMap<String, TranslationStatusResult> {
        [
            result("content/ja/docs/a.md", "content/en/docs/a.md", Language::Ja, "docs"),
            result("content/ko/docs/a.md", "content/en/docs/a.md", Language::Ko, "docs"),
            result("content/ja/blog/b.HTML", "content/en/blog/b.HTML", Language::Ja, "blog"),
            result("content/ja/docs/logo.png", "content/en/docs/logo.png", Language::Ja, "docs"),
            result("content/ja//odd.md", "content/en//odd.md", Language::Ja, UNKNOWN_CATEGORY),
        ]
        .into_iter()
        .map(|r| (r.target_path.clone(), r))
        .collect()
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn filters_by_extension_and_category() {
        let results = sample();
        assert!(should_export(&results["content/ja/docs/a.md"]));
        assert!(should_export(&results["content/ja/blog/b.HTML"]));
        assert!(!should_export(&results["content/ja/docs/logo.png"]));
        assert!(!should_export(&results["content/ja//odd.md"]));
    }

    #[test]
    fn matrix_groups_languages_under_each_article() {
        let results = sample();
        let selected: Vec<_> = results.values().filter(|r| should_export(r)).collect();
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

        let matrix = build_matrix(&selected, now);
        assert_eq!(matrix.keys().copied().collect::<Vec<_>>(), vec!["blog", "docs"]);
        let docs = &matrix["docs"];
        assert_eq!(docs.articles.len(), 1);
        assert_eq!(docs.articles[0].english_path, "content/en/docs/a.md");
        assert_eq!(docs.articles[0].translations.keys().copied().collect::<Vec<_>>(), vec![Language::Ja, Language::Ko]);
    }

    #[test]
    fn export_writes_matrix_and_detail_files() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

        let summary = export(&sample(), dir.path(), now).unwrap();
        assert_eq!(summary, ExportSummary { exported: 3, skipped: 2, files_written: 5 });

        let docs = read_json(&dir.path().join("matrix/docs.json"));
        let cell = &docs["articles"][0]["translations"]["ko"];
        assert_eq!(cell["status"], "not_translated");
        assert_eq!(cell["severity"], "minor");
        assert_eq!(cell["days_behind"], 12);
        assert!(cell["target_latest_date"].is_null());

        let detail = read_json(&dir.path().join("details/ja/docs.json"));
        let entry = &detail["content/en/docs/a.md"];
        assert_eq!(entry["target_path"], "content/ja/docs/a.md");
        assert_eq!(entry["insertions_behind_lines"], 5);
        assert!(entry["missing_commits"].as_array().unwrap().is_empty());

        assert!(dir.path().join("details/ko/docs.json").exists());
        assert!(dir.path().join("details/ja/blog.json").exists());
        assert!(!dir.path().join("matrix/unknown.json").exists());
    }
}

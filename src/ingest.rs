// src/ingest.rs

use crate::error::{Error, Result};
use crate::model::CommitRecord;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{error, info, warn};

/// Loads a JSON Lines commit log, one commit object per line.
///
/// Lines that fail to decode are retried once with stray backslashes escaped.
/// Lines that still fail are logged and skipped.
pub fn load_commit_records(path: &Path) -> Result<Vec<CommitRecord>> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    info!("Loading commit records from {}", path.display());

    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut records = Vec::new();

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|e| Error::io(path, e))?;
        let original = line.trim();
        if original.is_empty() {
            continue;
        }

        match serde_json::from_str::<CommitRecord>(original) {
            Ok(record) => records.push(record),
            Err(_) => {
                let fixed = escape_stray_backslashes(original);
                warn!("Fixed line {} - Original: {} => Fixed: {}", line_no, original, fixed);
                match serde_json::from_str::<CommitRecord>(&fixed) {
                    Ok(record) => records.push(record),
                    Err(e) => error!("Failed to decode line {}: {}", line_no, e),
                }
            }
        }
    }

    info!("Loaded {} commit records from {}", records.len(), path.display());
    Ok(records)
}

/// Loads the snapshot of paths that currently exist, one per line.
pub fn load_current_files(path: &Path) -> Result<HashSet<String>> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut files = HashSet::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| Error::io(path, e))?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            files.insert(trimmed.to_string());
        }
    }

    info!("Loaded {} current paths from {}", files.len(), path.display());
    Ok(files)
}

/// Doubles every backslash that does not start a valid JSON escape.
fn escape_stray_backslashes(line: &str) -> String {
    let mut fixed = String::with_capacity(line.len() + 8);
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            fixed.push(c);
            continue;
        }
        match chars.peek() {
            Some(&next @ ('\\' | '"' | '/' | 'b' | 'f' | 'n' | 'r' | 't' | 'u')) => {
                fixed.push('\\');
                fixed.push(next);
                chars.next();
            }
            _ => fixed.push_str("\\\\"),
        }
    }
    fixed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn escapes_only_invalid_backslashes() {
        assert_eq!(escape_stray_backslashes(r#"C:\docs\x"#), r#"C:\\docs\\x"#);
        assert_eq!(escape_stray_backslashes(r#"a\nb\"c\\d"#), r#"a\nb\"c\\d"#);
        assert_eq!(escape_stray_backslashes(r#"\u00e9 \d+"#), r#"\u00e9 \\d+"#);
        assert_eq!(escape_stray_backslashes("trailing\\"), "trailing\\\\");
    }

    #[test]
    fn loads_records_and_repairs_bad_escapes() {
        let file = write_temp(concat!(
            r#"{"hash":"a1","author":"x","date":"2024-01-01 00:00:00 +0000","message":"first","files":[{"path":"content/en/a.md","insertions":1,"deletions":0}]}"#,
            "\n\n",
            r#"{"hash":"a2","author":"x","date":"2024-01-02 00:00:00 +0000","message":"match \d+ in C:\tmp","files":[]}"#,
            "\n",
            "not json at all\n",
        ));

        let records = load_commit_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].files[0].path, "content/en/a.md");
        assert_eq!(records[1].hash, "a2");
        assert!(records[1].message.starts_with(r"match \d+"));
    }

    #[test]
    fn missing_inputs_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.jsonl");
        assert!(matches!(load_commit_records(&missing), Err(Error::NotFound(_))));
        assert!(matches!(load_current_files(&missing), Err(Error::NotFound(_))));
    }

    #[test]
    fn current_files_are_trimmed_and_deduplicated() {
        let file = write_temp("content/en/a.md\n  content/ja/a.md  \n\ncontent/en/a.md\n");
        let files = load_current_files(file.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.contains("content/ja/a.md"));
    }
}

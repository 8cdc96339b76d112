// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, analyzing, or exporting commit history
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid commit date '{value}': {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Commit {hash}: {source}")]
    Commit {
        hash: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Failed to write report {}: {}", .path.display(), .source)]
    Export {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

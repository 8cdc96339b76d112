// src/cli.rs

use clap::Parser;
use std::path::PathBuf;
use translation_status::model::Language;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Commit log in JSON Lines format, one commit per line
    #[arg(long)]
    pub history: PathBuf,

    /// File listing every path that currently exists, one per line
    #[arg(long)]
    pub files: PathBuf,

    /// Directory to write the matrix and detail reports into
    #[arg(short, long, default_value = "data")]
    pub output: PathBuf,

    /// Languages to check; defaults to every supported language
    #[arg(short, long, value_enum, value_delimiter = ',')]
    pub languages: Vec<Language>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl Args {
    pub fn target_languages(&self) -> Vec<Language> {
        if self.languages.is_empty() {
            Language::ALL.to_vec()
        } else {
            self.languages.clone()
        }
    }
}

//! Error types for bibtab-core
//!
//! Only conditions that stop a conversion live here. Per-entry problems
//! (unknown entry types, empty required fields) are reported as
//! [`Diagnostic`](crate::Diagnostic)s instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for bibtab operations
pub type Result<T> = std::result::Result<T, BibtabError>;

/// Main error type for bibtab operations
#[derive(Error, Debug)]
pub enum BibtabError {
    /// Input path does not reference an existing file
    #[error("file '{}' does not exist", .0.display())]
    MissingInput(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// BibTeX input could not be read at all
    #[error("BibTeX parse error: {0}")]
    Parse(#[from] crate::parser::ParseError),

    #[error("Table error: {0}")]
    Table(#[from] csv::Error),

    /// A table is missing one of the columns every row needs
    #[error("Table is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Invalid table format: {0}")]
    InvalidFormat(String),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),
}

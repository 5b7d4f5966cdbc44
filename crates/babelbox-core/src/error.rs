//! Error types for babelbox-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors that can occur in babelbox-core
///
/// Recoverable problems in table data are not errors; they are reported
/// through a [`DiagnosticSink`](crate::DiagnosticSink) instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to open or read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or write an output file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// A source path given by the caller does not exist
    #[error("source '{0}' does not exist")]
    SourceNotFound(PathBuf),

    /// Several sources were given but no output directory
    #[error("{sources} sources given but no output directory specified")]
    AmbiguousOutput { sources: usize },

    /// Dialect parameters that cannot be used for parsing
    #[error("invalid dialect: {0}")]
    InvalidDialect(String),

    /// A language code that cannot be used as an output file name
    #[error("invalid language code '{0}'")]
    InvalidLanguageCode(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

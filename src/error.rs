//! Error types for the ingest library.
//!
//! Row data never produces an error: unparseable cells become absent fields and
//! are reported by validation. These variants cover configuration, decoding and
//! the storage collaborator.

use std::io;
use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Debug, Error)]
pub enum IngestError {
    /// I/O error while reading a statement or a config file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON in a config or rules file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error decoding delimited text.
    #[error("CSV decoding error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from the SQLite transaction store.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A custom category rule carried a regular expression that does not compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Semantically invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),
}

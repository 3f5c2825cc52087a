//! Error types for source loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a source.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Source file not found.
    #[error("source file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed to parse a document export.
    #[error("failed to parse documents {path}: {message}")]
    JsonParse { path: PathBuf, message: String },

    // === SQLite Errors ===
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("table '{table}' not found")]
    TableNotFound { table: String },

    // === Key Errors ===
    /// The join key column is absent.
    #[error("{source_name}: required column '{column}' not found")]
    MissingKeyColumn { source_name: String, column: String },

    /// A join key value is missing or not an integer.
    #[error("{source_name}: cannot convert {column} value '{value}' at row {row} to integer")]
    KeyCoercion {
        source_name: String,
        column: String,
        row: usize,
        value: String,
    },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

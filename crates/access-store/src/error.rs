//! Persistence error types.

use std::path::PathBuf;

use access_ingest::IngestError;
use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File I/O error.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Table names must be non-blank.
    #[error("invalid table name '{name}'")]
    InvalidTableName { name: String },

    /// A frame with no columns cannot be written as a table.
    #[error("cannot write table '{table}': no columns")]
    EmptySchema { table: String },

    #[error("database not found: {path}")]
    DatabaseNotFound { path: PathBuf },

    #[error("table '{table}' not found in {path}")]
    TableNotFound { table: String, path: PathBuf },

    /// Reading a source failed while staging.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for StoreError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

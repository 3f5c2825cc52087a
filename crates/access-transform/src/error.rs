use thiserror::Error;

/// Errors raised while joining or imputing.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The key column is absent, not `Int64`, or holds nulls.
    #[error("{side}: invalid patient_id column: {reason}")]
    InvalidKey { side: &'static str, reason: String },

    /// A suffixed name would clash with an existing column.
    #[error("column '{column}' would be produced twice by the join")]
    DuplicateColumn { column: String },

    /// A score cell cannot be read as a number.
    #[error("column '{column}' has non-numeric value '{value}' at row {row}")]
    NonNumericScore {
        column: String,
        row: usize,
        value: String,
    },

    /// Every score in a non-empty join is missing and the policy is to fail.
    #[error("cannot impute '{column}': all {rows} joined rows are missing a value")]
    EmptyMean { column: String, rows: usize },

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;

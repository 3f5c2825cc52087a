//! Source readers for the accessibility feedback pipeline.
//!
//! This crate loads profile and feedback records into Polars DataFrames and
//! brings them into a shape the join can rely on.
//!
//! # Features
//!
//! - **CSV Loading**: header-row CSV files with full-file type inference
//! - **Document Exports**: JSON arrays or newline-delimited JSON objects
//! - **SQLite Tables**: any table, typed from its declared column affinities
//! - **Key Coercion**: `patient_id` becomes `Int64` or the source is rejected
//! - **Feedback Normalization**: store-generated `_id` columns are dropped
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use access_ingest::{CsvFeedbackSource, CsvProfileSource, FeedbackSource, ProfileSource};
//!
//! let profiles = CsvProfileSource::new("patient_profiles_europe.csv").load_profiles()?;
//! let feedback = CsvFeedbackSource::new("feedback_flattened.csv").load_feedback()?;
//! ```

mod cells;
mod csv;
mod documents;
mod error;
mod key;
mod normalize;
mod polars_utils;
mod source;
mod sqlite;

// === Error Types ===
pub use error::{IngestError, Result};

// === Readers ===
pub use csv::read_csv_frame;
pub use documents::{parse_documents, read_documents};
pub use sqlite::{quote_identifier, read_sqlite_table, read_table};

// === Column Building ===
pub use cells::{CellValue, ColumnKind, build_column};

// === Key Handling ===
pub use key::{coerce_key_column, empty_keyed_frame};

// === Normalization ===
pub use normalize::normalize_feedback;

// === Sources ===
pub use source::{
    CsvFeedbackSource, CsvProfileSource, DocumentFeedbackSource, FeedbackSource, ProfileSource,
    SqliteProfileSource, feedback_source, profile_source,
};

// === Value Helpers ===
pub use polars_utils::{any_to_f64, any_to_i64, any_to_string, format_numeric, parse_f64};

//! Profile and feedback source capabilities.
//!
//! Each source variant knows how to produce a frame whose `patient_id` is
//! `Int64`. Feedback sources additionally strip the surrogate identifier, so
//! callers never branch on where the data came from.

use std::path::PathBuf;
use std::time::Instant;

use access_model::{FeedbackSourceConfig, ProfileSourceConfig};
use polars::prelude::DataFrame;
use tracing::{debug, info_span};

use crate::csv::read_csv_frame;
use crate::documents::read_documents;
use crate::error::Result;
use crate::key::{coerce_key_column, empty_keyed_frame};
use crate::normalize::normalize_feedback;
use crate::sqlite::read_sqlite_table;

/// Produces profile records.
pub trait ProfileSource {
    /// Human-readable location, for logs and summaries.
    fn describe(&self) -> String;

    fn load_profiles(&self) -> Result<DataFrame>;
}

/// Produces normalized feedback records.
pub trait FeedbackSource {
    /// Human-readable location, for logs and summaries.
    fn describe(&self) -> String;

    fn load_feedback(&self) -> Result<DataFrame>;
}

fn finish_load(df: Option<DataFrame>, source_name: &str, start: Instant) -> Result<DataFrame> {
    let df = match df {
        Some(df) => coerce_key_column(df, source_name)?,
        None => empty_keyed_frame()?,
    };
    debug!(
        source = source_name,
        rows = df.height(),
        columns = df.width(),
        duration_ms = start.elapsed().as_millis(),
        "source loaded"
    );
    Ok(df)
}

/// Profiles from a CSV file.
#[derive(Debug, Clone)]
pub struct CsvProfileSource {
    path: PathBuf,
}

impl CsvProfileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProfileSource for CsvProfileSource {
    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn load_profiles(&self) -> Result<DataFrame> {
        let _guard = info_span!("read_profiles_csv", path = %self.path.display()).entered();
        let start = Instant::now();
        finish_load(read_csv_frame(&self.path)?, "profiles", start)
    }
}

/// Profiles from a SQLite table, typically one written by profile staging.
#[derive(Debug, Clone)]
pub struct SqliteProfileSource {
    database: PathBuf,
    table: String,
}

impl SqliteProfileSource {
    pub fn new(database: impl Into<PathBuf>, table: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
        }
    }
}

impl ProfileSource for SqliteProfileSource {
    fn describe(&self) -> String {
        format!("sqlite:{}#{}", self.database.display(), self.table)
    }

    fn load_profiles(&self) -> Result<DataFrame> {
        let _guard = info_span!(
            "read_profiles_sqlite",
            database = %self.database.display(),
            table = %self.table
        )
        .entered();
        let start = Instant::now();
        let df = read_sqlite_table(&self.database, &self.table)?;
        finish_load(Some(df), "profiles", start)
    }
}

/// Feedback from a flattened CSV export.
#[derive(Debug, Clone)]
pub struct CsvFeedbackSource {
    path: PathBuf,
}

impl CsvFeedbackSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FeedbackSource for CsvFeedbackSource {
    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn load_feedback(&self) -> Result<DataFrame> {
        let _guard = info_span!("read_feedback_csv", path = %self.path.display()).entered();
        let start = Instant::now();
        let df = read_csv_frame(&self.path)?.map(normalize_feedback).transpose()?;
        finish_load(df, "feedback", start)
    }
}

/// Feedback from a document collection export.
#[derive(Debug, Clone)]
pub struct DocumentFeedbackSource {
    path: PathBuf,
}

impl DocumentFeedbackSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FeedbackSource for DocumentFeedbackSource {
    fn describe(&self) -> String {
        format!("documents:{}", self.path.display())
    }

    fn load_feedback(&self) -> Result<DataFrame> {
        let _guard = info_span!("read_feedback_documents", path = %self.path.display()).entered();
        let start = Instant::now();
        let df = read_documents(&self.path)?
            .map(normalize_feedback)
            .transpose()?;
        finish_load(df, "feedback", start)
    }
}

/// Builds the profile source named by the configuration.
pub fn profile_source(config: &ProfileSourceConfig) -> Box<dyn ProfileSource> {
    match config {
        ProfileSourceConfig::Csv { path } => Box::new(CsvProfileSource::new(path.clone())),
        ProfileSourceConfig::Sqlite { database, table } => {
            Box::new(SqliteProfileSource::new(database.clone(), table.clone()))
        }
    }
}

/// Builds the feedback source named by the configuration.
pub fn feedback_source(config: &FeedbackSourceConfig) -> Box<dyn FeedbackSource> {
    match config {
        FeedbackSourceConfig::Csv { path } => Box::new(CsvFeedbackSource::new(path.clone())),
        FeedbackSourceConfig::Documents { path } => {
            Box::new(DocumentFeedbackSource::new(path.clone()))
        }
    }
}

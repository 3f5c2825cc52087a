//! Staging profile CSVs into SQLite.

use std::path::Path;

use access_ingest::{CsvProfileSource, ProfileSource};

use crate::error::Result;
use crate::io::{PersistReport, persist};

/// Loads a profile CSV and full-refreshes it into `table`.
///
/// Later runs can read profiles from the database instead of the CSV.
pub fn stage_profiles(csv: &Path, database: &Path, table: &str) -> Result<PersistReport> {
    let profiles = CsvProfileSource::new(csv).load_profiles()?;
    persist(database, table, &profiles)
}

//! Reading persisted tables.

use std::path::Path;

use access_ingest::{IngestError, read_sqlite_table};
use polars::prelude::DataFrame;
use tracing::debug;

use crate::error::{Result, StoreError};

/// Load a persisted table into a DataFrame.
///
/// An empty table still yields its columns, typed from the declared
/// affinities.
pub fn load_table(database: &Path, table: &str) -> Result<DataFrame> {
    let df = read_sqlite_table(database, table).map_err(|err| match err {
        IngestError::FileNotFound { path } => StoreError::DatabaseNotFound { path },
        IngestError::TableNotFound { table } => StoreError::TableNotFound {
            table,
            path: database.to_path_buf(),
        },
        other => StoreError::Ingest(other),
    })?;
    debug!(
        table,
        rows = df.height(),
        columns = df.width(),
        "table loaded"
    );
    Ok(df)
}

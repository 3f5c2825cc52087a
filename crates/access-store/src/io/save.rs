//! Full-refresh table writes.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use access_ingest::{any_to_string, quote_identifier};
use polars::prelude::{AnyValue, DataFrame, DataType};
use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};
use serde::Serialize;
use tracing::{info, info_span};

use super::hash::fingerprint;
use crate::error::{Result, StoreError};

/// Outcome of a persisted write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistReport {
    pub database: PathBuf,
    pub table: String,
    pub rows: usize,
    pub columns: usize,
    /// SHA-256 of the written frame, see [`fingerprint`].
    pub fingerprint: String,
}

fn sql_type(dtype: &DataType) -> &'static str {
    if dtype.is_integer() || dtype.is_bool() {
        "INTEGER"
    } else if dtype.is_float() {
        "REAL"
    } else {
        "TEXT"
    }
}

fn sql_value(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(v) => Value::Integer(i64::from(v)),
        AnyValue::Int8(v) => Value::Integer(i64::from(v)),
        AnyValue::Int16(v) => Value::Integer(i64::from(v)),
        AnyValue::Int32(v) => Value::Integer(i64::from(v)),
        AnyValue::Int64(v) => Value::Integer(v),
        AnyValue::UInt8(v) => Value::Integer(i64::from(v)),
        AnyValue::UInt16(v) => Value::Integer(i64::from(v)),
        AnyValue::UInt32(v) => Value::Integer(i64::from(v)),
        AnyValue::UInt64(v) => match i64::try_from(v) {
            Ok(v) => Value::Integer(v),
            Err(_) => Value::Real(v as f64),
        },
        AnyValue::Float32(v) => Value::Real(f64::from(v)),
        AnyValue::Float64(v) => Value::Real(v),
        other => Value::Text(any_to_string(other)),
    }
}

fn validate_table_name(table: &str) -> Result<()> {
    if table.trim().is_empty() {
        return Err(StoreError::InvalidTableName {
            name: table.to_string(),
        });
    }
    Ok(())
}

/// Replaces `table` with the contents of `df` on an open connection.
///
/// Drop, create and insert run in one transaction, so readers observe either
/// the previous table or the complete new one. Returns the number of rows
/// written.
pub fn write_table(conn: &mut Connection, table: &str, df: &DataFrame) -> Result<usize> {
    validate_table_name(table)?;
    if df.width() == 0 {
        return Err(StoreError::EmptySchema {
            table: table.to_string(),
        });
    }

    let quoted = quote_identifier(table);
    let columns = df.get_columns();
    let definitions: Vec<String> = columns
        .iter()
        .map(|column| {
            format!(
                "{} {}",
                quote_identifier(column.name().as_str()),
                sql_type(column.dtype())
            )
        })
        .collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|idx| format!("?{idx}")).collect();

    let tx = conn.transaction()?;
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {quoted}; CREATE TABLE {quoted} ({});",
        definitions.join(", ")
    ))?;
    {
        let mut insert = tx.prepare(&format!(
            "INSERT INTO {quoted} VALUES ({})",
            placeholders.join(", ")
        ))?;
        let mut row_values: Vec<Value> = Vec::with_capacity(columns.len());
        for row in 0..df.height() {
            row_values.clear();
            for column in columns {
                row_values.push(sql_value(column.get(row)?));
            }
            insert.execute(params_from_iter(row_values.iter()))?;
        }
    }
    tx.commit()?;
    Ok(df.height())
}

/// Writes `df` to `table` in the SQLite file `database`, replacing any
/// previous contents.
pub fn persist(database: &Path, table: &str, df: &DataFrame) -> Result<PersistReport> {
    let span = info_span!("persist", database = %database.display(), table = %table);
    let _guard = span.enter();
    let start = Instant::now();

    validate_table_name(table)?;
    if let Some(parent) = database.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| StoreError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut conn = Connection::open(database)?;
    let rows = write_table(&mut conn, table, df)?;
    let report = PersistReport {
        database: database.to_path_buf(),
        table: table.to_string(),
        rows,
        columns: df.width(),
        fingerprint: fingerprint(df),
    };
    info!(
        rows = report.rows,
        columns = report.columns,
        fingerprint = %report.fingerprint,
        duration_ms = start.elapsed().as_millis(),
        "table persisted"
    );
    Ok(report)
}

//! SQLite table reading.

use std::path::Path;

use polars::prelude::{Column, DataFrame};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, OptionalExtension};

use crate::cells::{CellValue, ColumnKind, build_column};
use crate::error::{IngestError, Result};

/// Quotes a SQLite identifier, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Maps a declared column type to a column kind using SQLite affinity rules.
fn declared_kind(declared: &str) -> ColumnKind {
    let upper = declared.to_ascii_uppercase();
    if upper.contains("INT") {
        ColumnKind::Integer
    } else if upper.is_empty()
        || upper.contains("CHAR")
        || upper.contains("CLOB")
        || upper.contains("TEXT")
        || upper.contains("BLOB")
    {
        ColumnKind::Text
    } else {
        ColumnKind::Float
    }
}

fn to_cell(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Null,
        ValueRef::Integer(v) => CellValue::Int(v),
        ValueRef::Real(v) => CellValue::Float(v),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            CellValue::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// Reads every row of `table` from an already open connection.
///
/// Column types follow the values; columns with no values fall back to the
/// declared affinity, so an empty table still yields typed columns.
pub fn read_table(conn: &Connection, table: &str) -> Result<DataFrame> {
    let exists: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .optional()?;
    if exists.is_none() {
        return Err(IngestError::TableNotFound {
            table: table.to_string(),
        });
    }

    let quoted = quote_identifier(table);
    let mut info = conn.prepare(&format!("PRAGMA table_info({quoted})"))?;
    let declared: Vec<(String, String)> = info
        .query_map([], |row| Ok((row.get(1)?, row.get(2)?)))?
        .collect::<rusqlite::Result<_>>()?;

    let mut stmt = conn.prepare(&format!("SELECT * FROM {quoted}"))?;
    let width = stmt.column_count();
    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); width];
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        for (idx, column) in cells.iter_mut().enumerate() {
            column.push(to_cell(row.get_ref(idx)?));
        }
    }

    let columns: Vec<Column> = declared
        .iter()
        .zip(cells.iter())
        .map(|((name, declared_type), values)| {
            build_column(name, values, declared_kind(declared_type))
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Opens `database` read-only and reads `table`.
pub fn read_sqlite_table(database: &Path, table: &str) -> Result<DataFrame> {
    if !database.exists() {
        return Err(IngestError::FileNotFound {
            path: database.to_path_buf(),
        });
    }
    let conn = Connection::open_with_flags(database, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    read_table(&conn, table)
}

#[cfg(test)]
mod tests {
    use polars::prelude::DataType;

    use super::*;

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_identifier("merged_access_data"), "\"merged_access_data\"");
        assert_eq!(quote_identifier("odd\"name"), "\"odd\"\"name\"");
    }

    #[test]
    fn declared_types_follow_affinity_rules() {
        assert_eq!(declared_kind("INTEGER"), ColumnKind::Integer);
        assert_eq!(declared_kind("BIGINT"), ColumnKind::Integer);
        assert_eq!(declared_kind("VARCHAR(20)"), ColumnKind::Text);
        assert_eq!(declared_kind("REAL"), ColumnKind::Float);
        assert_eq!(declared_kind("DOUBLE"), ColumnKind::Float);
        assert_eq!(declared_kind(""), ColumnKind::Text);
    }

    #[test]
    fn reads_rows_and_empty_tables() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE patient_profiles (patient_id INTEGER, country TEXT, age INTEGER);
             INSERT INTO patient_profiles VALUES (1, 'FR', 34), (2, 'DE', NULL);
             CREATE TABLE empty_scores (patient_id INTEGER, satisfaction_score REAL);",
        )
        .unwrap();

        let df = read_table(&conn, "patient_profiles").unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("patient_id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("country").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("age").unwrap().null_count(), 1);

        let empty = read_table(&conn, "empty_scores").unwrap();
        assert_eq!(empty.height(), 0);
        assert_eq!(empty.width(), 2);
        assert_eq!(
            empty.column("satisfaction_score").unwrap().dtype(),
            &DataType::Float64
        );
    }

    #[test]
    fn missing_table_is_reported() {
        let conn = Connection::open_in_memory().unwrap();
        let err = read_table(&conn, "nope").unwrap_err();
        assert!(matches!(err, IngestError::TableNotFound { .. }));
    }
}

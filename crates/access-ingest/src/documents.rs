//! Document collection exports.
//!
//! Accepts either a JSON array of objects or newline-delimited JSON objects,
//! the two shapes document stores commonly export. Column order follows the
//! first time each key is seen.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use polars::prelude::DataFrame;
use serde_json::{Map, Value};

use crate::cells::{CellValue, ColumnKind, build_column};
use crate::error::{IngestError, Result};

/// Reads a document export file. Returns `Ok(None)` for an empty collection.
pub fn read_documents(path: &Path) -> Result<Option<DataFrame>> {
    let contents = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    parse_documents(&contents).map_err(|message| IngestError::JsonParse {
        path: path.to_path_buf(),
        message,
    })
}

/// Parses document export text into a DataFrame.
pub fn parse_documents(contents: &str) -> std::result::Result<Option<DataFrame>, String> {
    let trimmed = contents.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let values: Vec<Value> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed).map_err(|e| e.to_string())?
    } else {
        trimmed
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|e| format!("line {}: {e}", idx + 1))
            })
            .collect::<std::result::Result<_, _>>()?
    };

    let mut documents: Vec<Map<String, Value>> = Vec::with_capacity(values.len());
    for (idx, value) in values.into_iter().enumerate() {
        match value {
            Value::Object(map) => documents.push(map),
            other => {
                return Err(format!(
                    "document {} is not an object: {}",
                    idx + 1,
                    json_kind(&other)
                ));
            }
        }
    }
    if documents.is_empty() {
        return Ok(None);
    }

    let mut names: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for document in &documents {
        for key in document.keys() {
            if seen.insert(key.clone()) {
                names.push(key.clone());
            }
        }
    }

    let columns = names
        .iter()
        .map(|name| {
            let cells: Vec<CellValue> = documents
                .iter()
                .map(|document| document.get(name).map_or(CellValue::Null, to_cell))
                .collect();
            build_column(name, &cells, ColumnKind::Text)
        })
        .collect();
    DataFrame::new(columns).map(Some).map_err(|e| e.to_string())
}

fn to_cell(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Bool(v) => CellValue::Bool(*v),
        Value::Number(n) => match n.as_i64() {
            Some(v) => CellValue::Int(v),
            None => n.as_f64().map_or(CellValue::Null, CellValue::Float),
        },
        Value::String(s) => CellValue::Text(s.clone()),
        Value::Object(map) => match extended_json_scalar(map) {
            Some(cell) => cell,
            None => CellValue::Text(value.to_string()),
        },
        Value::Array(_) => CellValue::Text(value.to_string()),
    }
}

/// Unwraps single-key extended JSON wrappers such as `{"$oid": "..."}` or
/// `{"$numberInt": "3"}`.
fn extended_json_scalar(map: &Map<String, Value>) -> Option<CellValue> {
    if map.len() != 1 {
        return None;
    }
    let (key, inner) = map.iter().next()?;
    let text = inner.as_str()?;
    match key.as_str() {
        "$oid" => Some(CellValue::Text(text.to_string())),
        "$numberInt" | "$numberLong" => text.parse().ok().map(CellValue::Int),
        "$numberDouble" | "$numberDecimal" => text.parse().ok().map(CellValue::Float),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::DataType;

    use super::*;

    fn names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    #[test]
    fn parses_json_array_in_key_order() {
        let df = parse_documents(
            r#"[
                {"_id": {"$oid": "65f0a1"}, "patient_id": 1, "satisfaction_score": 4, "issue_type": "audio"},
                {"_id": {"$oid": "65f0a2"}, "patient_id": 2, "satisfaction_score": null, "issue_type": "layout"}
            ]"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            names(&df),
            vec!["_id", "patient_id", "satisfaction_score", "issue_type"]
        );
        assert_eq!(df.column("patient_id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("_id").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("satisfaction_score").unwrap().null_count(), 1);
    }

    #[test]
    fn parses_newline_delimited_documents() {
        let df = parse_documents(
            "{\"patient_id\": 1, \"satisfaction_score\": 4.5}\n\n{\"patient_id\": 2, \"issue_type\": \"captions\"}\n",
        )
        .unwrap()
        .unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(
            names(&df),
            vec!["patient_id", "satisfaction_score", "issue_type"]
        );
        assert_eq!(df.column("issue_type").unwrap().null_count(), 1);
    }

    #[test]
    fn empty_collections_yield_none() {
        assert!(parse_documents("").unwrap().is_none());
        assert!(parse_documents("[]").unwrap().is_none());
    }

    #[test]
    fn rejects_non_object_documents() {
        let err = parse_documents("[1, 2]").unwrap_err();
        assert!(err.contains("not an object"));
    }

    #[test]
    fn reports_line_of_bad_json() {
        let err = parse_documents("{\"patient_id\": 1}\n{oops}").unwrap_err();
        assert!(err.starts_with("line 2"));
    }
}

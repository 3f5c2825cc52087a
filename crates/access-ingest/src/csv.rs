//! CSV file reading.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, NullValues, SerReader};

use crate::error::{IngestError, Result};

/// Cell markers read as missing, in addition to blank cells.
const NULL_MARKERS: [&str; 13] = [
    "NA", "N/A", "n/a", "<NA>", "#NA", "#N/A", "NaN", "nan", "-NaN", "-nan", "null", "NULL",
    "None",
];

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

fn read_source_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
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
    })
}

/// Reads a header-row CSV file into a DataFrame.
///
/// Types are inferred from the whole file. Blank cells and the usual
/// missing-value markers (`NA`, `NaN`, `null`, ...) become nulls, and header
/// names are trimmed. A file with no content yields `Ok(None)` so the caller
/// can substitute an empty keyed frame.
pub fn read_csv_frame(path: &Path) -> Result<Option<DataFrame>> {
    let contents = read_source_text(path)?;
    if contents.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}').is_empty() {
        return Ok(None);
    }

    let null_values = NullValues::AllColumns(NULL_MARKERS.iter().map(|&m| m.into()).collect());
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(|parse| parse.with_null_values(Some(null_values.clone())))
        .into_reader_with_file_handle(Cursor::new(contents.into_bytes()))
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let renames: Vec<(String, String)> = df
        .get_column_names()
        .iter()
        .filter_map(|name| {
            let normalized = normalize_header(name.as_str());
            (normalized != name.as_str()).then(|| (name.to_string(), normalized))
        })
        .collect();
    for (from, to) in renames {
        df.rename(&from, to.into())?;
    }

    Ok(Some(df))
}

//! Join key coercion.

use access_model::columns::PATIENT_ID;
use polars::prelude::{DataFrame, DataType, IntoColumn, NamedFrom, Series};

use crate::error::{IngestError, Result};
use crate::polars_utils::{any_to_i64, any_to_string};

/// Returns a zero-row frame holding only an `Int64` key column.
///
/// Sources with no records still expose the key so the join sees a
/// well-formed, empty input.
pub fn empty_keyed_frame() -> Result<DataFrame> {
    let key = Series::new(PATIENT_ID.into(), Vec::<i64>::new()).into_column();
    Ok(DataFrame::new(vec![key])?)
}

/// Converts `patient_id` to `Int64` in place.
///
/// Every value must be present and integral. The first offending row aborts
/// the load for `source_name`.
pub fn coerce_key_column(mut df: DataFrame, source_name: &str) -> Result<DataFrame> {
    let keys = {
        let column = df
            .column(PATIENT_ID)
            .map_err(|_| IngestError::MissingKeyColumn {
                source_name: source_name.to_string(),
                column: PATIENT_ID.to_string(),
            })?;
        if column.dtype() == &DataType::Int64 && column.null_count() == 0 {
            return Ok(df);
        }
        let mut keys = Vec::with_capacity(column.len());
        for row in 0..column.len() {
            let value = column.get(row)?;
            match any_to_i64(value.clone()) {
                Some(key) => keys.push(key),
                None => {
                    return Err(IngestError::KeyCoercion {
                        source_name: source_name.to_string(),
                        column: PATIENT_ID.to_string(),
                        row,
                        value: any_to_string(value),
                    });
                }
            }
        }
        keys
    };
    df.with_column(Series::new(PATIENT_ID.into(), keys))?;
    Ok(df)
}

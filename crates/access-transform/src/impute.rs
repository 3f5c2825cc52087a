//! Mean imputation of the score column.

use access_ingest::{any_to_f64, any_to_string};
use access_model::{EmptyMeanPolicy, ImputationConfig, ImputationStrategy};
use polars::prelude::{AnyValue, DataFrame, NamedFrom, Series};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Result, TransformError};

/// Why imputation did not fill anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationSkip {
    /// The strategy is `none`.
    Disabled,
    /// The configured column is not in the joined schema.
    ColumnMissing,
    /// The join produced rows, but none carried a value.
    NoObservedValues,
}

/// What imputation did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImputationReport {
    pub column: String,
    /// Number of cells filled.
    pub filled: usize,
    /// Value written into every missing cell.
    pub fill_value: Option<f64>,
    pub skipped: Option<ImputationSkip>,
}

impl ImputationReport {
    fn skipped(column: &str, reason: ImputationSkip) -> Self {
        Self {
            column: column.to_string(),
            filled: 0,
            fill_value: None,
            skipped: Some(reason),
        }
    }
}

fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
    let values = df.column(column)?;
    let mut out = Vec::with_capacity(values.len());
    for row in 0..values.len() {
        let value = values.get(row)?;
        if matches!(value, AnyValue::Null) {
            out.push(None);
            continue;
        }
        match any_to_f64(value.clone()) {
            // float NaN is a missing marker, not a score
            Some(number) if number.is_nan() => out.push(None),
            Some(number) if number.is_finite() => out.push(Some(number)),
            _ => {
                return Err(TransformError::NonNumericScore {
                    column: column.to_string(),
                    row,
                    value: any_to_string(value),
                });
            }
        }
    }
    Ok(out)
}

/// Fills missing values of `column` with the mean of its present values.
///
/// The mean is computed once over every row of `df`. The column is rewritten
/// as `Float64` whenever it is present.
pub fn impute_mean(
    df: &mut DataFrame,
    column: &str,
    on_empty: EmptyMeanPolicy,
) -> Result<ImputationReport> {
    let present = df
        .get_column_names()
        .iter()
        .any(|name| name.as_str() == column);
    if !present {
        warn!(column, "imputation column not in joined data, skipping");
        return Ok(ImputationReport::skipped(column, ImputationSkip::ColumnMissing));
    }

    let mut values = numeric_values(df, column)?;
    let observed: Vec<f64> = values.iter().flatten().copied().collect();

    if observed.is_empty() {
        let rows = values.len();
        if rows > 0 && on_empty == EmptyMeanPolicy::Fail {
            return Err(TransformError::EmptyMean {
                column: column.to_string(),
                rows,
            });
        }
        df.with_column(Series::new(column.into(), values))?;
        if rows == 0 {
            return Ok(ImputationReport {
                column: column.to_string(),
                filled: 0,
                fill_value: None,
                skipped: None,
            });
        }
        warn!(column, rows, "no observed values, leaving missing values in place");
        return Ok(ImputationReport::skipped(column, ImputationSkip::NoObservedValues));
    }

    let mean = observed.iter().sum::<f64>() / observed.len() as f64;
    let mut filled = 0usize;
    for value in &mut values {
        if value.is_none() {
            *value = Some(mean);
            filled += 1;
        }
    }
    df.with_column(Series::new(column.into(), values))?;
    debug!(column, filled, mean, "imputed missing values");

    Ok(ImputationReport {
        column: column.to_string(),
        filled,
        fill_value: Some(mean),
        skipped: None,
    })
}

/// Applies the configured imputation strategy.
pub fn apply_imputation(df: &mut DataFrame, config: &ImputationConfig) -> Result<ImputationReport> {
    match config.strategy {
        ImputationStrategy::Mean => impute_mean(df, &config.column, config.on_empty),
        ImputationStrategy::None => Ok(ImputationReport::skipped(
            &config.column,
            ImputationSkip::Disabled,
        )),
    }
}

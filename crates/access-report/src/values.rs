//! Column extraction with join-suffix resolution.

use access_ingest::{any_to_f64, any_to_string};
use access_model::columns::{feedback_column, profile_column, resolve_column};
use polars::prelude::{AnyValue, DataFrame};

/// Resolves a logical column against the merged schema.
///
/// The bare name wins, then the profile-side and feedback-side suffixed
/// names. `prefer_profile` puts the profile-side name first, which is what
/// demographic columns shared by both sources want.
pub(crate) fn resolve(df: &DataFrame, base: &str, prefer_profile: bool) -> Option<String> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let profile = profile_column(base);
    let feedback = feedback_column(base);
    let candidates: Vec<&str> = if prefer_profile {
        vec![profile.as_str(), base, feedback.as_str()]
    } else {
        vec![base, profile.as_str(), feedback.as_str()]
    };
    resolve_column(&names, &candidates).map(str::to_string)
}

/// String values of `column`, None for nulls and blanks.
pub(crate) fn text_values(df: &DataFrame, column: Option<&str>) -> Vec<Option<String>> {
    let Some(column) = column.and_then(|name| df.column(name).ok()) else {
        return vec![None; df.height()];
    };
    (0..df.height())
        .map(|row| match column.get(row) {
            Ok(AnyValue::Null) | Err(_) => None,
            Ok(value) => {
                let text = any_to_string(value);
                if text.trim().is_empty() { None } else { Some(text) }
            }
        })
        .collect()
}

/// Numeric values of `column`, None for nulls and non-numeric cells.
pub(crate) fn numeric_values(df: &DataFrame, column: Option<&str>) -> Vec<Option<f64>> {
    let Some(column) = column.and_then(|name| df.column(name).ok()) else {
        return vec![None; df.height()];
    };
    (0..df.height())
        .map(|row| column.get(row).ok().and_then(any_to_f64))
        .collect()
}

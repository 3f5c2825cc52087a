//! Order-preserving inner equi-join on `patient_id`.

use std::collections::{BTreeSet, HashMap, HashSet};

use access_model::columns::{PATIENT_ID, feedback_column, profile_column};
use polars::prelude::{DataFrame, DataType, IdxCa, IdxSize};
use tracing::debug;

use crate::error::{Result, TransformError};

/// Output of [`inner_join`].
#[derive(Debug)]
pub struct JoinResult {
    pub frame: DataFrame,
    /// Base names of columns that were suffixed on both sides.
    pub renamed: Vec<String>,
    /// Profile rows with no matching feedback.
    pub unmatched_profiles: usize,
    /// Feedback rows with no matching profile.
    pub unmatched_feedback: usize,
}

fn key_values(df: &DataFrame, side: &'static str) -> Result<Vec<i64>> {
    let column = df.column(PATIENT_ID).map_err(|_| TransformError::InvalidKey {
        side,
        reason: "column not found".to_string(),
    })?;
    if column.dtype() != &DataType::Int64 {
        return Err(TransformError::InvalidKey {
            side,
            reason: format!("expected Int64, found {}", column.dtype()),
        });
    }
    column
        .i64()?
        .into_iter()
        .enumerate()
        .map(|(row, key)| {
            key.ok_or_else(|| TransformError::InvalidKey {
                side,
                reason: format!("missing value at row {row}"),
            })
        })
        .collect()
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Finds colliding non-key names, in profile column order, and checks that
/// suffixing them cannot produce a name that already exists.
fn collisions(profile_names: &[String], feedback_names: &[String]) -> Result<Vec<String>> {
    let feedback_set: HashSet<&str> = feedback_names.iter().map(String::as_str).collect();
    let colliding: Vec<String> = profile_names
        .iter()
        .filter(|name| name.as_str() != PATIENT_ID && feedback_set.contains(name.as_str()))
        .cloned()
        .collect();

    let mut output: BTreeSet<String> = profile_names
        .iter()
        .chain(feedback_names.iter().filter(|name| name.as_str() != PATIENT_ID))
        .filter(|name| !colliding.contains(name))
        .cloned()
        .collect();
    for name in &colliding {
        for renamed in [profile_column(name), feedback_column(name)] {
            if !output.insert(renamed.clone()) {
                return Err(TransformError::DuplicateColumn { column: renamed });
            }
        }
    }
    Ok(colliding)
}

fn take_rows(df: &DataFrame, rows: Vec<IdxSize>) -> Result<DataFrame> {
    let idx = IdxCa::from_vec("idx".into(), rows);
    Ok(df.take(&idx)?)
}

/// Joins profiles and feedback on `patient_id`.
///
/// For each profile row in order, one output row is emitted per matching
/// feedback row in feedback order. Output columns are the profile columns
/// followed by the feedback columns minus the key. Non-key names present on
/// both sides become `<name>_profile` and `<name>_feedback`.
pub fn inner_join(profiles: &DataFrame, feedback: &DataFrame) -> Result<JoinResult> {
    let profile_keys = key_values(profiles, "profiles")?;
    let feedback_keys = key_values(feedback, "feedback")?;

    let mut feedback_rows: HashMap<i64, Vec<IdxSize>> = HashMap::new();
    for (row, key) in feedback_keys.iter().enumerate() {
        feedback_rows.entry(*key).or_default().push(row as IdxSize);
    }

    let mut left_rows: Vec<IdxSize> = Vec::new();
    let mut right_rows: Vec<IdxSize> = Vec::new();
    let mut unmatched_profiles = 0usize;
    for (row, key) in profile_keys.iter().enumerate() {
        match feedback_rows.get(key) {
            Some(matches) => {
                for matched in matches {
                    left_rows.push(row as IdxSize);
                    right_rows.push(*matched);
                }
            }
            None => unmatched_profiles += 1,
        }
    }
    let profile_key_set: HashSet<i64> = profile_keys.iter().copied().collect();
    let unmatched_feedback = feedback_keys
        .iter()
        .filter(|key| !profile_key_set.contains(key))
        .count();

    let profile_names = column_names(profiles);
    let feedback_names = column_names(feedback);
    let renamed = collisions(&profile_names, &feedback_names)?;

    let mut left = take_rows(profiles, left_rows)?;
    let mut right = take_rows(&feedback.drop(PATIENT_ID)?, right_rows)?;
    for name in &renamed {
        left.rename(name, profile_column(name).into())?;
        right.rename(name, feedback_column(name).into())?;
    }
    let frame = left.hstack(right.get_columns())?;

    debug!(
        merged_rows = frame.height(),
        unmatched_profiles,
        unmatched_feedback,
        renamed = ?renamed,
        "join complete"
    );
    Ok(JoinResult {
        frame,
        renamed,
        unmatched_profiles,
        unmatched_feedback,
    })
}

#[cfg(test)]
mod tests {
    use polars::prelude::{Column, IntoColumn, NamedFrom, Series};

    use super::*;

    fn frame(columns: Vec<Column>) -> DataFrame {
        DataFrame::new(columns).unwrap()
    }

    fn keys(df: &DataFrame) -> Vec<i64> {
        df.column(PATIENT_ID)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect()
    }

    #[test]
    fn emits_one_row_per_matching_feedback() {
        let profiles = frame(vec![
            Series::new("patient_id".into(), vec![2i64, 1, 3]).into_column(),
            Series::new("age".into(), vec![40i64, 30, 50]).into_column(),
        ]);
        let feedback = frame(vec![
            Series::new("patient_id".into(), vec![1i64, 2, 1, 9]).into_column(),
            Series::new("issue_type".into(), vec!["a", "b", "c", "d"]).into_column(),
        ]);
        let result = inner_join(&profiles, &feedback).unwrap();
        assert_eq!(keys(&result.frame), vec![2, 1, 1]);
        let issues: Vec<Option<&str>> = result
            .frame
            .column("issue_type")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(issues, vec![Some("b"), Some("a"), Some("c")]);
        assert_eq!(result.unmatched_profiles, 1);
        assert_eq!(result.unmatched_feedback, 1);
    }

    #[test]
    fn suffixes_colliding_columns_on_both_sides() {
        let profiles = frame(vec![
            Series::new("patient_id".into(), vec![1i64]).into_column(),
            Series::new("country".into(), vec!["FR"]).into_column(),
        ]);
        let feedback = frame(vec![
            Series::new("country".into(), vec!["BE"]).into_column(),
            Series::new("patient_id".into(), vec![1i64]).into_column(),
        ]);
        let result = inner_join(&profiles, &feedback).unwrap();
        assert_eq!(
            column_names(&result.frame),
            vec!["patient_id", "country_profile", "country_feedback"]
        );
        assert_eq!(result.renamed, vec!["country".to_string()]);
    }

    #[test]
    fn suffix_clash_is_rejected() {
        let profiles = frame(vec![
            Series::new("patient_id".into(), vec![1i64]).into_column(),
            Series::new("country".into(), vec!["FR"]).into_column(),
            Series::new("country_profile".into(), vec!["FR"]).into_column(),
        ]);
        let feedback = frame(vec![
            Series::new("patient_id".into(), vec![1i64]).into_column(),
            Series::new("country".into(), vec!["FR"]).into_column(),
        ]);
        let err = inner_join(&profiles, &feedback).unwrap_err();
        assert!(matches!(err, TransformError::DuplicateColumn { column } if column == "country_profile"));
    }

    #[test]
    fn non_integer_key_is_rejected() {
        let profiles = frame(vec![Series::new("patient_id".into(), vec!["1"]).into_column()]);
        let feedback = frame(vec![Series::new("patient_id".into(), vec![1i64]).into_column()]);
        let err = inner_join(&profiles, &feedback).unwrap_err();
        assert!(matches!(err, TransformError::InvalidKey { side: "profiles", .. }));
    }

    #[test]
    fn disjoint_keys_produce_empty_frame_with_schema() {
        let profiles = frame(vec![
            Series::new("patient_id".into(), vec![1i64]).into_column(),
            Series::new("country".into(), vec!["FR"]).into_column(),
        ]);
        let feedback = frame(vec![
            Series::new("patient_id".into(), vec![2i64]).into_column(),
            Series::new("satisfaction_score".into(), vec![Some(4.0f64)]).into_column(),
        ]);
        let result = inner_join(&profiles, &feedback).unwrap();
        assert_eq!(result.frame.height(), 0);
        assert_eq!(
            column_names(&result.frame),
            vec!["patient_id", "country", "satisfaction_score"]
        );
    }
}

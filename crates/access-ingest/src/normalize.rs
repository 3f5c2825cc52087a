//! Feedback normalization.

use access_model::columns::SURROGATE_ID;
use polars::prelude::DataFrame;
use tracing::debug;

use crate::error::Result;

/// Drops the store-generated surrogate identifier, if present.
///
/// Row count and every other column are left untouched.
pub fn normalize_feedback(df: DataFrame) -> Result<DataFrame> {
    let has_surrogate = df
        .get_column_names()
        .iter()
        .any(|name| name.as_str() == SURROGATE_ID);
    if !has_surrogate {
        return Ok(df);
    }
    debug!(column = SURROGATE_ID, "dropping surrogate identifier");
    Ok(df.drop(SURROGATE_ID)?)
}

#[cfg(test)]
mod tests {
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    use super::*;

    #[test]
    fn removes_surrogate_column() {
        let df = DataFrame::new(vec![
            Series::new("_id".into(), vec!["a1", "b2"]).into_column(),
            Series::new("patient_id".into(), vec![1i64, 2]).into_column(),
            Series::new("issue_type".into(), vec!["audio", "layout"]).into_column(),
        ])
        .unwrap();
        let normalized = normalize_feedback(df).unwrap();
        let names: Vec<&str> = normalized
            .get_column_names()
            .iter()
            .map(|name| name.as_str())
            .collect();
        assert_eq!(names, vec!["patient_id", "issue_type"]);
        assert_eq!(normalized.height(), 2);
    }

    #[test]
    fn absent_surrogate_is_a_no_op() {
        let df = DataFrame::new(vec![
            Series::new("patient_id".into(), vec![1i64]).into_column(),
        ])
        .unwrap();
        let normalized = normalize_feedback(df.clone()).unwrap();
        assert!(normalized.equals_missing(&df));
        let again = normalize_feedback(normalized).unwrap();
        assert!(again.equals_missing(&df));
    }
}

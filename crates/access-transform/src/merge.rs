//! Join followed by imputation.

use std::time::Instant;

use access_model::ImputationConfig;
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{info, info_span};

use crate::error::Result;
use crate::impute::{ImputationReport, apply_imputation};
use crate::join::inner_join;

/// Counts describing one merge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeStats {
    pub profile_rows: usize,
    pub feedback_rows: usize,
    pub merged_rows: usize,
    pub unmatched_profiles: usize,
    pub unmatched_feedback: usize,
    /// Base names suffixed with `_profile` / `_feedback`.
    pub renamed_columns: Vec<String>,
    pub imputation: ImputationReport,
}

/// The merged frame and its statistics.
#[derive(Debug)]
pub struct MergeOutcome {
    pub frame: DataFrame,
    pub stats: MergeStats,
}

/// Joins profiles with feedback and imputes the score column.
pub fn merge(
    profiles: &DataFrame,
    feedback: &DataFrame,
    imputation: &ImputationConfig,
) -> Result<MergeOutcome> {
    let span = info_span!(
        "merge",
        profile_rows = profiles.height(),
        feedback_rows = feedback.height()
    );
    let _guard = span.enter();
    let start = Instant::now();

    let joined = inner_join(profiles, feedback)?;
    let mut frame = joined.frame;
    let report = apply_imputation(&mut frame, imputation)?;

    let stats = MergeStats {
        profile_rows: profiles.height(),
        feedback_rows: feedback.height(),
        merged_rows: frame.height(),
        unmatched_profiles: joined.unmatched_profiles,
        unmatched_feedback: joined.unmatched_feedback,
        renamed_columns: joined.renamed,
        imputation: report,
    };
    info!(
        merged_rows = stats.merged_rows,
        unmatched_profiles = stats.unmatched_profiles,
        unmatched_feedback = stats.unmatched_feedback,
        imputed = stats.imputation.filled,
        duration_ms = start.elapsed().as_millis(),
        "merge complete"
    );
    Ok(MergeOutcome { frame, stats })
}

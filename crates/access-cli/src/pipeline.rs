//! Pipeline with explicit stages.
//!
//! 1. **Load**: read profiles and feedback from their configured sources
//! 2. **Merge**: inner join on `patient_id`, then impute the score column
//! 3. **Persist**: full refresh of the output table (skipped on dry runs)
//!
//! Each stage logs inside its own span; data values only reach the logs
//! through [`redact_value`](crate::logging::redact_value).

use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{info, info_span, trace};

use access_ingest::{any_to_string, feedback_source, profile_source};
use access_model::columns::PATIENT_ID;
use access_model::{OutputConfig, PipelineConfig};
use access_store::{PersistReport, fingerprint, persist};
use access_transform::{MergeStats, merge};

use crate::logging::{log_data_enabled, redact_value};

/// Result of one pipeline run.
#[derive(Debug)]
pub struct PipelineResult {
    /// Where profiles were read from.
    pub profiles: String,
    /// Where feedback was read from.
    pub feedback: String,
    pub output: OutputConfig,
    pub stats: MergeStats,
    /// Fingerprint of the merged frame, identical to what a persist would record.
    pub fingerprint: String,
    /// `None` on dry runs.
    pub persisted: Option<PersistReport>,
    pub frame: DataFrame,
}

impl PipelineResult {
    pub fn dry_run(&self) -> bool {
        self.persisted.is_none()
    }
}

/// Runs load, merge and persist for `config`.
///
/// With `dry_run` the merged frame is computed and fingerprinted but the
/// output database is left untouched.
pub fn run_pipeline(config: &PipelineConfig, dry_run: bool) -> Result<PipelineResult> {
    let span = info_span!("pipeline", dry_run);
    let _guard = span.enter();
    let start = Instant::now();
    config.validate().context("invalid pipeline configuration")?;

    // Load
    let profile_source = profile_source(&config.profiles);
    let feedback_source = feedback_source(&config.feedback);
    let profiles_label = profile_source.describe();
    let feedback_label = feedback_source.describe();
    let profiles = profile_source
        .load_profiles()
        .with_context(|| format!("load profiles from {profiles_label}"))?;
    let feedback = feedback_source
        .load_feedback()
        .with_context(|| format!("load feedback from {feedback_label}"))?;

    // Merge
    let outcome = merge(&profiles, &feedback, &config.imputation).context("merge sources")?;
    trace_sample_keys(&outcome.frame);
    let digest = fingerprint(&outcome.frame);

    // Persist
    let persisted = if dry_run {
        info!(table = %config.output.table, "dry run, output not written");
        None
    } else {
        let report = persist(&config.output.database, &config.output.table, &outcome.frame)
            .with_context(|| {
                format!(
                    "persist {} to {}",
                    config.output.table,
                    config.output.database.display()
                )
            })?;
        Some(report)
    };

    info!(
        merged_rows = outcome.stats.merged_rows,
        fingerprint = %digest,
        duration_ms = start.elapsed().as_millis(),
        "pipeline complete"
    );
    Ok(PipelineResult {
        profiles: profiles_label,
        feedback: feedback_label,
        output: config.output.clone(),
        stats: outcome.stats,
        fingerprint: digest,
        persisted,
        frame: outcome.frame,
    })
}

fn trace_sample_keys(df: &DataFrame) {
    if !log_data_enabled() {
        return;
    }
    let Ok(column) = df.column(PATIENT_ID) else {
        return;
    };
    for row in 0..df.height().min(5) {
        if let Ok(value) = column.get(row) {
            let value = any_to_string(value);
            trace!(row, patient_id = redact_value(&value), "merged row");
        }
    }
}

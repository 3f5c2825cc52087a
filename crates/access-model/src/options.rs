//! Imputation options for the join stage.

use serde::{Deserialize, Serialize};

use crate::columns::SATISFACTION_SCORE;

/// How missing scores are filled after the join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationStrategy {
    /// Fill with the arithmetic mean of the non-missing values.
    #[default]
    Mean,
    /// Leave missing values in place.
    None,
}

/// What to do when every score in the joined result is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyMeanPolicy {
    /// Keep the nulls and log a warning.
    #[default]
    LeaveMissing,
    /// Abort the run.
    Fail,
}

/// Imputation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImputationConfig {
    pub strategy: ImputationStrategy,
    /// Column to impute. Resolved against the joined schema.
    pub column: String,
    pub on_empty: EmptyMeanPolicy,
}

impl Default for ImputationConfig {
    fn default() -> Self {
        Self {
            strategy: ImputationStrategy::Mean,
            column: SATISFACTION_SCORE.to_string(),
            on_empty: EmptyMeanPolicy::LeaveMissing,
        }
    }
}

impl ImputationConfig {
    pub fn with_strategy(mut self, strategy: ImputationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_on_empty(mut self, policy: EmptyMeanPolicy) -> Self {
        self.on_empty = policy;
        self
    }
}

//! Join and imputation engine.
//!
//! Profiles and feedback are joined on `patient_id` (inner, order
//! preserving), colliding column names are suffixed, and the score column
//! is filled with its post-join mean.

pub mod error;
pub mod impute;
pub mod join;
pub mod merge;

pub use error::{Result, TransformError};
pub use impute::{ImputationReport, ImputationSkip, apply_imputation, impute_mean};
pub use join::{JoinResult, inner_join};
pub use merge::{MergeOutcome, MergeStats, merge};

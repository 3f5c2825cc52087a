//! Shared vocabulary for the accessibility feedback pipeline.
//!
//! This crate holds the pieces every stage agrees on: well-known column
//! names, pipeline configuration, and imputation options. It has no Polars
//! dependency so configuration can be loaded and validated before any data
//! is touched.

pub mod columns;
pub mod config;
pub mod error;
pub mod options;

pub use config::{FeedbackSourceConfig, OutputConfig, PipelineConfig, ProfileSourceConfig};
pub use error::{ConfigError, Result};
pub use options::{EmptyMeanPolicy, ImputationConfig, ImputationStrategy};

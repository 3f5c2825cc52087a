//! Pipeline configuration.
//!
//! Every location the pipeline touches is named here rather than baked into
//! the stages. A [`PipelineConfig`] can be built in code, loaded from TOML,
//! or assembled from CLI flags on top of either.
//!
//! ```toml
//! [profiles]
//! kind = "sqlite"
//! database = "access_project.db"
//! table = "patient_profiles"
//!
//! [feedback]
//! kind = "documents"
//! path = "feedback.json"
//!
//! [output]
//! database = "access_project.db"
//! table = "merged_access_data"
//!
//! [imputation]
//! strategy = "mean"
//! on_empty = "fail"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::columns::{
    DEFAULT_DATABASE, DEFAULT_FEEDBACK_CSV, DEFAULT_MERGED_TABLE, DEFAULT_PROFILES_CSV,
    DEFAULT_PROFILES_TABLE,
};
use crate::error::{ConfigError, Result};
use crate::options::ImputationConfig;

/// Where profile records come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProfileSourceConfig {
    /// A CSV file with a header row.
    Csv { path: PathBuf },
    /// A table inside a SQLite database.
    Sqlite {
        database: PathBuf,
        #[serde(default = "default_profiles_table")]
        table: String,
    },
}

/// Where feedback records come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedbackSourceConfig {
    /// A flattened CSV export.
    Csv { path: PathBuf },
    /// A document collection export (JSON array or newline-delimited JSON).
    Documents { path: PathBuf },
}

/// Destination of the joined table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub database: PathBuf,
    pub table: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            table: DEFAULT_MERGED_TABLE.to_string(),
        }
    }
}

/// Complete configuration for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub profiles: ProfileSourceConfig,
    pub feedback: FeedbackSourceConfig,
    pub output: OutputConfig,
    pub imputation: ImputationConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            profiles: ProfileSourceConfig::Csv {
                path: PathBuf::from(DEFAULT_PROFILES_CSV),
            },
            feedback: FeedbackSourceConfig::Csv {
                path: PathBuf::from(DEFAULT_FEEDBACK_CSV),
            },
            output: OutputConfig::default(),
            imputation: ImputationConfig::default(),
        }
    }
}

fn default_profiles_table() -> String {
    DEFAULT_PROFILES_TABLE.to_string()
}

impl PipelineConfig {
    /// Parses a configuration from TOML text.
    ///
    /// `origin` is only used in error messages.
    pub fn from_toml_str(contents: &str, origin: &Path) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents, path)
    }

    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.output.table.trim().is_empty() {
            return Err(ConfigError::Invalid("output table name is empty".into()));
        }
        if let ProfileSourceConfig::Sqlite { table, .. } = &self.profiles
            && table.trim().is_empty()
        {
            return Err(ConfigError::Invalid("profile table name is empty".into()));
        }
        if self.imputation.column.trim().is_empty() {
            return Err(ConfigError::Invalid("imputation column is empty".into()));
        }
        Ok(())
    }
}

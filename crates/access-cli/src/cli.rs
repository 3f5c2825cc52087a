//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use access_model::columns::{DEFAULT_DATABASE, DEFAULT_MERGED_TABLE, DEFAULT_PROFILES_TABLE};

#[derive(Parser)]
#[command(
    name = "access-cli",
    version,
    about = "Merge patient profiles with accessibility feedback",
    long_about = "Merge patient profiles with accessibility feedback.\n\n\
                  Profiles and feedback are joined on patient_id, missing\n\
                  satisfaction scores are imputed with the mean, and the result\n\
                  replaces a table in a SQLite database."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow patient-level values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Join profiles with feedback and persist the merged table.
    Merge(MergeArgs),

    /// Load a profile CSV into a SQLite table.
    StageProfiles(StageArgs),

    /// Summarize the persisted merged table.
    Report(ReportArgs),
}

#[derive(Parser)]
pub struct MergeArgs {
    /// TOML pipeline configuration. Flags below override its values.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Profile source. A .db/.sqlite file selects the SQLite source.
    #[arg(long = "profiles", value_name = "PATH")]
    pub profiles: Option<PathBuf>,

    /// Table holding profiles when the profile source is SQLite.
    #[arg(long = "profiles-table", value_name = "NAME")]
    pub profiles_table: Option<String>,

    /// Feedback source.
    #[arg(long = "feedback", value_name = "PATH")]
    pub feedback: Option<PathBuf>,

    /// Feedback format (inferred from the extension when omitted).
    #[arg(long = "feedback-format", value_enum)]
    pub feedback_format: Option<FeedbackFormatArg>,

    /// Output SQLite database.
    #[arg(long = "database", value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Output table, replaced on every run.
    #[arg(long = "table", value_name = "NAME")]
    pub table: Option<String>,

    /// Imputation strategy for satisfaction scores.
    #[arg(long = "impute", value_enum)]
    pub impute: Option<ImputeArg>,

    /// Fail instead of warning when no score is available to average.
    #[arg(long = "fail-on-empty-mean")]
    pub fail_on_empty_mean: bool,

    /// Compute and summarize without writing the output table.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct StageArgs {
    /// Profile CSV to stage.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    #[arg(long = "database", value_name = "PATH", default_value = DEFAULT_DATABASE)]
    pub database: PathBuf,

    #[arg(long = "table", value_name = "NAME", default_value = DEFAULT_PROFILES_TABLE)]
    pub table: String,
}

#[derive(Parser)]
pub struct ReportArgs {
    #[arg(long = "database", value_name = "PATH", default_value = DEFAULT_DATABASE)]
    pub database: PathBuf,

    #[arg(long = "table", value_name = "NAME", default_value = DEFAULT_MERGED_TABLE)]
    pub table: String,

    /// Restrict the report to one country.
    #[arg(long = "country", value_name = "NAME")]
    pub country: Option<String>,

    /// Rows shown in the data preview.
    #[arg(long = "preview-rows", value_name = "N", default_value_t = 100)]
    pub preview_rows: usize,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ReportFormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FeedbackFormatArg {
    Csv,
    Documents,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ImputeArg {
    Mean,
    None,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

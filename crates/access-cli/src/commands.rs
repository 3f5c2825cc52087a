use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, info_span};

use access_cli::logging::redact_value;
use access_cli::pipeline::{PipelineResult, run_pipeline};
use access_model::columns::DEFAULT_PROFILES_TABLE;
use access_model::{
    EmptyMeanPolicy, FeedbackSourceConfig, ImputationStrategy, PipelineConfig,
    ProfileSourceConfig,
};
use access_report::{ReportOptions, build_report};
use access_store::{PersistReport, load_table, stage_profiles};

use crate::cli::{FeedbackFormatArg, ImputeArg, MergeArgs, ReportArgs, ReportFormatArg, StageArgs};
use crate::summary::print_report;

pub fn run_merge(args: &MergeArgs) -> Result<PipelineResult> {
    let config = resolve_config(args)?;
    debug!(?config, "resolved pipeline configuration");
    run_pipeline(&config, args.dry_run)
}

pub fn run_stage_profiles(args: &StageArgs) -> Result<PersistReport> {
    stage_profiles(&args.csv, &args.database, &args.table).with_context(|| {
        format!(
            "stage {} into {}",
            args.csv.display(),
            args.database.display()
        )
    })
}

pub fn run_report(args: &ReportArgs) -> Result<()> {
    let span = info_span!("report", table = %args.table);
    let _guard = span.enter();
    if let Some(country) = &args.country {
        debug!(country = redact_value(country), "country filter");
    }

    let frame = load_table(&args.database, &args.table)
        .with_context(|| format!("read {} from {}", args.table, args.database.display()))?;
    let mut options = ReportOptions::default().with_preview_rows(args.preview_rows);
    if let Some(country) = &args.country {
        options = options.with_country(country.clone());
    }
    let report = build_report(&frame, &options);

    match args.format {
        ReportFormatArg::Table => print_report(&report),
        ReportFormatArg::Json => {
            let json = serde_json::to_string_pretty(&report).context("serialize report")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Builds the run configuration: the config file (or defaults), then flags.
fn resolve_config(args: &MergeArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_toml_file(path)
            .with_context(|| format!("load configuration {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(path) = &args.profiles {
        config.profiles = if is_sqlite_path(path) {
            ProfileSourceConfig::Sqlite {
                database: path.clone(),
                table: args
                    .profiles_table
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PROFILES_TABLE.to_string()),
            }
        } else {
            ProfileSourceConfig::Csv { path: path.clone() }
        };
    }
    if let Some(name) = &args.profiles_table {
        match &mut config.profiles {
            ProfileSourceConfig::Sqlite { table, .. } => table.clone_from(name),
            ProfileSourceConfig::Csv { .. } => {
                bail!("--profiles-table requires a SQLite profile source")
            }
        }
    }

    if let Some(path) = &args.feedback {
        let format = args.feedback_format.unwrap_or_else(|| infer_feedback_format(path));
        config.feedback = feedback_config(format, path);
    } else if let Some(format) = args.feedback_format {
        let path = match &config.feedback {
            FeedbackSourceConfig::Csv { path } | FeedbackSourceConfig::Documents { path } => {
                path.clone()
            }
        };
        config.feedback = feedback_config(format, &path);
    }

    if let Some(database) = &args.database {
        config.output.database.clone_from(database);
    }
    if let Some(table) = &args.table {
        config.output.table.clone_from(table);
    }
    if let Some(impute) = args.impute {
        config.imputation.strategy = match impute {
            ImputeArg::Mean => ImputationStrategy::Mean,
            ImputeArg::None => ImputationStrategy::None,
        };
    }
    if args.fail_on_empty_mean {
        config.imputation.on_empty = EmptyMeanPolicy::Fail;
    }

    config.validate().context("invalid pipeline configuration")?;
    Ok(config)
}

fn feedback_config(format: FeedbackFormatArg, path: &Path) -> FeedbackSourceConfig {
    let path = path.to_path_buf();
    match format {
        FeedbackFormatArg::Csv => FeedbackSourceConfig::Csv { path },
        FeedbackFormatArg::Documents => FeedbackSourceConfig::Documents { path },
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

fn is_sqlite_path(path: &Path) -> bool {
    matches!(extension(path).as_str(), "db" | "sqlite" | "sqlite3")
}

fn infer_feedback_format(path: &Path) -> FeedbackFormatArg {
    match extension(path).as_str() {
        "json" | "ndjson" | "jsonl" => FeedbackFormatArg::Documents,
        _ => FeedbackFormatArg::Csv,
    }
}

//! Dashboard report assembly.

use std::collections::BTreeSet;

use access_ingest::any_to_string;
use access_model::columns::{
    ACCESSIBILITY_TYPE, AGE, COUNTRY, DEVICE_TYPE, GENDER, ISSUE_TYPE, PATIENT_ID,
    SATISFACTION_SCORE,
};
use polars::prelude::{AnyValue, DataFrame};
use serde::Serialize;
use tracing::{debug, info_span};

use crate::stats::{category_means, histogram, shares, value_counts};
use crate::values::{numeric_values, resolve, text_values};

/// Options controlling report computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Restrict the report to one country. `None` selects every row.
    pub country: Option<String>,
    /// Number of leading rows included in the preview.
    pub preview_rows: usize,
    pub top_countries: usize,
    pub top_issue_types: usize,
    pub age_bins: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            country: None,
            preview_rows: 100,
            top_countries: 10,
            top_issue_types: 6,
            age_bins: 20,
        }
    }
}

impl ReportOptions {
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }
}

/// Headline figures for the selected rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub patients: usize,
    pub countries: usize,
    pub accessibility_types: usize,
    pub average_satisfaction: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMean {
    pub label: String,
    pub mean: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Leading rows rendered as strings; nulls are empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Everything the dashboard displays for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub country_filter: Option<String>,
    pub available_countries: Vec<String>,
    pub total_rows: usize,
    pub selected_rows: usize,
    pub kpis: Kpis,
    pub top_countries: Vec<CategoryCount>,
    pub satisfaction_by_accessibility: Vec<CategoryMean>,
    pub gender_balance: Vec<CategoryShare>,
    pub issue_types: Vec<CategoryCount>,
    pub age_histogram: Vec<HistogramBin>,
    pub device_usage: Vec<CategoryCount>,
    pub preview: Preview,
}

/// Logical columns resolved against a concrete schema.
struct ResolvedColumns {
    country: Option<String>,
    patient: Option<String>,
    accessibility: Option<String>,
    score: Option<String>,
    gender: Option<String>,
    issue: Option<String>,
    age: Option<String>,
    device: Option<String>,
}

impl ResolvedColumns {
    fn resolve(df: &DataFrame) -> Self {
        Self {
            country: resolve(df, COUNTRY, true),
            patient: resolve(df, PATIENT_ID, false),
            accessibility: resolve(df, ACCESSIBILITY_TYPE, false),
            score: resolve(df, SATISFACTION_SCORE, false),
            gender: resolve(df, GENDER, true),
            issue: resolve(df, ISSUE_TYPE, false),
            age: resolve(df, AGE, true),
            device: resolve(df, DEVICE_TYPE, false),
        }
    }
}

/// Computes the dashboard for `df`.
///
/// Never fails: absent columns produce empty breakdowns and an empty
/// selection produces zero KPIs.
pub fn build_report(df: &DataFrame, options: &ReportOptions) -> DashboardReport {
    let span = info_span!(
        "build_report",
        rows = df.height(),
        country = options.country.as_deref().unwrap_or("all")
    );
    let _guard = span.enter();

    let columns = ResolvedColumns::resolve(df);
    let countries = text_values(df, columns.country.as_deref());

    let available_countries: Vec<String> = countries
        .iter()
        .flatten()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let selected: Vec<usize> = match options.country.as_deref() {
        None => (0..df.height()).collect(),
        Some(filter) => countries
            .iter()
            .enumerate()
            .filter(|(_, value)| value.as_deref() == Some(filter))
            .map(|(row, _)| row)
            .collect(),
    };

    let text = |column: &Option<String>| pick(&text_values(df, column.as_deref()), &selected);
    let countries = pick(&countries, &selected);
    let patients = text(&columns.patient);
    let accessibility = text(&columns.accessibility);
    let genders = text(&columns.gender);
    let issues = text(&columns.issue);
    let devices = text(&columns.device);

    let all_scores = numeric_values(df, columns.score.as_deref());
    let scores: Vec<Option<f64>> = selected.iter().map(|&row| all_scores[row]).collect();
    let all_ages = numeric_values(df, columns.age.as_deref());
    let ages = selected.iter().filter_map(|&row| all_ages[row]);

    let kpis = Kpis {
        patients: distinct(&patients),
        countries: distinct(&countries),
        accessibility_types: distinct(&accessibility),
        average_satisfaction: mean(&scores),
    };

    let report = DashboardReport {
        country_filter: options.country.clone(),
        available_countries,
        total_rows: df.height(),
        selected_rows: selected.len(),
        kpis,
        top_countries: value_counts(as_strs(&countries), Some(options.top_countries)),
        satisfaction_by_accessibility: category_means(
            as_strs(&accessibility).zip(scores.iter().copied()),
        ),
        gender_balance: shares(as_strs(&genders)),
        issue_types: value_counts(as_strs(&issues), Some(options.top_issue_types)),
        age_histogram: histogram(ages, options.age_bins),
        device_usage: value_counts(as_strs(&devices), None),
        preview: preview(df, &selected, options.preview_rows),
    };

    debug!(
        selected = report.selected_rows,
        countries = report.available_countries.len(),
        "dashboard computed"
    );
    report
}

fn pick(values: &[Option<String>], selected: &[usize]) -> Vec<Option<String>> {
    selected.iter().map(|&row| values[row].clone()).collect()
}

fn as_strs(values: &[Option<String>]) -> impl Iterator<Item = Option<&str>> {
    values.iter().map(|value| value.as_deref())
}

fn distinct(values: &[Option<String>]) -> usize {
    values.iter().flatten().collect::<BTreeSet<_>>().len()
}

fn mean(values: &[Option<f64>]) -> Option<f64> {
    let observed: Vec<f64> = values.iter().flatten().copied().collect();
    if observed.is_empty() {
        return None;
    }
    Some(observed.iter().sum::<f64>() / observed.len() as f64)
}

fn preview(df: &DataFrame, selected: &[usize], limit: usize) -> Preview {
    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let rows = selected
        .iter()
        .take(limit)
        .map(|&row| {
            df.get_columns()
                .iter()
                .map(|column| match column.get(row) {
                    Ok(AnyValue::Null) | Err(_) => String::new(),
                    Ok(value) => any_to_string(value),
                })
                .collect()
        })
        .collect();
    Preview { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, IntoColumn, NamedFrom, Series};

    fn merged() -> DataFrame {
        DataFrame::new(vec![
            Series::new("patient_id".into(), vec![1i64, 2, 3, 4]).into_column(),
            Series::new(
                "country_profile".into(),
                vec!["France", "Spain", "France", "Italy"],
            )
            .into_column(),
            Series::new(
                "country_feedback".into(),
                vec!["FR", "ES", "FR", "IT"],
            )
            .into_column(),
            Series::new("accessibility_type".into(), vec!["visual", "motor", "visual", "hearing"])
                .into_column(),
            Series::new(
                "satisfaction_score".into(),
                vec![Some(4.0), Some(2.0), Some(5.0), None],
            )
            .into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn unfiltered_report_counts_everything() {
        let report = build_report(&merged(), &ReportOptions::default());
        assert_eq!(report.selected_rows, 4);
        assert_eq!(report.kpis.patients, 4);
        assert_eq!(report.kpis.countries, 3);
        assert_eq!(report.kpis.accessibility_types, 3);
        let avg = report.kpis.average_satisfaction.unwrap();
        assert!((avg - 11.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.available_countries, vec!["France", "Italy", "Spain"]);
        assert_eq!(report.top_countries[0].label, "France");
    }

    #[test]
    fn profile_country_wins_over_feedback_country() {
        let report = build_report(&merged(), &ReportOptions::default().with_country("France"));
        assert_eq!(report.selected_rows, 2);
        assert_eq!(report.kpis.countries, 1);
        assert!((report.kpis.average_satisfaction.unwrap() - 4.5).abs() < 1e-9);
        // available countries ignore the filter
        assert_eq!(report.available_countries.len(), 3);
    }

    #[test]
    fn unknown_country_selects_nothing() {
        let report = build_report(&merged(), &ReportOptions::default().with_country("Narnia"));
        assert_eq!(report.selected_rows, 0);
        assert_eq!(report.kpis.patients, 0);
        assert_eq!(report.kpis.average_satisfaction, None);
        assert!(report.top_countries.is_empty());
        assert!(report.preview.rows.is_empty());
        assert_eq!(report.preview.columns.len(), 5);
    }

    #[test]
    fn missing_columns_yield_empty_breakdowns() {
        let df = DataFrame::new(vec![
            Series::new("patient_id".into(), vec![1i64, 2]).into_column(),
        ])
        .unwrap();
        let report = build_report(&df, &ReportOptions::default());
        assert_eq!(report.kpis.patients, 2);
        assert_eq!(report.kpis.countries, 0);
        assert!(report.available_countries.is_empty());
        assert!(report.gender_balance.is_empty());
        assert!(report.age_histogram.is_empty());
        assert!(report.device_usage.is_empty());
    }

    #[test]
    fn preview_is_truncated_and_renders_nulls_empty() {
        let report = build_report(&merged(), &ReportOptions::default().with_preview_rows(4));
        assert_eq!(report.preview.rows.len(), 4);
        assert_eq!(report.preview.rows[3][4], "");
        let short = build_report(&merged(), &ReportOptions::default().with_preview_rows(1));
        assert_eq!(short.preview.rows.len(), 1);
        assert_eq!(short.preview.rows[0][1], "France");
    }

    #[test]
    fn empty_frame_is_a_zero_state() {
        let df = DataFrame::new(Vec::<Column>::new()).unwrap();
        let report = build_report(&df, &ReportOptions::default());
        assert_eq!(report.total_rows, 0);
        assert_eq!(report.kpis.average_satisfaction, None);
        assert!(report.preview.columns.is_empty());
    }
}

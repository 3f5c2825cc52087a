//! Dashboard metrics for the merged accessibility dataset.
//!
//! The report layer only reads the persisted join. It resolves columns that
//! the join may have suffixed, applies an optional country filter and
//! computes the KPIs and breakdowns a dashboard shows. Missing columns and
//! empty selections produce zero-state values rather than errors.

mod report;
mod stats;
mod values;

pub use report::{
    CategoryCount, CategoryMean, CategoryShare, DashboardReport, HistogramBin, Kpis, Preview,
    ReportOptions, build_report,
};
pub use stats::{category_means, histogram, shares, value_counts};

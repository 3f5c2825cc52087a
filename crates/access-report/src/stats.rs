//! Aggregations behind the dashboard breakdowns.

use std::collections::BTreeMap;

use crate::report::{CategoryCount, CategoryMean, CategoryShare, HistogramBin};

/// Counts non-missing labels, most frequent first.
///
/// Ties are broken by label so the ordering never depends on input order.
/// `limit` keeps only the leading entries.
pub fn value_counts<'a, I>(values: I, limit: Option<usize>) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values.into_iter().flatten() {
        *counts.entry(value).or_default() += 1;
    }
    let mut entries: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(label, count)| CategoryCount {
            label: label.to_string(),
            count,
        })
        .collect();
    // BTreeMap iteration is label-ascending, so a stable sort keeps ties ordered.
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    if let Some(limit) = limit {
        entries.truncate(limit);
    }
    entries
}

/// Value counts with each label's percentage of the counted total.
pub fn shares<'a, I>(values: I) -> Vec<CategoryShare>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let counts = value_counts(values, None);
    let total: usize = counts.iter().map(|entry| entry.count).sum();
    counts
        .into_iter()
        .map(|entry| CategoryShare {
            percent: entry.count as f64 * 100.0 / total as f64,
            label: entry.label,
            count: entry.count,
        })
        .collect()
}

/// Mean of `value` grouped by `label`, ordered by label.
///
/// Pairs missing either side are skipped.
pub fn category_means<'a, I>(pairs: I) -> Vec<CategoryMean>
where
    I: IntoIterator<Item = (Option<&'a str>, Option<f64>)>,
{
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for (label, value) in pairs {
        if let (Some(label), Some(value)) = (label, value) {
            let entry = groups.entry(label).or_default();
            entry.0 += value;
            entry.1 += 1;
        }
    }
    groups
        .into_iter()
        .map(|(label, (sum, count))| CategoryMean {
            label: label.to_string(),
            mean: sum / count as f64,
            count,
        })
        .collect()
}

/// Equal-width histogram over the observed range.
///
/// The last bin is closed on the right. A single distinct value is centred
/// in a unit-wide range. No observations yields no bins.
pub fn histogram<I>(values: I, bins: usize) -> Vec<HistogramBin>
where
    I: IntoIterator<Item = f64>,
{
    let values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for value in values {
        let index = (((value - lo) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(index, count)| HistogramBin {
            lower: lo + width * index as f64,
            upper: if index + 1 == bins {
                hi
            } else {
                lo + width * (index + 1) as f64
            },
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_order_by_frequency_then_label() {
        let values = ["b", "a", "c", "b", "a", "d"];
        let counts = value_counts(values.iter().map(|v| Some(*v)), None);
        let labels: Vec<&str> = counts.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b", "c", "d"]);
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[2].count, 1);
    }

    #[test]
    fn counts_skip_missing_and_respect_limit() {
        let values = [Some("x"), None, Some("y"), Some("x"), None];
        let counts = value_counts(values, Some(1));
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].label, "x");
        assert_eq!(counts[0].count, 2);
    }

    #[test]
    fn shares_sum_to_one_hundred() {
        let values = [Some("F"), Some("M"), Some("F"), Some("F")];
        let shares = shares(values);
        assert_eq!(shares[0].label, "F");
        assert!((shares[0].percent - 75.0).abs() < 1e-9);
        let total: f64 = shares.iter().map(|s| s.percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn means_skip_incomplete_pairs() {
        let pairs = [
            (Some("visual"), Some(4.0)),
            (Some("visual"), Some(2.0)),
            (Some("motor"), None),
            (None, Some(5.0)),
            (Some("hearing"), Some(5.0)),
        ];
        let means = category_means(pairs);
        assert_eq!(means.len(), 2);
        assert_eq!(means[0].label, "hearing");
        assert_eq!(means[1].label, "visual");
        assert!((means[1].mean - 3.0).abs() < 1e-9);
        assert_eq!(means[1].count, 2);
    }

    #[test]
    fn histogram_covers_every_value() {
        let bins = histogram([20.0, 30.0, 40.0, 60.0], 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 4);
        assert!((bins[0].lower - 20.0).abs() < 1e-9);
        assert!((bins[3].upper - 60.0).abs() < 1e-9);
        // the maximum lands in the closed last bin
        assert_eq!(bins[3].count, 1);
    }

    #[test]
    fn histogram_handles_degenerate_input() {
        assert!(histogram(Vec::<f64>::new(), 20).is_empty());
        let single = histogram([42.0, 42.0], 20);
        assert_eq!(single.len(), 20);
        assert_eq!(single.iter().map(|b| b.count).sum::<usize>(), 2);
        assert!((single[0].lower - 41.5).abs() < 1e-9);
    }
}

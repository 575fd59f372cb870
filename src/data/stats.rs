//! Distribution statistics behind the case-count density chart.

use std::collections::BTreeSet;

use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

use super::aggregate::{ranked_surgeries, RankDirection};
use super::model::FilteredView;

/// Fewest points worth plotting.
pub const DEFAULT_MIN_POINTS: usize = 3;

/// Flat series draw no density curve.
pub const DEFAULT_REQUIRE_VARIANCE: bool = true;

/// Tukey fence multiplier.
const FENCE: f64 = 1.5;

/// Grid padding, in bandwidths, on both sides of the data range.
const KDE_CUT: f64 = 3.0;

// ---------------------------------------------------------------------------
// Quantiles and outlier fences
// ---------------------------------------------------------------------------

/// Percentile using linear interpolation (NumPy / pandas default).
///
/// `sorted_values` must be ascending. Returns NaN for an empty slice.
pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    let n = sorted_values.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted_values[0];
    }

    let rank = (p / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(n - 1);
    let frac = rank - lower as f64;

    if lower == upper {
        sorted_values[lower]
    } else {
        sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
    }
}

/// Quartiles and the Tukey fence derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBounds {
    /// Inclusive on both ends.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// `[Q1 - 1.5·IQR, Q3 + 1.5·IQR]` of `series`, or `None` when it is empty.
pub fn outlier_bounds(series: &[f64]) -> Option<OutlierBounds> {
    if series.is_empty() {
        return None;
    }
    let mut sorted = series.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q1 = percentile(&sorted, 25.0);
    let q3 = percentile(&sorted, 75.0);
    let iqr = q3 - q1;
    Some(OutlierBounds {
        q1,
        q3,
        iqr,
        lower: q1 - FENCE * iqr,
        upper: q3 + FENCE * iqr,
    })
}

/// Whether `series` can produce a meaningful density or line plot.
pub fn is_plot_ready(series: &[f64], min_points: usize, require_variance: bool) -> bool {
    if series.len() < min_points {
        return false;
    }
    if require_variance && distinct_count(series) <= 1 {
        return false;
    }
    true
}

fn distinct_count(series: &[f64]) -> usize {
    series.iter().map(|v| v.to_bits()).collect::<BTreeSet<_>>().len()
}

// ---------------------------------------------------------------------------
// Kernel density
// ---------------------------------------------------------------------------

/// Gaussian kernel density estimate evaluated on `points` grid positions.
///
/// Bandwidth follows Scott's rule (`σ · n^(-1/5)`); the grid extends three
/// bandwidths past the data on each side. Degenerate input (fewer than two
/// values, zero spread) yields an empty curve.
pub fn gaussian_kde(series: &[f64], points: usize) -> Vec<[f64; 2]> {
    let n = series.len();
    if n < 2 || points < 2 {
        return Vec::new();
    }

    let std_dev = series.iter().std_dev();
    let bandwidth = std_dev * (n as f64).powf(-0.2);
    let Ok(kernel) = Normal::new(0.0, bandwidth) else {
        return Vec::new();
    };

    let min = series.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let start = min - KDE_CUT * bandwidth;
    let step = (max - min + 2.0 * KDE_CUT * bandwidth) / (points - 1) as f64;

    (0..points)
        .map(|i| {
            let x = start + step * i as f64;
            let density = series.iter().map(|&xi| kernel.pdf(x - xi)).sum::<f64>() / n as f64;
            [x, density]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Per-surgery distributions
// ---------------------------------------------------------------------------

/// Case counts of one surgery and their density curve.
#[derive(Debug, Clone, PartialEq)]
pub struct SurgeryDensity {
    pub surgery: String,
    pub values: Vec<f64>,
    pub curve: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DistributionOutcome {
    /// The filtered view was empty.
    NoData,
    /// Outlier removal left nothing to plot.
    EmptyAfterFiltering,
    /// One entry per surgery whose counts vary. May be empty.
    Curves(Vec<SurgeryDensity>),
}

/// Density curves of record-level case counts for the top (or bottom) `n`
/// surgeries.
///
/// With `remove_outliers` the Tukey fence is computed over the combined
/// records of the ranked surgeries and applied before splitting by surgery.
pub fn surgery_distributions(
    view: &FilteredView<'_>,
    n: usize,
    direction: RankDirection,
    remove_outliers: bool,
    kde_points: usize,
) -> DistributionOutcome {
    if view.is_empty() {
        return DistributionOutcome::NoData;
    }

    let ranked = ranked_surgeries(view, n, direction);
    let mut subset = view.restrict_surgeries(&ranked);

    if remove_outliers {
        let cases: Vec<f64> = subset.iter().map(|r| r.cases as f64).collect();
        if let Some(fence) = outlier_bounds(&cases) {
            subset = FilteredView::new(
                subset
                    .iter()
                    .filter(|r| fence.contains(r.cases as f64))
                    .collect(),
            );
        }
    }

    if subset.is_empty() {
        return DistributionOutcome::EmptyAfterFiltering;
    }

    let curves = ranked
        .into_iter()
        .filter_map(|surgery| {
            let values: Vec<f64> = subset
                .iter()
                .filter(|r| r.surgery == surgery)
                .map(|r| r.cases as f64)
                .collect();
            if !is_plot_ready(&values, 2, DEFAULT_REQUIRE_VARIANCE) {
                log::debug!("Skipping density for {surgery}: no spread in case counts");
                return None;
            }
            let curve = gaussian_kde(&values, kde_points);
            Some(SurgeryDensity {
                surgery,
                values,
                curve,
            })
        })
        .collect();

    DistributionOutcome::Curves(curves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;

    #[test]
    fn tukey_fence_flags_extreme_value() {
        let bounds = outlier_bounds(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(bounds.q1, 2.0);
        assert_eq!(bounds.q3, 4.0);
        assert_eq!(bounds.iqr, 2.0);
        assert_eq!(bounds.lower, -1.0);
        assert_eq!(bounds.upper, 7.0);
        assert!(!bounds.contains(100.0));
        assert!(bounds.contains(7.0));
    }

    #[test]
    fn empty_series_has_no_bounds() {
        assert!(outlier_bounds(&[]).is_none());
    }

    #[test]
    fn percentile_interpolates() {
        let sorted = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(percentile(&sorted, 50.0), 25.0);
        assert_eq!(percentile(&sorted, 0.0), 10.0);
        assert_eq!(percentile(&sorted, 100.0), 40.0);
        assert!(percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn plot_readiness() {
        assert!(!is_plot_ready(&[5.0], DEFAULT_MIN_POINTS, DEFAULT_REQUIRE_VARIANCE));
        assert!(!is_plot_ready(&[1.0, 1.0, 1.0], DEFAULT_MIN_POINTS, true));
        assert!(is_plot_ready(&[1.0, 1.0, 1.0], DEFAULT_MIN_POINTS, false));
        assert!(is_plot_ready(&[1.0, 2.0, 3.0], DEFAULT_MIN_POINTS, DEFAULT_REQUIRE_VARIANCE));
    }

    #[test]
    fn kde_integrates_to_about_one() {
        let curve = gaussian_kde(&[1.0, 2.0, 2.5, 3.0, 7.0], 400);
        assert_eq!(curve.len(), 400);
        let step = curve[1][0] - curve[0][0];
        let area: f64 = curve.iter().map(|p| p[1] * step).sum();
        assert!((area - 1.0).abs() < 0.02, "area was {area}");
    }

    #[test]
    fn kde_of_flat_series_is_empty() {
        assert!(gaussian_kde(&[4.0, 4.0, 4.0], 50).is_empty());
        assert!(gaussian_kde(&[4.0], 50).is_empty());
    }

    fn rec(surgery: &str, cases: u64) -> Record {
        Record {
            year: 2020,
            surgery: surgery.to_string(),
            hospital: "H".to_string(),
            county: "LA".to_string(),
            cases,
            longitude: None,
            latitude: None,
        }
    }

    #[test]
    fn distributions_skip_flat_surgeries() {
        let records = vec![
            rec("Breast", 10),
            rec("Breast", 40),
            rec("Breast", 25),
            rec("Colon", 5),
            rec("Colon", 5),
            rec("Lung", 1),
        ];
        let view = FilteredView::new(records.iter().collect());

        match surgery_distributions(&view, 2, RankDirection::Most, false, 50) {
            DistributionOutcome::Curves(curves) => {
                assert_eq!(curves.len(), 1);
                assert_eq!(curves[0].surgery, "Breast");
                assert_eq!(curves[0].curve.len(), 50);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn distributions_drop_outliers_before_splitting() {
        let records = vec![
            rec("Breast", 1),
            rec("Breast", 2),
            rec("Breast", 3),
            rec("Breast", 4),
            rec("Breast", 100),
        ];
        let view = FilteredView::new(records.iter().collect());

        let DistributionOutcome::Curves(curves) =
            surgery_distributions(&view, 1, RankDirection::Most, true, 20)
        else {
            panic!("expected curves");
        };
        assert_eq!(curves[0].values, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn distributions_of_empty_view() {
        let view = FilteredView::default();
        assert_eq!(
            surgery_distributions(&view, 3, RankDirection::Most, true, 20),
            DistributionOutcome::NoData
        );
    }
}

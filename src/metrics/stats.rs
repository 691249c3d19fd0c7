//! Descriptive statistics, box-plot summaries and kernel density estimates.

use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

/// Count, mean, sample standard deviation, min, quartiles and max.
///
/// Quartiles use linear interpolation between closest ranks. The standard
/// deviation is NaN for fewer than two values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl DescriptiveStats {
    /// Describe a sample. Returns `None` for an empty sample.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let sorted = sorted(values);

        Some(Self {
            count: values.len(),
            mean: Statistics::mean(values),
            std: Statistics::std_dev(values),
            min: sorted[0],
            q25: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q75: quantile_sorted(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Box-and-whisker summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,

    /// Lowest observation within 1.5 IQR below q1
    pub lower_whisker: f64,

    /// Highest observation within 1.5 IQR above q3
    pub upper_whisker: f64,

    /// Observations beyond the whiskers, ascending
    pub outliers: Vec<f64>,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let sorted = sorted(values);
        let q1 = quantile_sorted(&sorted, 0.25);
        let q3 = quantile_sorted(&sorted, 0.75);
        let reach = 1.5 * (q3 - q1);
        let (low_fence, high_fence) = (q1 - reach, q3 + reach);

        let inside: Vec<f64> = sorted
            .iter()
            .copied()
            .filter(|v| *v >= low_fence && *v <= high_fence)
            .collect();
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();

        Some(Self {
            q1,
            median: quantile_sorted(&sorted, 0.5),
            q3,
            lower_whisker: inside.first().copied().unwrap_or(q1),
            upper_whisker: inside.last().copied().unwrap_or(q3),
            outliers,
        })
    }

    /// Smallest and largest value drawn, whiskers and outliers included.
    pub fn extent(&self) -> (f64, f64) {
        let lo = self
            .outliers
            .first()
            .map_or(self.lower_whisker, |o| o.min(self.lower_whisker));
        let hi = self
            .outliers
            .last()
            .map_or(self.upper_whisker, |o| o.max(self.upper_whisker));
        (lo, hi)
    }
}

/// Gaussian kernel density estimate evaluated on an even grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Density {
    /// Kernel bandwidth (Scott's rule); zero for a degenerate sample
    pub bandwidth: f64,

    /// (value, density) pairs, ascending by value
    pub points: Vec<(f64, f64)>,
}

impl Density {
    /// Estimate the density of `values` on `grid_size` points spanning the
    /// sample range extended by `cut` bandwidths on both sides.
    ///
    /// A sample with fewer than two distinct values has no spread to smooth
    /// and yields a single point of density 1 at its value.
    pub fn estimate(values: &[f64], grid_size: usize, cut: f64) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let std = Statistics::std_dev(values);
        let bandwidth = std * n.powf(-0.2);
        let (min, max) = (Statistics::min(values), Statistics::max(values));

        if !(bandwidth.is_finite() && bandwidth > 0.0) || grid_size < 2 {
            return Some(Self {
                bandwidth: 0.0,
                points: vec![(min, 1.0)],
            });
        }

        let kernel = Normal::new(0.0, 1.0).ok()?;
        let (lo, hi) = (min - cut * bandwidth, max + cut * bandwidth);
        let step = (hi - lo) / (grid_size - 1) as f64;

        let points = (0..grid_size)
            .map(|i| {
                let x = lo + step * i as f64;
                let sum: f64 = values.iter().map(|v| kernel.pdf((x - v) / bandwidth)).sum();
                (x, sum / (n * bandwidth))
            })
            .collect();

        Some(Self { bandwidth, points })
    }

    pub fn peak(&self) -> f64 {
        self.points.iter().map(|(_, d)| *d).fold(0.0, f64::max)
    }
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_describe_matches_linear_quartiles() {
        let stats = DescriptiveStats::from_values(&[1.0, 2.0, 3.0, 4.0]).unwrap();

        assert_eq!(stats.count, 4);
        assert!(close(stats.mean, 2.5));
        assert!(close(stats.q25, 1.75));
        assert!(close(stats.median, 2.5));
        assert!(close(stats.q75, 3.25));
        assert!(close(stats.min, 1.0));
        assert!(close(stats.max, 4.0));
        // sample std with n - 1 denominator
        assert!(close(stats.std, (5.0f64 / 3.0).sqrt()));
    }

    #[test]
    fn test_describe_single_value() {
        let stats = DescriptiveStats::from_values(&[7.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert!(close(stats.median, 7.0));
        assert!(stats.std.is_nan());
        assert!(DescriptiveStats::from_values(&[]).is_none());
    }

    #[test]
    fn test_box_outliers_and_whiskers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let stats = BoxStats::from_values(&values).unwrap();

        assert!(close(stats.q1, 2.25));
        assert!(close(stats.q3, 4.75));
        assert_eq!(stats.outliers, vec![100.0]);
        assert!(close(stats.lower_whisker, 1.0));
        assert!(close(stats.upper_whisker, 5.0));
        assert_eq!(stats.extent(), (1.0, 100.0));
    }

    #[test]
    fn test_density_integrates_to_about_one() {
        let values = [1.0, 2.0, 2.5, 3.0, 7.0];
        let density = Density::estimate(&values, 200, 3.0).unwrap();

        assert!(density.bandwidth > 0.0);
        let step = density.points[1].0 - density.points[0].0;
        let area: f64 = density.points.iter().map(|(_, d)| d * step).sum();
        assert!((area - 1.0).abs() < 0.02, "area was {}", area);
    }

    #[test]
    fn test_density_degenerate_sample() {
        let density = Density::estimate(&[4.0, 4.0], 32, 2.0).unwrap();
        assert_eq!(density.bandwidth, 0.0);
        assert_eq!(density.points, vec![(4.0, 1.0)]);
        assert!(close(density.peak(), 1.0));
    }
}

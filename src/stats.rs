//! Summary statistics over a numeric series.
//!
//! Percentiles use linear interpolation between the two closest ranks
//! (`rank = p/100 * (n - 1)`), so the median is the 50th percentile and
//! the 100th percentile is the maximum.

/// The fixed statistic set reported for every series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub avg: f64,
    /// Population standard deviation (divides by `n`, not `n - 1`).
    pub stddev: f64,
    pub median: f64,
    pub p90: f64,
    pub p99: f64,
    pub max: f64,
}

impl Summary {
    /// Summarize a series. Returns `None` for an empty series.
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let avg = mean(values);
        Some(Self {
            avg,
            stddev: population_stddev(values, avg),
            median: percentile_sorted(&sorted, 50.0),
            p90: percentile_sorted(&sorted, 90.0),
            p99: percentile_sorted(&sorted, 99.0),
            max: sorted[sorted.len() - 1],
        })
    }

    /// Absolute change `other - self`, per statistic.
    pub fn diff(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| b - a)
    }

    /// Change relative to `self`, in percent. A zero baseline gives NaN or
    /// infinity.
    pub fn pct_diff(&self, other: &Self) -> Self {
        self.zip_with(other, pct_change)
    }

    fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            avg: f(self.avg, other.avg),
            stddev: f(self.stddev, other.stddev),
            median: f(self.median, other.median),
            p90: f(self.p90, other.p90),
            p99: f(self.p99, other.p99),
            max: f(self.max, other.max),
        }
    }
}

/// `(new - base) / base * 100`.
pub fn pct_change(base: f64, new: f64) -> f64 {
    (new - base) / base * 100.0
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_stddev(values: &[f64], mean: f64) -> f64 {
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Percentile `p` (0..=100) of an ascending, non-empty slice.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

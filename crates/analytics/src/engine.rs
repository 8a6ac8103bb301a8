use crate::error::AnalyticsError;
use configuration::AnalysisConfig;
use core_types::{DerivedRow, ObservedPoint};
use ta::indicators::SimpleMovingAverage as Sma;
use ta::Next;

/// Window sizes used by the `MetricsEngine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsConfig {
    pub short_window: usize,
    pub long_window: usize,
    pub stats_window: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            short_window: 5,
            long_window: 20,
            stats_window: 30,
        }
    }
}

impl From<&AnalysisConfig> for MetricsConfig {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            short_window: config.short_window,
            long_window: config.long_window,
            stats_window: config.stats_window,
        }
    }
}

/// A stateless calculator for the derived columns of a canonical series.
///
/// All windows are trailing: row `i` only ever sees points `..=i`.
#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    config: MetricsConfig,
}

impl MetricsEngine {
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    /// Computes one `DerivedRow` per point of `series`.
    ///
    /// The moving averages divide by the number of points seen so far until the
    /// window fills, so they are defined from the first row.
    ///
    /// # Arguments
    ///
    /// * `series` - The canonical series, ascending by date.
    ///
    /// # Returns
    ///
    /// A vector with exactly `series.len()` rows, or an error if a window size is zero.
    pub fn compute(&self, series: &[ObservedPoint]) -> Result<Vec<DerivedRow>, AnalyticsError> {
        let mut ma_short = Sma::new(self.config.short_window)
            .map_err(|e| AnalyticsError::Calculation(format!("short window: {:?}", e)))?;
        let mut ma_long = Sma::new(self.config.long_window)
            .map_err(|e| AnalyticsError::Calculation(format!("long window: {:?}", e)))?;

        let values: Vec<f64> = series.iter().map(|p| p.value).collect();
        let rows = values
            .iter()
            .enumerate()
            .map(|(i, &value)| self.row_at(&values, i, ma_short.next(value), ma_long.next(value)))
            .collect();
        Ok(rows)
    }

    fn row_at(&self, values: &[f64], i: usize, ma_short: f64, ma_long: f64) -> DerivedRow {
        let current = values[i];
        let previous = i.checked_sub(1).map(|j| values[j]);

        let daily_change = previous.map(|p| current - p);
        let percent_change = previous
            .filter(|p| *p != 0.0)
            .map(|p| (current - p) / p * 100.0);

        let stats = full_window(values, i, self.config.stats_window).map(mean_and_sample_std);
        let roll30_mean = stats.map(|(mean, _)| mean);
        let roll30_std = stats.map(|(_, std)| std);

        // A flat window has no spread to standardize against.
        let z_score = match stats {
            Some((mean, std)) if std > 0.0 => Some((current - mean) / std),
            _ => None,
        };

        DerivedRow {
            ma_short,
            ma_long,
            daily_change,
            percent_change,
            roll30_mean,
            roll30_std,
            z_score,
        }
    }
}

/// The exactly-`size` values ending at `i`, or `None` if fewer exist.
pub fn full_window(values: &[f64], i: usize, size: usize) -> Option<&[f64]> {
    if size == 0 || i + 1 < size {
        return None;
    }
    Some(&values[i + 1 - size..=i])
}

fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

/// Mean and sample standard deviation (denominator `n - 1`).
///
/// `ta::indicators::StandardDeviation` is the population form, hence the manual version.
fn mean_and_sample_std(window: &[f64]) -> (f64, f64) {
    // Summing equal floats drifts by an ulp or two; a constant window has exactly zero spread.
    if let Some(&first) = window.first() {
        if window.iter().all(|v| *v == first) {
            return (first, 0.0);
        }
    }
    let m = mean(window);
    if window.len() < 2 {
        return (m, 0.0);
    }
    let variance = window.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (window.len() - 1) as f64;
    (m, variance.sqrt())
}

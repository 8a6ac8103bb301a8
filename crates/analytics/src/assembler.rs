use crate::engine::full_window;
use crate::error::AnalyticsError;
use crate::interpret::{crossover_for_rows, interpret_level, interpret_z_score, trend};
use crate::report::{AnalysisResult, HistoryPoint, MarketOverview, RollingStats};
use crate::store::SeriesFrame;
use core_types::ObservedPoint;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Composes outward-facing results from a published `SeriesFrame`.
///
/// This is the only place values are rounded; the frame itself keeps full precision.
#[derive(Debug, Clone)]
pub struct AnalysisAssembler {
    stats_window: usize,
}

impl Default for AnalysisAssembler {
    fn default() -> Self {
        Self { stats_window: 30 }
    }
}

impl AnalysisAssembler {
    pub fn new(stats_window: usize) -> Self {
        Self { stats_window }
    }

    /// Builds the snapshot for the latest point of `frame`.
    pub fn snapshot(&self, frame: &SeriesFrame) -> Result<AnalysisResult, AnalyticsError> {
        let points = frame.points();
        let rows = frame.rows();
        let (Some(current), Some(row)) = (points.last(), rows.last()) else {
            return Err(AnalyticsError::NoData);
        };

        let mut result = AnalysisResult {
            date: current.date,
            current_value: round(current.value, 2)?,
            interpretation: interpret_level(current.value),
            change: None,
            percent_change: None,
            trend: None,
            rolling: None,
            ma_crossover: crossover_for_rows(rows),
        };

        if let [.., previous, _] = points {
            result.change = row.daily_change.map(|c| round(c, 2)).transpose()?;
            result.percent_change = row.percent_change.map(|p| round(p, 2)).transpose()?;
            result.trend = Some(trend(previous.value, current.value));
        }

        if let (Some(z), Some(mean), Some(std)) = (row.z_score, row.roll30_mean, row.roll30_std) {
            let percentile = self.percentile_rank(points)?;
            result.rolling = Some(RollingStats {
                mean: round(mean, 2)?,
                std: round(std, 2)?,
                z_score: round(z, 2)?,
                percentile: round(percentile, 1)?,
                z_score_interpretation: interpret_z_score(z),
            });
        }

        Ok(result)
    }

    /// The last `n` rows at full precision, ascending by date.
    pub fn history(&self, frame: &SeriesFrame, n: usize) -> Vec<HistoryPoint> {
        frame.tail(n).into_iter().map(HistoryPoint::from).collect()
    }

    /// Snapshot and history taken from the same frame.
    pub fn overview(&self, frame: &SeriesFrame, n: usize) -> Result<MarketOverview, AnalyticsError> {
        Ok(MarketOverview {
            current: self.snapshot(frame)?,
            history: self.history(frame, n),
        })
    }

    /// Percentage of the other values in the stats window that sit strictly below the latest one.
    fn percentile_rank(&self, points: &[ObservedPoint]) -> Result<f64, AnalyticsError> {
        let values: Vec<f64> = points.iter().map(|p| p.value).collect();
        let last = values.len().saturating_sub(1);
        let window = full_window(&values, last, self.stats_window).ok_or_else(|| {
            AnalyticsError::Calculation("percentile requested without a full window".to_string())
        })?;

        let (current, others) = match window.split_last() {
            Some((current, others)) if !others.is_empty() => (*current, others),
            _ => {
                return Err(AnalyticsError::Calculation(
                    "percentile window needs at least two points".to_string(),
                ));
            }
        };
        let below = others.iter().filter(|v| **v < current).count();
        Ok(below as f64 / others.len() as f64 * 100.0)
    }
}

fn round(value: f64, dp: u32) -> Result<Decimal, AnalyticsError> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(dp))
        .ok_or_else(|| AnalyticsError::Calculation(format!("{} is not representable as a decimal", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MetricsEngine;
    use chrono::{Days, NaiveDate};
    use core_types::{Crossover, Trend, VolatilityLevel, ZScoreBand};
    use rust_decimal_macros::dec;

    fn frame(values: &[f64]) -> SeriesFrame {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = values
            .iter()
            .enumerate()
            .map(|(i, v)| ObservedPoint {
                date: start.checked_add_days(Days::new(i as u64)).unwrap(),
                value: *v,
            })
            .collect();
        SeriesFrame::build(points, &MetricsEngine::default()).unwrap()
    }

    #[test]
    fn single_point_snapshot() {
        let result = AnalysisAssembler::default().snapshot(&frame(&[14.567])).unwrap();

        assert_eq!(result.current_value, dec!(14.57));
        assert_eq!(result.interpretation, VolatilityLevel::Normal);
        assert_eq!(result.change, None);
        assert_eq!(result.trend, None);
        assert_eq!(result.rolling, None);
        assert_eq!(result.ma_crossover, Crossover::Unavailable);
    }

    #[test]
    fn two_point_snapshot_has_change_and_trend() {
        let result = AnalysisAssembler::default().snapshot(&frame(&[20.0, 18.0])).unwrap();

        assert_eq!(result.change, Some(dec!(-2.00)));
        assert_eq!(result.percent_change, Some(dec!(-10.00)));
        assert_eq!(result.trend, Some(Trend::Down));
        assert_eq!(result.ma_crossover, Crossover::NoCrossover);
        assert_eq!(result.rolling, None);
    }

    #[test]
    fn unchanged_close_trends_down() {
        let result = AnalysisAssembler::default().snapshot(&frame(&[16.0, 16.0])).unwrap();
        assert_eq!(result.trend, Some(Trend::Down));
        assert_eq!(result.change, Some(dec!(0)));
    }

    #[test]
    fn window_maximum_scores_full_percentile() {
        let values: Vec<f64> = (0..30).map(|i| 10.0 + i as f64).collect();
        let result = AnalysisAssembler::default().snapshot(&frame(&values)).unwrap();
        let rolling = result.rolling.unwrap();

        assert_eq!(rolling.percentile, dec!(100.0));
        assert_eq!(rolling.mean, dec!(24.50));
        assert_eq!(rolling.std, dec!(8.80));
        assert_eq!(rolling.z_score, dec!(1.65));
        assert_eq!(rolling.z_score_interpretation, ZScoreBand::SignificantlyHigh);
        assert_eq!(result.interpretation, VolatilityLevel::High);
    }

    #[test]
    fn window_minimum_scores_zero_percentile() {
        let values: Vec<f64> = (0..30).map(|i| 40.0 - i as f64).collect();
        let rolling = AnalysisAssembler::default()
            .snapshot(&frame(&values))
            .unwrap()
            .rolling
            .unwrap();

        assert_eq!(rolling.percentile, dec!(0.0));
        assert_eq!(rolling.z_score, dec!(-1.65));
        assert_eq!(rolling.z_score_interpretation, ZScoreBand::SignificantlyLow);
    }

    #[test]
    fn percentile_counts_only_strictly_lower_values() {
        // 29 prior values: ten 10s, ten 20s, nine 30s; current 20.
        let mut values = vec![10.0; 10];
        values.extend(vec![20.0; 10]);
        values.extend(vec![30.0; 9]);
        values.push(20.0);
        let rolling = AnalysisAssembler::default()
            .snapshot(&frame(&values))
            .unwrap()
            .rolling
            .unwrap();

        // 10 of 29 below.
        assert_eq!(rolling.percentile, dec!(34.5));
    }

    #[test]
    fn percentile_uses_only_trailing_window() {
        // An early spike falls outside the last 30 points.
        let mut values = vec![90.0];
        values.extend((0..30).map(|i| 10.0 + i as f64));
        let rolling = AnalysisAssembler::default()
            .snapshot(&frame(&values))
            .unwrap()
            .rolling
            .unwrap();
        assert_eq!(rolling.percentile, dec!(100.0));
    }

    #[test]
    fn flat_window_omits_rolling_section() {
        let result = AnalysisAssembler::default().snapshot(&frame(&[15.0; 35])).unwrap();
        assert_eq!(result.rolling, None);
        assert_eq!(result.ma_crossover, Crossover::NoCrossover);
    }

    #[test]
    fn flat_window_with_inexact_sum_omits_rolling_section() {
        for value in [13.37, 0.1] {
            let result = AnalysisAssembler::default().snapshot(&frame(&[value; 30])).unwrap();
            assert_eq!(result.rolling, None, "value {}", value);
        }
    }

    #[test]
    fn golden_cross_on_latest_rows() {
        // Long decline then a sharp jump pulls the 5-day average above the 20-day one.
        let mut values: Vec<f64> = (0..25).map(|i| 30.0 - i as f64 * 0.5).collect();
        values.push(50.0);
        let result = AnalysisAssembler::default().snapshot(&frame(&values)).unwrap();
        assert_eq!(result.ma_crossover, Crossover::Golden);
    }

    #[test]
    fn history_returns_whole_series_when_n_is_large() {
        let values = [13.0, 14.5, 12.25, 19.0];
        let frame = frame(&values);
        let history = AnalysisAssembler::default().history(&frame, 10);

        assert_eq!(history.len(), values.len());
        for (point, original) in history.iter().zip(frame.points()) {
            assert_eq!(point.date, original.date);
            assert_eq!(point.value, original.value);
        }
        assert!(history.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn history_keeps_full_precision() {
        let history = AnalysisAssembler::default().history(&frame(&[10.0, 13.333333]), 1);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].value, 13.333333);
        assert_eq!(history[0].ma_short, (10.0 + 13.333333) / 2.0);
    }

    #[test]
    fn snapshot_serializes_numbers_and_omits_absent_sections() {
        let result = AnalysisAssembler::default().snapshot(&frame(&[14.567])).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["current_value"], serde_json::json!(14.57));
        assert_eq!(json["interpretation"], "Normal volatility");
        assert_eq!(json["ma_crossover"], "no crossover data available");
        assert!(json.get("change").is_none());
        assert!(json.get("z_score").is_none());
    }

    #[test]
    fn rolling_section_is_flattened() {
        let values: Vec<f64> = (0..30).map(|i| 10.0 + i as f64).collect();
        let result = AnalysisAssembler::default().snapshot(&frame(&values)).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["percentile_30d"], serde_json::json!(100.0));
        assert_eq!(json["z_score"], serde_json::json!(1.65));
        assert_eq!(json["trend"], "up");
    }
}

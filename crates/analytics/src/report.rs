use chrono::NaiveDate;
use core_types::{Crossover, DerivedRow, ObservedPoint, Trend, VolatilityLevel, ZScoreBand};
use rust_decimal::Decimal;
use serde::Serialize;

/// A point-in-time summary of the latest close.
///
/// This struct is the outward-facing result of the `AnalysisAssembler`. Numbers
/// here are already rounded for display; optional sections are omitted from
/// the JSON when the underlying metric is undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_value: Decimal,
    pub interpretation: VolatilityLevel,

    // I. Day-over-day movement, present when a previous close exists
    #[serde(skip_serializing_if = "Option::is_none", with = "rust_decimal::serde::float_option")]
    pub change: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none", with = "rust_decimal::serde::float_option")]
    pub percent_change: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,

    // II. 30-day distribution, present when the latest row has a z-score
    #[serde(flatten)]
    pub rolling: Option<RollingStats>,

    pub ma_crossover: Crossover,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingStats {
    #[serde(rename = "mean_30d", with = "rust_decimal::serde::float")]
    pub mean: Decimal,
    #[serde(rename = "std_30d", with = "rust_decimal::serde::float")]
    pub std: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub z_score: Decimal,
    #[serde(rename = "percentile_30d", with = "rust_decimal::serde::float")]
    pub percentile: Decimal,
    pub z_score_interpretation: ZScoreBand,
}

/// One row of a history slice at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub ma_short: f64,
    pub ma_long: f64,
    pub daily_change: Option<f64>,
    pub percent_change: Option<f64>,
    pub roll30_mean: Option<f64>,
    pub roll30_std: Option<f64>,
    pub z_score: Option<f64>,
}

impl From<(ObservedPoint, DerivedRow)> for HistoryPoint {
    fn from((point, row): (ObservedPoint, DerivedRow)) -> Self {
        Self {
            date: point.date,
            value: point.value,
            ma_short: row.ma_short,
            ma_long: row.ma_long,
            daily_change: row.daily_change,
            percent_change: row.percent_change,
            roll30_mean: row.roll30_mean,
            roll30_std: row.roll30_std,
            z_score: row.z_score,
        }
    }
}

/// The combined payload: current snapshot plus a history tail from the same frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketOverview {
    pub current: AnalysisResult,
    pub history: Vec<HistoryPoint>,
}

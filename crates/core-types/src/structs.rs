use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day's closing index value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservedPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl ObservedPoint {
    /// Creates a point, rejecting non-finite or negative closes.
    pub fn new(date: NaiveDate, value: f64) -> Result<Self, CoreError> {
        let point = Self { date, value };
        point.validate()?;
        Ok(point)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(CoreError::InvalidInput(
                format!("close on {}", self.date),
                format!("expected a finite value >= 0, got {}", self.value),
            ));
        }
        Ok(())
    }
}

/// Metrics derived for a single point of the canonical series.
///
/// `ma_short` and `ma_long` use a shrinking window near the start of the
/// series and are therefore always present. The 30-day statistics need a
/// full window and stay `None` until one exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedRow {
    pub ma_short: f64,
    pub ma_long: f64,
    pub daily_change: Option<f64>,
    pub percent_change: Option<f64>,
    pub roll30_mean: Option<f64>,
    pub roll30_std: Option<f64>,
    pub z_score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn accepts_zero_and_positive_values() {
        assert!(ObservedPoint::new(day(1), 0.0).is_ok());
        assert!(ObservedPoint::new(day(1), 17.35).is_ok());
    }

    #[test]
    fn rejects_negative_and_non_finite_values() {
        assert!(ObservedPoint::new(day(1), -0.5).is_err());
        assert!(ObservedPoint::new(day(1), f64::NAN).is_err());
        assert!(ObservedPoint::new(day(1), f64::INFINITY).is_err());
    }
}

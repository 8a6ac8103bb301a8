use serde::{Deserialize, Serialize};
use std::fmt;

/// The regime a closing index value falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatilityLevel {
    #[serde(rename = "Low volatility - complacent market")]
    Low,
    #[serde(rename = "Normal volatility")]
    Normal,
    #[serde(rename = "Elevated volatility - caution advised")]
    Elevated,
    #[serde(rename = "High volatility - fearful market")]
    High,
}

impl VolatilityLevel {
    pub fn label(&self) -> &'static str {
        match self {
            VolatilityLevel::Low => "Low volatility - complacent market",
            VolatilityLevel::Normal => "Normal volatility",
            VolatilityLevel::Elevated => "Elevated volatility - caution advised",
            VolatilityLevel::High => "High volatility - fearful market",
        }
    }
}

/// Position of a z-score relative to the 30-day rolling distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZScoreBand {
    #[serde(rename = "extremely high compared to the 30-day average")]
    ExtremelyHigh,
    #[serde(rename = "significantly high compared to the 30-day average")]
    SignificantlyHigh,
    #[serde(rename = "within normal range of the 30-day average")]
    Normal,
    #[serde(rename = "significantly low compared to the 30-day average")]
    SignificantlyLow,
    #[serde(rename = "extremely low compared to the 30-day average")]
    ExtremelyLow,
}

impl ZScoreBand {
    pub fn label(&self) -> &'static str {
        match self {
            ZScoreBand::ExtremelyHigh => "extremely high compared to the 30-day average",
            ZScoreBand::SignificantlyHigh => "significantly high compared to the 30-day average",
            ZScoreBand::Normal => "within normal range of the 30-day average",
            ZScoreBand::SignificantlyLow => "significantly low compared to the 30-day average",
            ZScoreBand::ExtremelyLow => "extremely low compared to the 30-day average",
        }
    }
}

/// Relationship between the short and long moving averages over the last two rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crossover {
    #[serde(rename = "golden cross (bullish signal)")]
    Golden,
    #[serde(rename = "death cross (bearish signal)")]
    Death,
    #[serde(rename = "no significant crossover")]
    NoCrossover,
    #[serde(rename = "insufficient data for crossover analysis")]
    InsufficientData,
    #[serde(rename = "no crossover data available")]
    Unavailable,
}

impl Crossover {
    pub fn label(&self) -> &'static str {
        match self {
            Crossover::Golden => "golden cross (bullish signal)",
            Crossover::Death => "death cross (bearish signal)",
            Crossover::NoCrossover => "no significant crossover",
            Crossover::InsufficientData => "insufficient data for crossover analysis",
            Crossover::Unavailable => "no crossover data available",
        }
    }
}

/// Day-over-day direction of the closing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    pub fn label(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
        }
    }
}

impl fmt::Display for VolatilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for ZScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Crossover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//! Pure mappings from numeric states to categorical labels.

use core_types::{Crossover, DerivedRow, Trend, VolatilityLevel, ZScoreBand};

/// Each band is closed on its lower bound: 12 is Normal, 20 Elevated, 30 High.
pub fn interpret_level(value: f64) -> VolatilityLevel {
    if value < 12.0 {
        VolatilityLevel::Low
    } else if value < 20.0 {
        VolatilityLevel::Normal
    } else if value < 30.0 {
        VolatilityLevel::Elevated
    } else {
        VolatilityLevel::High
    }
}

/// Comparisons are strict, so exactly ±1 and ±2 stay in the milder band.
pub fn interpret_z_score(z: f64) -> ZScoreBand {
    if z > 2.0 {
        ZScoreBand::ExtremelyHigh
    } else if z > 1.0 {
        ZScoreBand::SignificantlyHigh
    } else if z < -2.0 {
        ZScoreBand::ExtremelyLow
    } else if z < -1.0 {
        ZScoreBand::SignificantlyLow
    } else {
        ZScoreBand::Normal
    }
}

/// Classifies the short/long moving-average relationship across two consecutive rows.
pub fn detect_crossover(
    prev_short: Option<f64>,
    prev_long: Option<f64>,
    cur_short: Option<f64>,
    cur_long: Option<f64>,
) -> Crossover {
    let (Some(prev_short), Some(prev_long), Some(cur_short), Some(cur_long)) =
        (prev_short, prev_long, cur_short, cur_long)
    else {
        return Crossover::InsufficientData;
    };

    if prev_short <= prev_long && cur_short > cur_long {
        Crossover::Golden
    } else if prev_short >= prev_long && cur_short < cur_long {
        Crossover::Death
    } else {
        Crossover::NoCrossover
    }
}

/// Crossover over the last two rows of a series.
pub fn crossover_for_rows(rows: &[DerivedRow]) -> Crossover {
    match rows {
        [.., prev, cur] => detect_crossover(
            Some(prev.ma_short),
            Some(prev.ma_long),
            Some(cur.ma_short),
            Some(cur.ma_long),
        ),
        _ => Crossover::Unavailable,
    }
}

/// Ties count as `Down`.
pub fn trend(previous: f64, current: f64) -> Trend {
    if current > previous {
        Trend::Up
    } else {
        Trend::Down
    }
}

//! Forecast horizons and their fixed per-horizon constants

use crate::error::ForecastError;
use crate::models::ModelFamily;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Forecast horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "5Y")]
    FiveYears,
}

/// Constants that parameterise every stage for one horizon
#[derive(Debug, Clone, PartialEq)]
pub struct TimeframeConfig {
    /// Rolling close averages, emitted as `ma{w}` columns
    pub ma_windows: &'static [usize],
    /// Lag used by the momentum and rate-of-change columns
    pub momentum_window: usize,
    /// Window of the return standard deviation column
    pub volatility_window: usize,
    /// Fewest feature rows the trainer accepts
    pub min_samples: usize,
    /// Number of generated forecast points
    pub forecast_points: usize,
    /// Calendar days covered by the forecast
    pub total_days: u32,
    /// Model family trained for this horizon
    pub family: ModelFamily,
    /// Trend comparison period, before capping at half the series
    pub trend_period: usize,
    /// Conservative, moderate and aggressive target fractions
    pub target_fractions: [f64; 3],
}

static ONE_MONTH: TimeframeConfig = TimeframeConfig {
    ma_windows: &[3, 5, 10, 20],
    momentum_window: 5,
    volatility_window: 10,
    min_samples: 30,
    forecast_points: 30,
    total_days: 30,
    family: ModelFamily::RandomForest,
    trend_period: 20,
    target_fractions: [0.05, 0.10, 0.15],
};

static SIX_MONTHS: TimeframeConfig = TimeframeConfig {
    ma_windows: &[5, 10, 20, 50],
    momentum_window: 10,
    volatility_window: 20,
    min_samples: 60,
    forecast_points: 26,
    total_days: 180,
    family: ModelFamily::RandomForest,
    trend_period: 50,
    target_fractions: [0.15, 0.25, 0.40],
};

static ONE_YEAR: TimeframeConfig = TimeframeConfig {
    ma_windows: &[10, 20, 50, 100],
    momentum_window: 15,
    volatility_window: 30,
    min_samples: 100,
    forecast_points: 52,
    total_days: 365,
    family: ModelFamily::GradientBoosting,
    trend_period: 100,
    target_fractions: [0.25, 0.50, 0.75],
};

static FIVE_YEARS: TimeframeConfig = TimeframeConfig {
    ma_windows: &[20, 50, 100, 200],
    momentum_window: 20,
    volatility_window: 60,
    min_samples: 200,
    forecast_points: 60,
    total_days: 1825,
    family: ModelFamily::GradientBoosting,
    trend_period: 200,
    target_fractions: [0.5, 1.0, 2.0],
};

impl Timeframe {
    /// All horizons, shortest first
    pub const ALL: [Timeframe; 4] = [
        Timeframe::OneMonth,
        Timeframe::SixMonths,
        Timeframe::OneYear,
        Timeframe::FiveYears,
    ];

    /// The fixed constants for this horizon
    pub fn config(self) -> &'static TimeframeConfig {
        match self {
            Timeframe::OneMonth => &ONE_MONTH,
            Timeframe::SixMonths => &SIX_MONTHS,
            Timeframe::OneYear => &ONE_YEAR,
            Timeframe::FiveYears => &FIVE_YEARS,
        }
    }

    /// Short label: `1M`, `6M`, `1Y` or `5Y`
    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::OneMonth => "1M",
            Timeframe::SixMonths => "6M",
            Timeframe::OneYear => "1Y",
            Timeframe::FiveYears => "5Y",
        }
    }

    /// Rows between a feature row and its target close
    pub fn target_step(self) -> usize {
        (self.config().total_days / 30) as usize
    }

    /// Calendar days between consecutive forecast points
    pub fn days_per_point(self) -> u32 {
        let config = self.config();
        config.total_days / config.forecast_points as u32
    }

    /// Whether forecasts get a linear trend term added per day ahead
    pub fn applies_trend_adjustment(self) -> bool {
        matches!(self, Timeframe::OneYear | Timeframe::FiveYears)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1M" => Ok(Timeframe::OneMonth),
            "6M" => Ok(Timeframe::SixMonths),
            "1Y" => Ok(Timeframe::OneYear),
            "5Y" => Ok(Timeframe::FiveYears),
            other => Err(ForecastError::InvalidTimeframe(other.to_string())),
        }
    }
}

//! Trend classification from a windowed mean comparison

use crate::timeframe::Timeframe;
use serde::Serialize;
use std::fmt;

/// Direction of the recent price trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Bullish => "Bullish",
            Trend::Bearish => "Bearish",
            Trend::Neutral => "Neutral",
        };
        f.write_str(label)
    }
}

/// Compares the mean of the latest half-period of closes with the half before it
#[derive(Debug, Clone, Copy)]
pub struct TrendAnalyzer {
    timeframe: Timeframe,
}

impl TrendAnalyzer {
    pub fn new(timeframe: Timeframe) -> Self {
        Self { timeframe }
    }

    /// Comparison period for a series of `len` closes
    pub fn period(&self, len: usize) -> usize {
        self.timeframe.config().trend_period.min(len / 2)
    }

    /// Bullish when the recent mean beats the older one, otherwise Bearish.
    ///
    /// With fewer than four closes the older window is empty, its mean is
    /// NaN and the comparison falls through to Bearish.
    pub fn analyze(&self, closes: &[f64]) -> Trend {
        let period = self.period(closes.len());
        if closes.len() < period {
            return Trend::Neutral;
        }

        let recent_len = period.div_ceil(2);
        let older_len = period / 2;
        let end = closes.len();

        let recent = &closes[end - recent_len..];
        let older = &closes[end - recent_len - older_len..end - recent_len];

        if mean(recent) > mean(older) {
            Trend::Bullish
        } else {
            Trend::Bearish
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

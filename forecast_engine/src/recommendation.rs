//! Recommendation policies, risk tiers and price targets
//!
//! Two policies are kept apart: the trend-and-R² policy scores horizon
//! forecasts, the weighted-score policy scores single-day analysis.

use crate::technical::TechnicalSnapshot;
use crate::timeframe::Timeframe;
use crate::trend::Trend;
use serde::Serialize;
use std::fmt;

/// R² above which a model counts as explanatory
const STRONG_FIT_R2: f64 = 0.5;
const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;

/// Action suggested to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Recommendation {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "SELL")]
    Sell,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Recommendation::StrongBuy => "STRONG BUY",
            Recommendation::Buy => "BUY",
            Recommendation::Hold => "HOLD",
            Recommendation::Sell => "SELL",
        };
        f.write_str(label)
    }
}

/// Three-level grade used for both confidence and risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Level {
    Low,
    Medium,
    High,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Level::Low => "Low",
            Level::Medium => "Medium",
            Level::High => "High",
        };
        f.write_str(label)
    }
}

/// A recommendation and how much weight to give it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub recommendation: Recommendation,
    pub confidence: Level,
}

/// Weighted-score result with the points that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredSignal {
    pub recommendation: Recommendation,
    pub confidence: Level,
    pub score: u32,
}

/// Inputs of the weighted-score policy
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    pub snapshot: &'a TechnicalSnapshot,
    /// Test-window model predictions
    pub predictions: &'a [f64],
    /// Test-window actual closes, aligned with `predictions`
    pub actuals: &'a [f64],
    pub r2: f64,
}

/// Trend-and-R² policy for horizon forecasts
pub fn trend_signal(trend: Trend, r2: f64) -> Signal {
    let (recommendation, confidence) = match trend {
        Trend::Bullish if r2 > STRONG_FIT_R2 => (Recommendation::Buy, Level::High),
        Trend::Bullish => (Recommendation::Buy, Level::Medium),
        Trend::Bearish if r2 > STRONG_FIT_R2 => (Recommendation::Sell, Level::High),
        _ => (Recommendation::Hold, Level::Low),
    };
    Signal {
        recommendation,
        confidence,
    }
}

/// Points awarded by the weighted-score policy
pub fn weighted_score(inputs: &ScoreInputs<'_>) -> u32 {
    let snapshot = inputs.snapshot;
    let price = snapshot.current_price;
    let above = |a: f64, b: Option<f64>| b.map_or(false, |b| a > b);

    let mut score = 0;
    if above(price, snapshot.ma20) {
        score += 1;
    }
    if above(price, snapshot.ma50) {
        score += 1;
    }
    if snapshot.ma20.map_or(false, |ma20| above(ma20, snapshot.ma50)) {
        score += 1;
    }

    if let Some(rsi) = snapshot.rsi {
        if rsi > RSI_OVERSOLD && rsi < RSI_OVERBOUGHT {
            score += 1;
        } else if rsi < RSI_OVERSOLD {
            score += 2;
        }
    }

    if mean_prediction_gap(inputs.predictions, inputs.actuals) > 0.0 {
        score += 2;
    }
    if inputs.r2 > STRONG_FIT_R2 {
        score += 1;
    }

    score
}

/// Weighted-score policy for single-day analysis
pub fn weighted_signal(inputs: &ScoreInputs<'_>) -> ScoredSignal {
    let score = weighted_score(inputs);
    let (recommendation, confidence) = match score {
        s if s >= 6 => (Recommendation::StrongBuy, Level::High),
        s if s >= 4 => (Recommendation::Buy, Level::Medium),
        s if s >= 2 => (Recommendation::Hold, Level::Medium),
        _ => (Recommendation::Sell, Level::Low),
    };
    ScoredSignal {
        recommendation,
        confidence,
        score,
    }
}

/// Mean of `prediction - actual`; NaN when there is nothing to compare
fn mean_prediction_gap(predictions: &[f64], actuals: &[f64]) -> f64 {
    let n = predictions.len().min(actuals.len());
    if n == 0 {
        return f64::NAN;
    }
    predictions
        .iter()
        .zip(actuals)
        .map(|(p, a)| p - a)
        .sum::<f64>()
        / n as f64
}

/// Risk tier from annualised volatility in percent.
///
/// A missing reading grades as `Low`.
pub fn risk_level(annual_volatility: Option<f64>) -> Level {
    match annual_volatility {
        Some(v) if v > 40.0 => Level::High,
        Some(v) if v > 25.0 => Level::Medium,
        _ => Level::Low,
    }
}

/// One price target
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTarget {
    pub price: f64,
    pub percent: f64,
}

/// Conservative, moderate and aggressive targets for a horizon
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTargets {
    pub conservative: PriceTarget,
    pub moderate: PriceTarget,
    pub aggressive: PriceTarget,
}

/// Targets from the horizon's fractions, halved under a bearish trend
pub fn price_targets(current_price: f64, timeframe: Timeframe, trend: Trend) -> PriceTargets {
    let factor = if trend == Trend::Bearish { 0.5 } else { 1.0 };
    let target = |fraction: f64| {
        let fraction = fraction * factor;
        PriceTarget {
            price: current_price * (1.0 + fraction),
            percent: fraction * 100.0,
        }
    };

    let [conservative, moderate, aggressive] = timeframe.config().target_fractions;
    PriceTargets {
        conservative: target(conservative),
        moderate: target(moderate),
        aggressive: target(aggressive),
    }
}

//! Oscillator indicator implementations
//!
//! Contains implementations of:
//! - Relative Strength Index (RSI), simple-average variant
//! - Moving Average Convergence Divergence (MACD)

use crate::moving_averages::ExponentialMovingAverage;
use crate::{ensure_period, MathError, Result, Series};
use std::collections::VecDeque;

/// Relative Strength Index (RSI) implementation
///
/// Gains and losses are averaged with a plain rolling mean over `period`
/// price changes. The first price has no change; it contributes a zero gain
/// and a zero loss to the window rather than being skipped.
///
/// A zero average loss is not special-cased: the ratio becomes infinite (RSI
/// of exactly 100) or NaN when the average gain is zero as well.
#[derive(Debug, Clone)]
pub struct RelativeStrengthIndex {
    period: usize,
    previous_price: Option<f64>,
    gains: VecDeque<f64>,
    losses: VecDeque<f64>,
}

impl RelativeStrengthIndex {
    /// Create a new RSI with the specified period
    pub fn new(period: usize) -> Result<Self> {
        ensure_period(period)?;

        Ok(Self {
            period,
            previous_price: None,
            gains: VecDeque::with_capacity(period + 1),
            losses: VecDeque::with_capacity(period + 1),
        })
    }

    /// Update the RSI with a new price value
    pub fn update(&mut self, price: f64) {
        let change = self.previous_price.map_or(0.0, |prev| price - prev);

        self.gains.push_back(if change > 0.0 { change } else { 0.0 });
        self.losses.push_back(if change < 0.0 { -change } else { 0.0 });

        if self.gains.len() > self.period {
            self.gains.pop_front();
            self.losses.pop_front();
        }

        self.previous_price = Some(price);
    }

    /// Average gain over the current window
    pub fn average_gain(&self) -> Option<f64> {
        self.window_mean(&self.gains)
    }

    /// Average loss over the current window
    pub fn average_loss(&self) -> Option<f64> {
        self.window_mean(&self.losses)
    }

    /// Get the current RSI value
    pub fn value(&self) -> Option<f64> {
        let avg_gain = self.average_gain()?;
        let avg_loss = self.average_loss()?;

        let rs = avg_gain / avg_loss;
        Some(100.0 - 100.0 / (1.0 + rs))
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Reset the RSI, clearing all values
    pub fn reset(&mut self) {
        self.previous_price = None;
        self.gains.clear();
        self.losses.clear();
    }

    fn window_mean(&self, window: &VecDeque<f64>) -> Option<f64> {
        if window.len() < self.period {
            return None;
        }
        Some(window.iter().sum::<f64>() / self.period as f64)
    }
}

/// Moving Average Convergence Divergence (MACD) implementation
#[derive(Debug, Clone)]
pub struct Macd {
    fast_ema: ExponentialMovingAverage,
    slow_ema: ExponentialMovingAverage,
    signal_ema: ExponentialMovingAverage,
}

impl Macd {
    /// Create a new MACD with the specified parameters
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Result<Self> {
        if fast_period >= slow_period {
            return Err(MathError::InvalidInput(
                "Fast period must be smaller than slow period".to_string(),
            ));
        }

        Ok(Self {
            fast_ema: ExponentialMovingAverage::new(fast_period)?,
            slow_ema: ExponentialMovingAverage::new(slow_period)?,
            signal_ema: ExponentialMovingAverage::new(signal_period)?,
        })
    }

    /// Standard 12/26/9 configuration
    pub fn standard() -> Result<Self> {
        Self::new(12, 26, 9)
    }

    /// Update the MACD with a new price value
    pub fn update(&mut self, price: f64) {
        self.fast_ema.update(price);
        self.slow_ema.update(price);

        if let Some(line) = self.macd_value() {
            self.signal_ema.update(line);
        }
    }

    /// Get the current MACD line value (fast EMA - slow EMA)
    pub fn macd_value(&self) -> Option<f64> {
        Some(self.fast_ema.value()? - self.slow_ema.value()?)
    }

    /// Get the current signal line value (EMA of MACD)
    pub fn signal_value(&self) -> Option<f64> {
        self.signal_ema.value()
    }

    /// Get the current histogram value (MACD line - signal line)
    pub fn histogram(&self) -> Option<f64> {
        Some(self.macd_value()? - self.signal_value()?)
    }

    /// Reset the MACD, clearing all values
    pub fn reset(&mut self) {
        self.fast_ema.reset();
        self.slow_ema.reset();
        self.signal_ema.reset();
    }
}

/// MACD line and signal line, one entry per input row
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

/// Rolling RSI over a price series
pub fn rsi(prices: &[f64], period: usize) -> Result<Series> {
    let mut indicator = RelativeStrengthIndex::new(period)?;

    Ok(prices
        .iter()
        .map(|&p| {
            indicator.update(p);
            indicator.value()
        })
        .collect())
}

/// MACD and signal lines over a price series
pub fn macd(
    prices: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> Result<MacdSeries> {
    let mut indicator = Macd::new(fast_period, slow_period, signal_period)?;
    let mut series = MacdSeries {
        macd: Vec::with_capacity(prices.len()),
        signal: Vec::with_capacity(prices.len()),
    };

    for &price in prices {
        indicator.update(price);
        match (indicator.macd_value(), indicator.signal_value()) {
            (Some(line), Some(signal)) => {
                series.macd.push(line);
                series.signal.push(signal);
            }
            _ => {
                return Err(MathError::InsufficientData(
                    "MACD produced no value after update".to_string(),
                ))
            }
        }
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rsi_warm_up_counts_first_row() {
        // 3-period RSI is available from the third price: the first row
        // contributes a zero change.
        let values = rsi(&[10.0, 11.0, 10.0, 12.0], 3).unwrap();
        assert!(values[0].is_none());
        assert!(values[1].is_none());

        // gains [0, 1, 0], losses [0, 0, 1] -> rs = 1 -> 50
        assert_relative_eq!(values[2].unwrap(), 50.0);

        // gains [1, 0, 2], losses [0, 1, 0] -> rs = 3 -> 75
        assert_relative_eq!(values[3].unwrap(), 75.0, epsilon = 1e-10);
    }

    #[test]
    fn test_rsi_only_gains_is_one_hundred() {
        let values = rsi(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
        assert_eq!(values[4], Some(100.0));
    }

    #[test]
    fn test_rsi_flat_prices_is_nan() {
        let values = rsi(&[5.0, 5.0, 5.0, 5.0], 3).unwrap();
        assert!(values[3].unwrap().is_nan());
    }

    #[test]
    fn test_macd_starts_at_zero() {
        let series = macd(&[100.0, 101.0, 102.0], 12, 26, 9).unwrap();
        assert_eq!(series.macd.len(), 3);
        assert_relative_eq!(series.macd[0], 0.0);
        assert_relative_eq!(series.signal[0], 0.0);
        // Rising prices push the fast EMA above the slow one
        assert!(series.macd[2] > 0.0);
        assert!(series.signal[2] < series.macd[2]);
    }

    #[test]
    fn test_macd_rejects_inverted_periods() {
        assert!(Macd::new(26, 12, 9).is_err());
    }
}

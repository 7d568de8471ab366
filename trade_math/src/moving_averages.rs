//! Moving average calculation implementations
//!
//! Contains implementations of:
//! - Simple Moving Average (SMA) over a fixed trailing window
//! - Exponential Moving Average (EMA), recursive and seeded with the first value

use crate::{ensure_period, Result, Series};
use std::collections::VecDeque;

/// Simple Moving Average (SMA) implementation
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    period: usize,
    values: VecDeque<f64>,
}

impl SimpleMovingAverage {
    /// Create a new Simple Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        ensure_period(period)?;

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period + 1),
        })
    }

    /// Update the SMA with a new value
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);

        // Remove oldest value if we have more than period values
        if self.values.len() > self.period {
            self.values.pop_front();
        }
    }

    /// Get the current SMA value, `None` until the window is full
    pub fn value(&self) -> Option<f64> {
        if self.values.len() < self.period {
            return None;
        }

        // Summed from the window each time so long series do not drift
        Some(self.values.iter().sum::<f64>() / self.period as f64)
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Reset the SMA, clearing all values
    pub fn reset(&mut self) {
        self.values.clear();
    }
}

/// Exponential Moving Average (EMA) implementation
///
/// Uses the recursive form `ema = alpha * x + (1 - alpha) * ema_prev` with
/// `alpha = 2 / (span + 1)`. The first observed value seeds the average, so
/// the EMA is defined from the very first row.
#[derive(Debug, Clone)]
pub struct ExponentialMovingAverage {
    span: usize,
    alpha: f64,
    current: Option<f64>,
}

impl ExponentialMovingAverage {
    /// Create a new Exponential Moving Average with the specified span
    pub fn new(span: usize) -> Result<Self> {
        ensure_period(span)?;

        Ok(Self {
            span,
            alpha: 2.0 / (span as f64 + 1.0),
            current: None,
        })
    }

    /// Update the EMA with a new value
    pub fn update(&mut self, value: f64) {
        self.current = Some(match self.current {
            None => value,
            Some(previous) => self.alpha * value + (1.0 - self.alpha) * previous,
        });
    }

    /// Get the current EMA value
    pub fn value(&self) -> Option<f64> {
        self.current
    }

    /// Get the span
    pub fn span(&self) -> usize {
        self.span
    }

    /// Reset the EMA
    pub fn reset(&mut self) {
        self.current = None;
    }
}

/// Rolling simple moving average over `values`
pub fn sma(values: &[f64], period: usize) -> Result<Series> {
    let mut average = SimpleMovingAverage::new(period)?;

    Ok(values
        .iter()
        .map(|&v| {
            average.update(v);
            average.value()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sma_calculation() {
        let mut sma = SimpleMovingAverage::new(3).unwrap();

        // Not enough data yet
        assert!(sma.value().is_none());

        sma.update(2.0);
        sma.update(4.0);
        assert!(sma.value().is_none());

        sma.update(6.0);
        assert_eq!(sma.value(), Some(4.0)); // (2 + 4 + 6) / 3

        // The window slides, dropping the oldest value
        sma.update(8.0);
        assert_eq!(sma.value(), Some(6.0)); // (4 + 6 + 8) / 3
    }

    #[test]
    fn test_sma_series_warm_up() {
        let series = sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
        assert_eq!(series, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_ema_seeded_with_first_value() {
        // alpha = 0.5
        let mut ema = ExponentialMovingAverage::new(3).unwrap();
        ema.update(10.0);
        assert_relative_eq!(ema.value().unwrap(), 10.0);
        ema.update(20.0);
        assert_relative_eq!(ema.value().unwrap(), 15.0);
        ema.update(30.0);
        assert_relative_eq!(ema.value().unwrap(), 22.5);
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(SimpleMovingAverage::new(0).is_err());
        assert!(ExponentialMovingAverage::new(0).is_err());
        assert!(sma(&[1.0], 0).is_err());
    }
}

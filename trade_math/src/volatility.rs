//! Volatility indicator implementations
//!
//! Contains implementations of:
//! - Rolling sample standard deviation
//! - Bollinger Bands (SMA ± k sample standard deviations)

use crate::moving_averages::SimpleMovingAverage;
use crate::{ensure_period, MathError, Result, Series};
use std::collections::VecDeque;

/// Sample standard deviation (n - 1 denominator) of a window.
///
/// A single value has no spread to estimate and yields `None`.
fn sample_std_dev<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a f64>,
    I::IntoIter: Clone,
{
    let iter = values.into_iter();
    let n = iter.clone().count();
    if n < 2 {
        return None;
    }

    let mean = iter.clone().sum::<f64>() / n as f64;
    let variance = iter.map(|&v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(variance.sqrt())
}

/// Rolling sample standard deviation
#[derive(Debug, Clone)]
pub struct StandardDeviation {
    period: usize,
    values: VecDeque<f64>,
}

impl StandardDeviation {
    /// Create a new StandardDeviation with the specified period
    pub fn new(period: usize) -> Result<Self> {
        ensure_period(period)?;

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period + 1),
        })
    }

    /// Update the StandardDeviation with a new value
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);

        if self.values.len() > self.period {
            self.values.pop_front();
        }
    }

    /// Get the current standard deviation, `None` until the window is full
    pub fn value(&self) -> Option<f64> {
        if self.values.len() < self.period {
            return None;
        }
        sample_std_dev(&self.values)
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Reset the StandardDeviation, clearing all values
    pub fn reset(&mut self) {
        self.values.clear();
    }
}

/// Bollinger Bands implementation
#[derive(Debug, Clone)]
pub struct BollingerBands {
    std_dev_multiplier: f64,
    sma: SimpleMovingAverage,
    std_dev: StandardDeviation,
}

/// One row of band values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub middle: f64,
    pub upper: f64,
    pub lower: f64,
}

impl Bands {
    /// Where `price` sits between the bands: 0 at the lower band, 1 at the upper
    ///
    /// Collapsed bands give a non-finite result.
    pub fn position(&self, price: f64) -> f64 {
        (price - self.lower) / (self.upper - self.lower)
    }
}

impl BollingerBands {
    /// Create a new Bollinger Bands with the specified parameters
    pub fn new(period: usize, std_dev_multiplier: f64) -> Result<Self> {
        if std_dev_multiplier <= 0.0 {
            return Err(MathError::InvalidInput(
                "Standard deviation multiplier must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            std_dev_multiplier,
            sma: SimpleMovingAverage::new(period)?,
            std_dev: StandardDeviation::new(period)?,
        })
    }

    /// Update the Bollinger Bands with a new price value
    pub fn update(&mut self, price: f64) {
        self.sma.update(price);
        self.std_dev.update(price);
    }

    /// Get the current bands
    pub fn value(&self) -> Option<Bands> {
        let middle = self.sma.value()?;
        let spread = self.std_dev.value()? * self.std_dev_multiplier;

        Some(Bands {
            middle,
            upper: middle + spread,
            lower: middle - spread,
        })
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.sma.period()
    }

    /// Reset the Bollinger Bands, clearing all values
    pub fn reset(&mut self) {
        self.sma.reset();
        self.std_dev.reset();
    }
}

/// Rolling sample standard deviation over a column that may contain missing
/// entries. A window containing any `None` yields `None`.
pub fn rolling_std(values: &[Option<f64>], period: usize) -> Result<Series> {
    ensure_period(period)?;

    Ok((0..values.len())
        .map(|end| {
            if end + 1 < period {
                return None;
            }
            let window = values[end + 1 - period..=end]
                .iter()
                .copied()
                .collect::<Option<Vec<f64>>>()?;
            sample_std_dev(&window)
        })
        .collect())
}

/// Bollinger Bands over a price series
pub fn bollinger_bands(
    prices: &[f64],
    period: usize,
    std_dev_multiplier: f64,
) -> Result<Vec<Option<Bands>>> {
    let mut indicator = BollingerBands::new(period, std_dev_multiplier)?;

    Ok(prices
        .iter()
        .map(|&p| {
            indicator.update(p);
            indicator.value()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_standard_deviation_uses_sample_denominator() {
        let mut std_dev = StandardDeviation::new(3).unwrap();
        std_dev.update(10.0);
        std_dev.update(20.0);
        assert!(std_dev.value().is_none());

        std_dev.update(30.0);
        // sqrt(200 / 2)
        assert_relative_eq!(std_dev.value().unwrap(), 10.0);
    }

    #[test]
    fn test_bollinger_bands_calculation() {
        let bands = bollinger_bands(&[10.0, 11.0, 9.0], 3, 2.0).unwrap();
        assert!(bands[1].is_none());

        let last = bands[2].unwrap();
        assert_relative_eq!(last.middle, 10.0);
        assert_relative_eq!(last.upper, 12.0);
        assert_relative_eq!(last.lower, 8.0);

        assert_relative_eq!(last.position(last.upper), 1.0);
        assert_relative_eq!(last.position(last.lower), 0.0);
        assert_relative_eq!(last.position(10.0), 0.5);
    }

    #[test]
    fn test_collapsed_bands_position_is_not_finite() {
        let bands = bollinger_bands(&[5.0, 5.0, 5.0], 3, 2.0).unwrap();
        let last = bands[2].unwrap();
        assert!(!last.position(5.0).is_finite());
    }

    #[test]
    fn test_rolling_std_propagates_missing() {
        let column = vec![None, Some(1.0), Some(3.0), Some(5.0)];
        let stds = rolling_std(&column, 2).unwrap();
        assert_eq!(stds[0], None);
        assert_eq!(stds[1], None);
        assert_relative_eq!(stds[2].unwrap(), 2.0_f64.sqrt());
        assert_relative_eq!(stds[3].unwrap(), 2.0_f64.sqrt());
    }

    #[test]
    fn test_invalid_multiplier_rejected() {
        assert!(BollingerBands::new(20, 0.0).is_err());
    }
}

//! Horizon-specific technical feature construction
//!
//! [`FeatureEngineer`] turns a daily OHLCV series into a [`FeatureTable`]: one
//! row per usable date, named feature columns in a fixed order and the close
//! `target_step` rows ahead as the regression target. Rows still inside an
//! indicator warm-up, a lag, or the target shift are dropped, as are rows
//! holding a NaN. Infinite values are kept.

use crate::data::TimeSeriesDataset;
use crate::error::{ForecastError, Result};
use crate::timeframe::Timeframe;
use chrono::NaiveDate;
use log::debug;
use ndarray::{Array1, Array2};
use trade_math::moving_averages::sma;
use trade_math::oscillators::{macd, rsi};
use trade_math::returns::{momentum, pct_change, rate_of_change, shift};
use trade_math::volatility::{bollinger_bands, rolling_std};
use trade_math::volume::volume_ratio;
use trade_math::Series;

const RSI_PERIOD: usize = 14;
const VOLUME_WINDOW: usize = 20;
const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;
const BOLLINGER_PERIOD: usize = 20;
const BOLLINGER_WIDTH: f64 = 2.0;
const MIN_LAGS: usize = 3;
const MAX_LAGS: usize = 10;

/// Feature matrix with aligned targets and dates
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    /// Column names, in matrix column order
    pub columns: Vec<String>,
    /// One entry per kept row, each `columns.len()` wide
    pub rows: Vec<Vec<f64>>,
    /// Close `target_step` rows after each kept row
    pub targets: Vec<f64>,
    /// Date of each kept row
    pub dates: Vec<NaiveDate>,
}

impl FeatureTable {
    /// Number of kept rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column across all kept rows
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx]).collect())
    }

    /// Rows as a dense matrix
    pub fn features(&self) -> Result<Array2<f64>> {
        let width = self.columns.len();
        let flat: Vec<f64> = self.rows.iter().flatten().copied().collect();

        Array2::from_shape_vec((self.rows.len(), width), flat).map_err(|_| {
            ForecastError::DimensionMismatch {
                expected: self.rows.len() * width,
                got: self.rows.iter().map(Vec::len).sum(),
            }
        })
    }

    /// Targets as a vector
    pub fn target_vector(&self) -> Array1<f64> {
        Array1::from_vec(self.targets.clone())
    }
}

/// Builds the feature table for one horizon
#[derive(Debug, Clone, Copy)]
pub struct FeatureEngineer {
    timeframe: Timeframe,
}

impl FeatureEngineer {
    pub fn new(timeframe: Timeframe) -> Self {
        Self { timeframe }
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Number of `close_lag_i` / `return_lag_i` pairs for a series of `rows` rows
    pub fn lag_count(rows: usize) -> usize {
        (rows / 100).clamp(MIN_LAGS, MAX_LAGS)
    }

    /// Compute every feature column and the shifted target
    pub fn engineer(&self, data: &TimeSeriesDataset) -> Result<FeatureTable> {
        let config = self.timeframe.config();
        let close = data.close();
        let n = data.len();

        let mut columns: Vec<(String, Series)> = Vec::new();

        for &window in config.ma_windows {
            if n >= window {
                columns.push((format!("ma{}", window), sma(close, window)?));
            }
        }

        columns.push(("rsi".to_string(), rsi(close, RSI_PERIOD)?));
        columns.push((
            "momentum".to_string(),
            momentum(close, config.momentum_window)?,
        ));
        columns.push((
            "roc".to_string(),
            rate_of_change(close, config.momentum_window)?,
        ));

        let returns = pct_change(close, 1)?;
        columns.push((
            "volatility".to_string(),
            rolling_std(&returns, config.volatility_window)?,
        ));

        let volume = volume_ratio(data.volume(), VOLUME_WINDOW)?;
        columns.push(("volume_ma".to_string(), volume.average));
        columns.push(("volume_ratio".to_string(), volume.ratio));

        let macd_lines = macd(close, MACD_FAST, MACD_SLOW, MACD_SIGNAL)?;
        columns.push(("macd".to_string(), present(macd_lines.macd)));
        columns.push(("macd_signal".to_string(), present(macd_lines.signal)));

        let bands = bollinger_bands(close, BOLLINGER_PERIOD, BOLLINGER_WIDTH)?;
        columns.push((
            "bb_middle".to_string(),
            bands.iter().map(|b| b.map(|b| b.middle)).collect(),
        ));
        columns.push((
            "bb_upper".to_string(),
            bands.iter().map(|b| b.map(|b| b.upper)).collect(),
        ));
        columns.push((
            "bb_lower".to_string(),
            bands.iter().map(|b| b.map(|b| b.lower)).collect(),
        ));
        columns.push((
            "bb_position".to_string(),
            bands
                .iter()
                .zip(close)
                .map(|(b, &price)| b.map(|b| b.position(price)))
                .collect(),
        ));

        columns.push((
            "high_low_ratio".to_string(),
            ratio(data.high(), data.low()),
        ));
        columns.push((
            "close_open_ratio".to_string(),
            ratio(close, data.open()),
        ));

        let close_column = present(close.to_vec());
        for lag in 1..=Self::lag_count(n) {
            columns.push((format!("close_lag_{}", lag), shift(&close_column, lag as isize)));
            columns.push((format!("return_lag_{}", lag), shift(&returns, lag as isize)));
        }

        let target = shift(&close_column, -(self.timeframe.target_step() as isize));

        let table = assemble(columns, &target, data.dates());
        debug!(
            "{} feature table: {} of {} rows kept, {} columns",
            self.timeframe,
            table.len(),
            n,
            table.columns.len()
        );

        Ok(table)
    }
}

fn present(values: Vec<f64>) -> Series {
    values.into_iter().map(Some).collect()
}

fn ratio(numerator: &[f64], denominator: &[f64]) -> Series {
    numerator
        .iter()
        .zip(denominator)
        .map(|(&a, &b)| Some(a / b))
        .collect()
}

/// Keep rows where every column and the target hold a non-NaN value
fn assemble(columns: Vec<(String, Series)>, target: &Series, dates: &[NaiveDate]) -> FeatureTable {
    let usable = |v: Option<f64>| v.filter(|x| !x.is_nan());

    let mut table = FeatureTable {
        columns: columns.iter().map(|(name, _)| name.clone()).collect(),
        rows: Vec::new(),
        targets: Vec::new(),
        dates: Vec::new(),
    };

    for (t, &date) in dates.iter().enumerate() {
        let Some(y) = usable(target[t]) else {
            continue;
        };
        let row: Option<Vec<f64>> = columns.iter().map(|(_, values)| usable(values[t])).collect();

        if let Some(row) = row {
            table.rows.push(row);
            table.targets.push(y);
            table.dates.push(date);
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lag_count_is_clamped() {
        assert_eq!(FeatureEngineer::lag_count(10), 3);
        assert_eq!(FeatureEngineer::lag_count(450), 4);
        assert_eq!(FeatureEngineer::lag_count(5000), 10);
    }
}

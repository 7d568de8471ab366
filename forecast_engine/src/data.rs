//! Time series data handling for forecasting

use crate::error::{ForecastError, Result};
use crate::timeframe::Timeframe;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of OHLCV data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Date of the data point
    pub date: NaiveDate,
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Volume
    pub volume: f64,
}

/// Daily OHLCV series stored column-wise, oldest row first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesDataset {
    dates: Vec<NaiveDate>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
}

impl TimeSeriesDataset {
    /// Build a dataset from rows. Ordering is checked by [`validate`](Self::validate).
    pub fn new(bars: Vec<Bar>) -> Self {
        let mut dataset = Self::default();
        for bar in bars {
            dataset.push(bar);
        }
        dataset
    }

    /// Build a dataset from parallel columns of equal length
    pub fn from_columns(
        dates: Vec<NaiveDate>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
        volume: Vec<f64>,
    ) -> Result<Self> {
        let expected = dates.len();
        for column in [&open, &high, &low, &close, &volume] {
            if column.len() != expected {
                return Err(ForecastError::DimensionMismatch {
                    expected,
                    got: column.len(),
                });
            }
        }

        Ok(Self {
            dates,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    /// Append one row
    pub fn push(&mut self, bar: Bar) {
        self.dates.push(bar.date);
        self.open.push(bar.open);
        self.high.push(bar.high);
        self.low.push(bar.low);
        self.close.push(bar.close);
        self.volume.push(bar.volume);
    }

    /// Check the series can be used for `symbol` at `timeframe`.
    ///
    /// Fails on an empty series, dates that are not strictly increasing, and
    /// non-finite or negative-volume rows.
    pub fn validate(&self, symbol: &str, timeframe: Timeframe) -> Result<()> {
        if self.is_empty() {
            return Err(ForecastError::EmptySeries {
                symbol: symbol.to_string(),
                timeframe: timeframe.to_string(),
            });
        }

        let malformed = |reason: String| ForecastError::MalformedSeries {
            symbol: symbol.to_string(),
            timeframe: timeframe.to_string(),
            reason,
        };

        if let Some(pos) = self.dates.windows(2).position(|w| w[1] <= w[0]) {
            return Err(malformed(format!(
                "dates must be strictly increasing, {} follows {}",
                self.dates[pos + 1],
                self.dates[pos]
            )));
        }

        for (i, bar) in self.bars().enumerate() {
            let prices = [bar.open, bar.high, bar.low, bar.close, bar.volume];
            if prices.iter().any(|v| !v.is_finite()) {
                return Err(malformed(format!("non-finite value on {}", bar.date)));
            }
            if bar.volume < 0.0 {
                return Err(malformed(format!("negative volume at row {}", i)));
            }
        }

        Ok(())
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the series has no rows
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn open(&self) -> &[f64] {
        &self.open
    }

    pub fn high(&self) -> &[f64] {
        &self.high
    }

    pub fn low(&self) -> &[f64] {
        &self.low
    }

    pub fn close(&self) -> &[f64] {
        &self.close
    }

    pub fn volume(&self) -> &[f64] {
        &self.volume
    }

    /// Most recent close, if any
    pub fn last_close(&self) -> Option<f64> {
        self.close.last().copied()
    }

    /// Most recent date, if any
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Iterate over the rows as [`Bar`] values
    pub fn bars(&self) -> impl Iterator<Item = Bar> + '_ {
        (0..self.len()).map(move |i| Bar {
            date: self.dates[i],
            open: self.open[i],
            high: self.high[i],
            low: self.low[i],
            close: self.close[i],
            volume: self.volume[i],
        })
    }
}

impl FromIterator<Bar> for TimeSeriesDataset {
    fn from_iter<I: IntoIterator<Item = Bar>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

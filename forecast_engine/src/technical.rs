//! Latest technical indicator readings for a series

use crate::data::TimeSeriesDataset;
use crate::error::Result;
use crate::volatility::{recent_annualized_volatility, RISK_WINDOW};
use serde::Serialize;
use trade_math::moving_averages::sma;
use trade_math::oscillators::{macd, rsi};
use trade_math::returns::{momentum, rate_of_change};
use trade_math::volatility::bollinger_bands;

const LONG_MA: usize = 200;
const CHANGE_WINDOW: usize = 10;

/// Indicator values on the most recent row.
///
/// Values still inside their warm-up window are `None`, except `ma200`,
/// which reads 0 for series shorter than 200 rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalSnapshot {
    pub current_price: f64,
    pub ma20: Option<f64>,
    pub ma50: Option<f64>,
    pub ma200: f64,
    pub rsi: Option<f64>,
    pub momentum: Option<f64>,
    pub roc: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    /// Annualised volatility of the last 20 daily returns, in percent
    pub volatility: Option<f64>,
}

impl TechnicalSnapshot {
    /// Snapshot of `data`; `None` for an empty series
    pub fn from_dataset(data: &TimeSeriesDataset) -> Result<Option<Self>> {
        let Some(current_price) = data.last_close() else {
            return Ok(None);
        };
        let close = data.close();

        let latest = |series: Vec<Option<f64>>| series.last().copied().flatten();

        let ma200 = if close.len() >= LONG_MA {
            latest(sma(close, LONG_MA)?).unwrap_or(0.0)
        } else {
            0.0
        };
        let macd_lines = macd(close, 12, 26, 9)?;
        let bands = bollinger_bands(close, 20, 2.0)?
            .last()
            .copied()
            .flatten();

        Ok(Some(Self {
            current_price,
            ma20: latest(sma(close, 20)?),
            ma50: latest(sma(close, 50)?),
            ma200,
            rsi: latest(rsi(close, 14)?),
            momentum: latest(momentum(close, CHANGE_WINDOW)?),
            roc: latest(rate_of_change(close, CHANGE_WINDOW)?),
            macd: macd_lines.macd.last().copied(),
            macd_signal: macd_lines.signal.last().copied(),
            bb_upper: bands.map(|b| b.upper),
            bb_middle: bands.map(|b| b.middle),
            bb_lower: bands.map(|b| b.lower),
            volatility: recent_annualized_volatility(close, RISK_WINDOW),
        }))
    }
}

//! Future price points with widening bands and decaying confidence, plus
//! the flat-band day-by-day prediction used for single-symbol queries

use crate::data::TimeSeriesDataset;
use crate::error::{ForecastError, Result};
use crate::features::FeatureTable;
use crate::timeframe::Timeframe;
use crate::trainer::TrainedModel;
use crate::volatility::daily_volatility;
use chrono::{Days, NaiveDate};
use log::debug;
use ndarray::ArrayView1;
use serde::Serialize;

/// Longest lookback of the linear trend term, in rows
const TREND_LOOKBACK: usize = 90;
/// Width of the forecast band in standard deviations
const BAND_WIDTH: f64 = 2.0;
/// Confidence lost across the whole horizon, in points
const CONFIDENCE_DECAY: f64 = 50.0;
/// Days covered by a day-by-day prediction when the caller does not choose
pub const DEFAULT_PREDICTION_DAYS: u32 = 30;

/// One forecast step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub days_ahead: u32,
    pub predicted_price: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
    pub confidence_score: f64,
}

/// One day of a day-by-day prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPrediction {
    pub date: NaiveDate,
    pub days_ahead: u32,
    pub predicted_price: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
}

/// Walks forward from the most recent row using a trained model
#[derive(Debug, Clone, Copy)]
pub struct ForecastGenerator {
    timeframe: Timeframe,
}

impl ForecastGenerator {
    pub fn new(timeframe: Timeframe) -> Self {
        Self { timeframe }
    }

    /// Confidence for a point `days_ahead` into a horizon of `total_days`
    pub fn confidence(days_ahead: u32, total_days: u32) -> f64 {
        (100.0 - days_ahead as f64 / total_days as f64 * CONFIDENCE_DECAY).max(0.0)
    }

    /// Linear close trend per row over the last `min(90, len / 2)` rows
    pub fn trend_rate(closes: &[f64]) -> f64 {
        let window = TREND_LOOKBACK.min(closes.len() / 2);
        if window == 0 {
            return 0.0;
        }
        let last = closes[closes.len() - 1];
        (last - closes[closes.len() - window]) / window as f64
    }

    /// Generate the horizon's forecast points.
    ///
    /// The model predicts once, from the latest feature row; every point
    /// reuses that prediction, adjusted by the trend term on long horizons.
    /// An empty table or series yields no points.
    pub fn generate(
        &self,
        model: &TrainedModel,
        table: &FeatureTable,
        data: &TimeSeriesDataset,
    ) -> Result<Vec<ForecastPoint>> {
        let (Some(last_row), Some(last_date), Some(current_price)) =
            (table.rows.last(), data.last_date(), data.last_close())
        else {
            return Ok(Vec::new());
        };

        let config = self.timeframe.config();
        let base = model.predict_row(ArrayView1::from(last_row.as_slice()))?;
        let trend = if self.timeframe.applies_trend_adjustment() {
            Self::trend_rate(data.close())
        } else {
            0.0
        };
        let daily_vol = daily_volatility(data.close());
        let step = self.timeframe.days_per_point();

        debug!(
            "{} forecast from {}: base={:.4} trend={:.6} daily_vol={:.6}",
            self.timeframe, last_date, base, trend, daily_vol
        );

        (1..=config.forecast_points as u32)
            .map(|i| {
                let days_ahead = i * step;
                let date = date_after(last_date, days_ahead)?;

                let predicted_price = base + trend * days_ahead as f64;
                let std_dev = daily_vol * current_price * (days_ahead as f64 / 30.0).sqrt();

                Ok(ForecastPoint {
                    date,
                    days_ahead,
                    predicted_price,
                    upper_bound: predicted_price + BAND_WIDTH * std_dev,
                    lower_bound: predicted_price - BAND_WIDTH * std_dev,
                    confidence_score: Self::confidence(days_ahead, config.total_days),
                })
            })
            .collect()
    }

    /// One prediction per calendar day for the next `days` days.
    ///
    /// Every day carries the latest-row prediction and the same band of
    /// ±2 × (daily return std × last close); there is no trend term and no
    /// confidence score.
    pub fn daily(
        model: &TrainedModel,
        table: &FeatureTable,
        data: &TimeSeriesDataset,
        days: u32,
    ) -> Result<Vec<DailyPrediction>> {
        let (Some(last_row), Some(last_date), Some(current_price)) =
            (table.rows.last(), data.last_date(), data.last_close())
        else {
            return Ok(Vec::new());
        };

        let predicted_price = model.predict_row(ArrayView1::from(last_row.as_slice()))?;
        let spread = BAND_WIDTH * daily_volatility(data.close()) * current_price;

        (1..=days)
            .map(|days_ahead| {
                Ok(DailyPrediction {
                    date: date_after(last_date, days_ahead)?,
                    days_ahead,
                    predicted_price,
                    upper_bound: predicted_price + spread,
                    lower_bound: predicted_price - spread,
                })
            })
            .collect()
    }
}

fn date_after(start: NaiveDate, days: u32) -> Result<NaiveDate> {
    start.checked_add_days(Days::new(days as u64)).ok_or_else(|| {
        ForecastError::InvalidParameter(format!(
            "forecast date {} days after {} is out of range",
            days, start
        ))
    })
}

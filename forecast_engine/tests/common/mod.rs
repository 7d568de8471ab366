#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use forecast_engine::data::{Bar, TimeSeriesDataset};

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

/// Series whose closes come from `close(i)`, with high/low one above/below,
/// open half a point under the close and constant volume
pub fn series_from<F>(n: usize, close: F) -> TimeSeriesDataset
where
    F: Fn(usize) -> f64,
{
    (0..n)
        .map(|i| {
            let c = close(i);
            Bar {
                date: start_date().checked_add_days(Days::new(i as u64)).unwrap(),
                open: c - 0.5,
                high: c + 1.0,
                low: c - 1.0,
                close: c,
                volume: 1_000_000.0,
            }
        })
        .collect()
}

/// Closes rising by exactly one per day from 100
pub fn rising_series(n: usize) -> TimeSeriesDataset {
    series_from(n, |i| 100.0 + i as f64)
}

/// Closes falling by half a point per day from 400
pub fn falling_series(n: usize) -> TimeSeriesDataset {
    series_from(n, |i| 400.0 - 0.5 * i as f64)
}

/// Upward drift with a weekly-ish oscillation, so returns have both signs
pub fn wavy_series(n: usize) -> TimeSeriesDataset {
    series_from(n, |i| {
        let t = i as f64;
        100.0 + 0.2 * t + 4.0 * (t / 5.0).sin() + 1.5 * (t / 2.3).cos()
    })
}

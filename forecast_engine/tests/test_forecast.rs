mod common;

use approx::assert_abs_diff_eq;
use chrono::Days;
use forecast_engine::forecast::ForecastGenerator;
use forecast_engine::timeframe::Timeframe;
use forecast_engine::volatility::daily_volatility;
use forecast_engine::{ForecastEngine, DEFAULT_PREDICTION_DAYS};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_confidence_decays_linearly() {
    assert_abs_diff_eq!(ForecastGenerator::confidence(0, 30), 100.0);
    assert_abs_diff_eq!(ForecastGenerator::confidence(15, 30), 75.0);
    assert_abs_diff_eq!(ForecastGenerator::confidence(30, 30), 50.0);
    // Past the horizon the score keeps falling but never below zero
    assert_abs_diff_eq!(ForecastGenerator::confidence(90, 30), 0.0);
    assert_abs_diff_eq!(ForecastGenerator::confidence(300, 30), 0.0);
}

#[test]
fn test_trend_rate_window() {
    let closes: Vec<f64> = (0..400).map(|i| 100.0 + i as f64).collect();
    // Window is capped at 90 rows
    assert_abs_diff_eq!(ForecastGenerator::trend_rate(&closes), 89.0 / 90.0, epsilon = 1e-12);

    // Short series use half their length
    let short = [10.0, 11.0, 12.0, 13.0];
    assert_abs_diff_eq!(ForecastGenerator::trend_rate(&short), 0.5, epsilon = 1e-12);

    assert_eq!(ForecastGenerator::trend_rate(&[42.0]), 0.0);
    assert_eq!(ForecastGenerator::trend_rate(&[]), 0.0);
}

#[rstest]
#[case(Timeframe::OneMonth, 300, 30, 1)]
#[case(Timeframe::SixMonths, 400, 26, 6)]
#[case(Timeframe::OneYear, 400, 52, 7)]
fn test_point_count_and_spacing(
    #[case] timeframe: Timeframe,
    #[case] rows: usize,
    #[case] points: usize,
    #[case] step: u32,
) {
    let data = common::wavy_series(rows);
    let engine = ForecastEngine::new();
    let forecast = engine.forecast(&data, "WAVE", timeframe).unwrap();

    assert_eq!(forecast.len(), points);
    let last_date = data.last_date().unwrap();
    for (i, point) in forecast.iter().enumerate() {
        let days = (i as u32 + 1) * step;
        assert_eq!(point.days_ahead, days);
        assert_eq!(
            point.date,
            last_date.checked_add_days(Days::new(days as u64)).unwrap()
        );
    }
}

#[test]
fn test_confidence_non_increasing_within_run() {
    let data = common::wavy_series(300);
    let forecast = ForecastEngine::new()
        .forecast(&data, "WAVE", Timeframe::OneMonth)
        .unwrap();

    assert!(forecast
        .windows(2)
        .all(|w| w[1].confidence_score <= w[0].confidence_score));
    assert!(forecast.first().unwrap().confidence_score <= 100.0);
    assert!(forecast.last().unwrap().confidence_score >= 0.0);
}

#[test]
fn test_bands_widen_with_time() {
    let data = common::wavy_series(300);
    let forecast = ForecastEngine::new()
        .forecast(&data, "WAVE", Timeframe::OneMonth)
        .unwrap();

    let widths: Vec<f64> = forecast
        .iter()
        .map(|p| p.upper_bound - p.lower_bound)
        .collect();
    assert!(widths.windows(2).all(|w| w[1] > w[0]));
    for point in &forecast {
        assert!(point.lower_bound < point.predicted_price);
        assert!(point.predicted_price < point.upper_bound);
    }
}

#[test]
fn test_short_horizon_has_no_trend_term() {
    let data = common::rising_series(300);
    let forecast = ForecastEngine::new()
        .forecast(&data, "RISE", Timeframe::OneMonth)
        .unwrap();

    let first = forecast[0].predicted_price;
    assert!(forecast.iter().all(|p| p.predicted_price == first));
}

#[test]
fn test_long_horizon_adds_trend_per_day() {
    let data = common::rising_series(400);
    let forecast = ForecastEngine::new()
        .forecast(&data, "RISE", Timeframe::OneYear)
        .unwrap();

    let per_point = 89.0 / 90.0 * 7.0;
    for pair in forecast.windows(2) {
        assert_abs_diff_eq!(
            pair[1].predicted_price - pair[0].predicted_price,
            per_point,
            epsilon = 1e-6
        );
    }
}

#[test]
fn test_untrainable_horizon_gives_empty_forecast() {
    // 300 rows leave far fewer than the 200 feature rows five years need
    let data = common::wavy_series(300);
    let engine = ForecastEngine::new();

    let forecast = engine.forecast(&data, "WAVE", Timeframe::FiveYears).unwrap();
    assert!(forecast.is_empty());
    assert!(engine.cache().is_empty());
}

#[test]
fn test_no_feature_rows_gives_empty_forecast() {
    let data = common::wavy_series(15);
    let forecast = ForecastEngine::new()
        .forecast(&data, "WAVE", Timeframe::OneMonth)
        .unwrap();
    assert!(forecast.is_empty());
}

#[test]
fn test_forecast_reuses_cached_model() {
    let data = common::wavy_series(300);
    let engine = ForecastEngine::new();

    let first = engine.forecast(&data, "WAVE", Timeframe::OneMonth).unwrap();
    assert_eq!(engine.cache().len(), 1);
    let second = engine.forecast(&data, "WAVE", Timeframe::OneMonth).unwrap();

    assert_eq!(first, second);
    assert_eq!(engine.cache().len(), 1);
}

#[test]
fn test_stale_cached_model_is_replaced() {
    // 300 rows give three lag pairs, 450 give four
    let engine = ForecastEngine::new();
    engine
        .forecast(&common::wavy_series(300), "WAVE", Timeframe::OneMonth)
        .unwrap();

    let longer = common::wavy_series(450);
    let forecast = engine.forecast(&longer, "WAVE", Timeframe::OneMonth).unwrap();
    assert_eq!(forecast.len(), 30);
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(30)]
#[case(45)]
fn test_daily_prediction_one_point_per_day(#[case] days: u32) {
    let data = common::wavy_series(300);
    let predictions = ForecastEngine::new()
        .predict_days(&data, "WAVE", days)
        .unwrap();

    assert_eq!(predictions.len(), days as usize);
    let last_date = data.last_date().unwrap();
    for (i, day) in predictions.iter().enumerate() {
        let ahead = i as u32 + 1;
        assert_eq!(day.days_ahead, ahead);
        assert_eq!(
            day.date,
            last_date.checked_add_days(Days::new(ahead as u64)).unwrap()
        );
    }
}

#[test]
fn test_daily_band_is_flat() {
    let data = common::wavy_series(300);
    let predictions = ForecastEngine::new()
        .predict_days(&data, "WAVE", DEFAULT_PREDICTION_DAYS)
        .unwrap();
    assert_eq!(predictions.len(), 30);

    // Two standard deviations of daily returns, priced at the last close
    let expected_width = 4.0 * daily_volatility(data.close()) * data.last_close().unwrap();
    for day in &predictions {
        assert_abs_diff_eq!(day.upper_bound - day.lower_bound, expected_width, epsilon = 1e-9);
        assert_abs_diff_eq!(day.predicted_price, predictions[0].predicted_price);
    }
}

#[test]
fn test_daily_prediction_shares_the_one_month_model() {
    let data = common::wavy_series(300);
    let engine = ForecastEngine::new();

    let forecast = engine.forecast(&data, "WAVE", Timeframe::OneMonth).unwrap();
    let daily = engine.predict_days(&data, "WAVE", 5).unwrap();

    // Same cached model, same latest row, and no trend term on 1M
    assert_eq!(engine.cache().len(), 1);
    assert_abs_diff_eq!(daily[0].predicted_price, forecast[0].predicted_price);
}

#[test]
fn test_daily_prediction_empty_cases() {
    let engine = ForecastEngine::new();

    let data = common::wavy_series(300);
    assert!(engine.predict_days(&data, "WAVE", 0).unwrap().is_empty());

    // Too few rows for any feature row
    let short = common::wavy_series(15);
    assert!(engine.predict_days(&short, "TINY", 10).unwrap().is_empty());
}

use approx::assert_abs_diff_eq;
use forecast_engine::volatility::{
    annualize_daily_volatility, calculate_returns, daily_volatility,
    recent_annualized_volatility, TRADING_DAYS,
};

#[test]
fn test_calculate_returns() {
    let returns = calculate_returns(&[100.0, 110.0, 99.0]);
    assert_eq!(returns.len(), 2);
    assert_abs_diff_eq!(returns[0], 0.1, epsilon = 1e-12);
    assert_abs_diff_eq!(returns[1], -0.1, epsilon = 1e-12);

    assert!(calculate_returns(&[100.0]).is_empty());
    assert!(calculate_returns(&[]).is_empty());
}

#[test]
fn test_daily_volatility_is_sample_std() {
    // Returns +10% and -10%: mean 0, sample variance 0.02
    let vol = daily_volatility(&[100.0, 110.0, 99.0]);
    assert_abs_diff_eq!(vol, 0.02_f64.sqrt(), epsilon = 1e-12);

    // Constant growth has no spread
    let steady: Vec<f64> = (0..10).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
    assert_abs_diff_eq!(daily_volatility(&steady), 0.0, epsilon = 1e-12);

    assert!(daily_volatility(&[100.0, 101.0]).is_nan());
}

#[test]
fn test_annualization() {
    assert_abs_diff_eq!(
        annualize_daily_volatility(0.01),
        0.01 * TRADING_DAYS.sqrt() * 100.0,
        epsilon = 1e-12
    );
    assert_abs_diff_eq!(annualize_daily_volatility(0.01), 15.874507866387544, epsilon = 1e-9);
}

#[test]
fn test_recent_volatility_uses_last_window() {
    // Wild swings early, calm growth for the last 20 returns
    let mut prices = vec![100.0, 150.0, 80.0, 160.0, 70.0];
    let mut last = 70.0;
    for _ in 0..20 {
        last *= 1.001;
        prices.push(last);
    }

    let recent = recent_annualized_volatility(&prices, 20).unwrap();
    assert_abs_diff_eq!(recent, 0.0, epsilon = 1e-9);

    let whole = recent_annualized_volatility(&prices, 24).unwrap();
    assert!(whole > 100.0);
}

#[test]
fn test_recent_volatility_needs_full_window() {
    let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
    // 19 returns are not enough for a 20-return window
    assert!(recent_annualized_volatility(&prices, 20).is_none());
    assert!(recent_annualized_volatility(&prices, 19).is_some());
}

use forecast_engine::ForecastError;
use trade_math::MathError;

#[test]
fn test_error_conversion() {
    // Indicator errors convert into the engine error
    let math_error = MathError::InvalidInput("period must be positive".to_string());
    let forecast_error = ForecastError::from(math_error);

    match forecast_error {
        ForecastError::Math(_) => {}
        _ => panic!("Expected Math variant"),
    }
}

#[test]
fn test_error_display() {
    let error = ForecastError::InvalidParameter("alpha must be non-negative".to_string());
    assert!(error.to_string().contains("alpha must be non-negative"));

    let error = ForecastError::InvalidTimeframe("2W".to_string());
    assert_eq!(error.to_string(), "Invalid timeframe: 2W");

    let error = ForecastError::MalformedSeries {
        symbol: "ABC".to_string(),
        timeframe: "1M".to_string(),
        reason: "negative volume at row 3".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Malformed series for ABC (1M): negative volume at row 3"
    );

    let error = ForecastError::DimensionMismatch {
        expected: 3,
        got: 2,
    };
    assert_eq!(error.to_string(), "Dimension mismatch: expected 3, got 2");

    // Insufficient data carries its message unchanged
    let error = ForecastError::InsufficientData("need more rows".to_string());
    assert_eq!(error.to_string(), "need more rows");
}

#[test]
fn test_math_error_source_is_kept() {
    use std::error::Error;

    let error = ForecastError::from(MathError::InsufficientData("3 < 5".to_string()));
    assert!(error.to_string().starts_with("Math error"));
    assert!(error.source().is_some());
}

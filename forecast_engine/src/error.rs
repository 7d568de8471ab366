//! Error types for the forecast_engine crate

use thiserror::Error;
use trade_math::MathError;

/// Custom error types for the forecast_engine crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Timeframe string outside `1M`, `6M`, `1Y`, `5Y`
    #[error("Invalid timeframe: {0}")]
    InvalidTimeframe(String),

    /// The input series has no rows
    #[error("Empty series for {symbol} ({timeframe})")]
    EmptySeries { symbol: String, timeframe: String },

    /// Dates out of order or non-finite OHLCV values
    #[error("Malformed series for {symbol} ({timeframe}): {reason}")]
    MalformedSeries {
        symbol: String,
        timeframe: String,
        reason: String,
    },

    /// Not enough feature rows to train, where a result cannot be built without a model
    #[error("{0}")]
    InsufficientData(String),

    /// Matrix or vector shapes disagree
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Prediction requested from a model that has not been fitted
    #[error("Model has not been fitted")]
    NotFitted,

    /// Error raised while fitting or evaluating a model
    #[error("Model error: {0}")]
    ModelError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from indicator math
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

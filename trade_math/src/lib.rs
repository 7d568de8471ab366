//! # Trade Math
//!
//! Technical indicator math over daily price and volume series.
//!
//! Every indicator comes in two shapes: a streaming struct (`new`, `update`,
//! `value`, `reset`) and a series function that runs the struct over a whole
//! slice. Series functions return one entry per input row; rows still inside
//! an indicator's warm-up window are `None`, so callers can align columns by
//! index and drop incomplete rows afterwards.

use thiserror::Error;

// Indicator modules
pub mod moving_averages;
pub mod oscillators;
pub mod returns;
pub mod volatility;
pub mod volume;

/// Errors that can occur in trading-related calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for trading math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// A column of indicator values aligned with its input rows
pub type Series = Vec<Option<f64>>;

pub(crate) fn ensure_period(period: usize) -> Result<()> {
    if period == 0 {
        return Err(MathError::InvalidInput(
            "Period must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_period_is_rejected() {
        assert!(matches!(
            ensure_period(0),
            Err(MathError::InvalidInput(_))
        ));
        assert!(ensure_period(1).is_ok());
    }
}

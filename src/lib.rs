//! # Price Horizon
//!
//! Workspace facade over the indicator math in [`trade_math`] and the
//! multi-timeframe forecasting engine in [`forecast_engine`].
//!
//! ## Example
//!
//! ```
//! use price_horizon_workspace::prelude::*;
//!
//! let timeframe: Timeframe = "1Y".parse().unwrap();
//! let engine = ForecastEngine::new();
//! let targets = engine.price_targets(100.0, timeframe, Trend::Bearish);
//! assert_eq!(targets.moderate.price, 125.0);
//! ```

pub use forecast_engine;
pub use trade_math;

/// Types most callers need
pub mod prelude {
    pub use forecast_engine::{
        Bar, DailyPrediction, EngineConfig, ForecastEngine, ForecastError, ForecastPoint, HorizonReport,
        ModelComparison, Recommendation, Signal, Timeframe, TimeSeriesDataset, TrainOutcome,
        Trend,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_reaches_both_crates() {
        let closes = [1.0, 2.0, 3.0, 4.0];
        let sma = crate::trade_math::moving_averages::sma(&closes, 2).unwrap();
        assert_eq!(sma[3], Some(3.5));

        assert_eq!(Timeframe::FiveYears.to_string(), "5Y");
        assert!(ForecastEngine::new().cache().is_empty());
    }
}

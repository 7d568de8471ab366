//! # Forecast Engine
//!
//! Multi-timeframe price forecasting from daily OHLCV history.
//!
//! ## Features
//!
//! - Per-horizon feature engineering (moving averages, RSI, MACD, Bollinger bands, lags)
//! - Tree ensembles and linear regressors trained on a chronological split
//! - Forecast paths with widening confidence bands and long-horizon trend drift
//! - Day-by-day short-horizon predictions with a flat band
//! - Trend classification, price targets, risk tiers and two recommendation policies
//! - Side-by-side comparison of five regression families
//! - A concurrent, single-flight model cache keyed by symbol and horizon
//!
//! ## Horizons
//!
//! | Horizon | Points | Days | Model             |
//! |---------|--------|------|-------------------|
//! | `1M`    | 30     | 30   | Random Forest     |
//! | `6M`    | 26     | 180  | Random Forest     |
//! | `1Y`    | 52     | 365  | Gradient Boosting |
//! | `5Y`    | 60     | 1825 | Gradient Boosting |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use forecast_engine::{ForecastEngine, Timeframe, TimeSeriesDataset};
//!
//! # fn load() -> TimeSeriesDataset { unimplemented!() }
//! let data: TimeSeriesDataset = load();
//! let engine = ForecastEngine::new();
//!
//! let report = engine.predict_horizon(&data, "AAPL", Timeframe::OneYear)?;
//! println!("{} {}", report.trend, report.signal.recommendation);
//! for point in &report.forecast {
//!     println!("{} {:.2}", point.date, point.predicted_price);
//! }
//! # Ok::<(), forecast_engine::ForecastError>(())
//! ```

pub mod cache;
pub mod comparison;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod features;
pub mod forecast;
pub mod metrics;
pub mod models;
pub mod recommendation;
pub mod scaler;
pub mod technical;
pub mod timeframe;
pub mod trainer;
pub mod trend;
pub mod volatility;

// Re-export commonly used types
pub use crate::comparison::{ModelComparator, ModelComparison, ModelResult};
pub use crate::config::EngineConfig;
pub use crate::data::{Bar, TimeSeriesDataset};
pub use crate::engine::{ForecastEngine, HorizonReport, MultiHorizonAnalysis, StockAnalysis};
pub use crate::error::{ForecastError, Result};
pub use crate::features::{FeatureEngineer, FeatureTable};
pub use crate::forecast::{
    DailyPrediction, ForecastGenerator, ForecastPoint, DEFAULT_PREDICTION_DAYS,
};
pub use crate::metrics::EvaluationMetrics;
pub use crate::models::{ModelFamily, Regressor};
pub use crate::recommendation::{Level, PriceTargets, Recommendation, Signal};
pub use crate::timeframe::Timeframe;
pub use crate::trainer::{ModelTrainer, TrainOutcome, TrainingReport};
pub use crate::trend::{Trend, TrendAnalyzer};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! Entry point tying features, training, caching and scoring together

use crate::cache::{ModelCache, ModelKey};
use crate::comparison::{ModelComparator, ModelComparison};
use crate::config::EngineConfig;
use crate::data::TimeSeriesDataset;
use crate::error::{ForecastError, Result};
use crate::features::{FeatureEngineer, FeatureTable};
use crate::forecast::{DailyPrediction, ForecastGenerator, ForecastPoint};
use crate::metrics::EvaluationMetrics;
use crate::models::ModelFamily;
use crate::recommendation::{
    price_targets, risk_level, trend_signal, weighted_signal, Level, PriceTargets, ScoreInputs,
    ScoredSignal, Signal,
};
use crate::technical::TechnicalSnapshot;
use crate::timeframe::Timeframe;
use crate::trainer::{FeatureImportance, ModelTrainer, TrainOutcome, TrainedModel};
use crate::trend::{Trend, TrendAnalyzer};
use chrono::NaiveDate;
use log::{debug, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Horizon used for single-day analysis, daily prediction and model comparison
const SHORT_HORIZON: Timeframe = Timeframe::OneMonth;

/// Full result for one horizon
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizonReport {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub model_family: ModelFamily,
    pub current_price: f64,
    pub trend: Trend,
    pub signal: Signal,
    pub price_targets: PriceTargets,
    pub metrics: EvaluationMetrics,
    pub forecast: Vec<ForecastPoint>,
    pub forecast_points: usize,
}

/// Reports for every horizon; a horizon that could not be built is `None`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiHorizonAnalysis {
    pub symbol: String,
    pub horizons: BTreeMap<Timeframe, Option<HorizonReport>>,
}

/// Single-day analysis from the short-horizon model and current indicators
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAnalysis {
    pub symbol: String,
    pub current_price: f64,
    pub technical: TechnicalSnapshot,
    pub signal: ScoredSignal,
    pub risk_level: Level,
    pub metrics: EvaluationMetrics,
    pub feature_importance: Vec<FeatureImportance>,
    pub predictions: Vec<f64>,
    pub actuals: Vec<f64>,
    pub dates: Vec<NaiveDate>,
}

/// Multi-timeframe forecasting engine.
///
/// Owns the model cache; share one engine (for example behind an `Arc`) to
/// share trained models across callers.
#[derive(Debug, Default)]
pub struct ForecastEngine {
    config: EngineConfig,
    cache: ModelCache,
}

impl ForecastEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            cache: ModelCache::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &ModelCache {
        &self.cache
    }

    fn features(
        &self,
        data: &TimeSeriesDataset,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<FeatureTable> {
        data.validate(symbol, timeframe)?;
        FeatureEngineer::new(timeframe).engineer(data)
    }

    /// Train (or retrain) the horizon model and cache it
    pub fn train(
        &self,
        data: &TimeSeriesDataset,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<TrainOutcome> {
        let table = self.features(data, symbol, timeframe)?;
        let trainer = ModelTrainer::new(timeframe, self.config.clone());

        self.cache
            .retrain(&ModelKey::for_horizon(symbol, timeframe), || {
                let run = trainer.train(&table, symbol)?;
                Ok((run.outcome, run.model))
            })
    }

    /// Cached model for the horizon fitted on `table`'s columns, training
    /// when absent or stale; `None` when the table cannot be trained on
    fn fitted_model(
        &self,
        table: &FeatureTable,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Option<Arc<TrainedModel>>> {
        let trainer = ModelTrainer::new(timeframe, self.config.clone());
        let key = ModelKey::for_horizon(symbol, timeframe);
        let model = self
            .cache
            .get_or_train(&key, || Ok(trainer.train(table, symbol)?.model))?;

        // Series length decides which columns exist; a model fitted on other columns is stale
        let fits_table = |m: &Arc<TrainedModel>| m.feature_columns() == table.columns.as_slice();
        if model.as_ref().map_or(false, |m| !fits_table(m)) {
            debug!("cached {} model for {} is stale, retraining", timeframe, symbol);
            self.cache
                .retrain(&key, || Ok(((), trainer.train(table, symbol)?.model)))?;
            return Ok(self.cache.get(&key).filter(fits_table));
        }
        Ok(model)
    }

    /// Forecast points for the horizon, training first if no model is cached.
    ///
    /// Empty when there are no feature rows or too few to train.
    pub fn forecast(
        &self,
        data: &TimeSeriesDataset,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<ForecastPoint>> {
        let table = self.features(data, symbol, timeframe)?;
        if table.is_empty() {
            return Ok(Vec::new());
        }

        match self.fitted_model(&table, symbol, timeframe)? {
            Some(model) => ForecastGenerator::new(timeframe).generate(&model, &table, data),
            None => Ok(Vec::new()),
        }
    }

    /// Day-by-day prediction for the next `days` calendar days from the
    /// short-horizon model, with a constant band.
    ///
    /// Empty when the short-horizon model cannot be trained.
    pub fn predict_days(
        &self,
        data: &TimeSeriesDataset,
        symbol: &str,
        days: u32,
    ) -> Result<Vec<DailyPrediction>> {
        let table = self.features(data, symbol, SHORT_HORIZON)?;
        if table.is_empty() || days == 0 {
            return Ok(Vec::new());
        }

        match self.fitted_model(&table, symbol, SHORT_HORIZON)? {
            Some(model) => ForecastGenerator::daily(&model, &table, data, days),
            None => Ok(Vec::new()),
        }
    }

    /// Trend of the closes at the horizon's comparison period
    pub fn analyze_trend(
        &self,
        data: &TimeSeriesDataset,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Trend> {
        data.validate(symbol, timeframe)?;
        Ok(TrendAnalyzer::new(timeframe).analyze(data.close()))
    }

    pub fn price_targets(
        &self,
        current_price: f64,
        timeframe: Timeframe,
        trend: Trend,
    ) -> PriceTargets {
        price_targets(current_price, timeframe, trend)
    }

    /// Benchmark every regression family on the short-horizon features
    pub fn compare_models(&self, data: &TimeSeriesDataset, symbol: &str) -> Result<ModelComparison> {
        let table = self.features(data, symbol, SHORT_HORIZON)?;
        ModelComparator::new(self.config.seed).compare(&table, symbol)
    }

    /// Top `top_n` features of the cached horizon model, `None` if none is cached
    pub fn feature_importance(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        top_n: usize,
    ) -> Option<Vec<FeatureImportance>> {
        self.cache
            .get(&ModelKey::for_horizon(symbol, timeframe))
            .map(|model| model.top_features(top_n))
    }

    /// Train, forecast and score one horizon
    pub fn predict_horizon(
        &self,
        data: &TimeSeriesDataset,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<HorizonReport> {
        let report = match self.train(data, symbol, timeframe)? {
            TrainOutcome::Trained(report) => report,
            TrainOutcome::InsufficientData { message, .. } => {
                return Err(ForecastError::InsufficientData(message))
            }
        };

        let forecast = self.forecast(data, symbol, timeframe)?;
        let current_price = data.last_close().ok_or_else(|| ForecastError::EmptySeries {
            symbol: symbol.to_string(),
            timeframe: timeframe.to_string(),
        })?;
        let trend = self.analyze_trend(data, symbol, timeframe)?;

        Ok(HorizonReport {
            symbol: symbol.to_string(),
            timeframe,
            model_family: report.model_family,
            current_price,
            trend,
            signal: trend_signal(trend, report.metrics.r2),
            price_targets: price_targets(current_price, timeframe, trend),
            metrics: report.metrics,
            forecast_points: forecast.len(),
            forecast,
        })
    }

    /// Horizon reports for all four horizons
    pub fn analyze_all_horizons(
        &self,
        data: &TimeSeriesDataset,
        symbol: &str,
    ) -> MultiHorizonAnalysis {
        let horizons = Timeframe::ALL
            .iter()
            .map(|&timeframe| {
                let report = match self.predict_horizon(data, symbol, timeframe) {
                    Ok(report) => Some(report),
                    Err(err) => {
                        warn!("{} analysis for {} failed: {}", timeframe, symbol, err);
                        None
                    }
                };
                (timeframe, report)
            })
            .collect();

        MultiHorizonAnalysis {
            symbol: symbol.to_string(),
            horizons,
        }
    }

    /// Single-day analysis: short-horizon model, indicator snapshot,
    /// weighted-score recommendation and risk tier
    pub fn analyze_stock(&self, data: &TimeSeriesDataset, symbol: &str) -> Result<StockAnalysis> {
        let report = match self.train(data, symbol, SHORT_HORIZON)? {
            TrainOutcome::Trained(report) => report,
            TrainOutcome::InsufficientData { message, .. } => {
                return Err(ForecastError::InsufficientData(message))
            }
        };

        let technical =
            TechnicalSnapshot::from_dataset(data)?.ok_or_else(|| ForecastError::EmptySeries {
                symbol: symbol.to_string(),
                timeframe: SHORT_HORIZON.to_string(),
            })?;

        let signal = weighted_signal(&ScoreInputs {
            snapshot: &technical,
            predictions: &report.predictions,
            actuals: &report.actuals,
            r2: report.metrics.r2,
        });

        Ok(StockAnalysis {
            symbol: symbol.to_string(),
            current_price: technical.current_price,
            risk_level: risk_level(technical.volatility),
            signal,
            technical,
            metrics: report.metrics,
            feature_importance: report.feature_importance,
            predictions: report.predictions,
            actuals: report.actuals,
            dates: report.dates,
        })
    }
}

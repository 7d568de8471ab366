//! Chronological training and evaluation for one horizon

use crate::config::EngineConfig;
use crate::error::{ForecastError, Result};
use crate::features::FeatureTable;
use crate::metrics::{evaluate, residual_std, EvaluationMetrics};
use crate::models::{horizon_model, ModelFamily, Regressor};
use crate::scaler::StandardScaler;
use crate::timeframe::Timeframe;
use chrono::NaiveDate;
use log::{info, warn};
use ndarray::{s, Array2, ArrayView1, Axis};
use serde::Serialize;

/// Width of the evaluation band in residual standard deviations
const BAND_WIDTH: f64 = 2.0;

/// One feature and its normalised importance
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Fitted model state kept in the cache
#[derive(Debug)]
pub struct TrainedModel {
    family: ModelFamily,
    regressor: Box<dyn Regressor>,
    scaler: StandardScaler,
    feature_columns: Vec<String>,
    importances: Option<Vec<FeatureImportance>>,
    metrics: EvaluationMetrics,
    residual_std: f64,
    test_predictions: Vec<f64>,
    test_actuals: Vec<f64>,
}

impl TrainedModel {
    pub fn family(&self) -> ModelFamily {
        self.family
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn metrics(&self) -> &EvaluationMetrics {
        &self.metrics
    }

    /// Population standard deviation of the test residuals
    pub fn residual_std(&self) -> f64 {
        self.residual_std
    }

    pub fn test_predictions(&self) -> &[f64] {
        &self.test_predictions
    }

    pub fn test_actuals(&self) -> &[f64] {
        &self.test_actuals
    }

    /// Features ranked by importance, most important first
    pub fn importances(&self) -> Option<&[FeatureImportance]> {
        self.importances.as_deref()
    }

    /// The `n` most important features, empty for models without importances
    pub fn top_features(&self, n: usize) -> Vec<FeatureImportance> {
        self.importances
            .iter()
            .flatten()
            .take(n)
            .cloned()
            .collect()
    }

    /// Predict the target for one unscaled feature row
    pub fn predict_row(&self, row: ArrayView1<f64>) -> Result<f64> {
        let matrix = self.scaler.transform_row(row)?.insert_axis(Axis(0));

        self.regressor
            .predict(&matrix)?
            .first()
            .copied()
            .ok_or_else(|| ForecastError::ModelError("model returned no prediction".to_string()))
    }
}

/// Test-window results of a successful training run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingReport {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub model_family: ModelFamily,
    pub predictions: Vec<f64>,
    pub actuals: Vec<f64>,
    pub dates: Vec<NaiveDate>,
    pub upper_bound: Vec<f64>,
    pub lower_bound: Vec<f64>,
    pub metrics: EvaluationMetrics,
    pub feature_columns: Vec<String>,
    pub feature_importance: Vec<FeatureImportance>,
    pub train_size: usize,
    pub test_size: usize,
}

/// Result of a training request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum TrainOutcome {
    Trained(TrainingReport),
    InsufficientData {
        message: String,
        metrics: EvaluationMetrics,
    },
}

impl TrainOutcome {
    pub fn metrics(&self) -> &EvaluationMetrics {
        match self {
            TrainOutcome::Trained(report) => &report.metrics,
            TrainOutcome::InsufficientData { metrics, .. } => metrics,
        }
    }

    pub fn report(&self) -> Option<&TrainingReport> {
        match self {
            TrainOutcome::Trained(report) => Some(report),
            TrainOutcome::InsufficientData { .. } => None,
        }
    }

    pub fn is_trained(&self) -> bool {
        matches!(self, TrainOutcome::Trained(_))
    }
}

/// Outcome plus the fitted state to cache, when there is one
#[derive(Debug)]
pub struct TrainingRun {
    pub outcome: TrainOutcome,
    pub model: Option<TrainedModel>,
}

/// Trains the horizon's model family on a feature table
#[derive(Debug, Clone)]
pub struct ModelTrainer {
    timeframe: Timeframe,
    config: EngineConfig,
}

impl ModelTrainer {
    pub fn new(timeframe: Timeframe, config: EngineConfig) -> Self {
        Self { timeframe, config }
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Fit on the first `train_ratio` of rows and evaluate on the rest
    pub fn train(&self, table: &FeatureTable, symbol: &str) -> Result<TrainingRun> {
        let tf_config = self.timeframe.config();
        let n = table.len();

        if n < tf_config.min_samples {
            let message = format!(
                "Insufficient data for {} training. Need at least {} samples, got {}",
                self.timeframe, tf_config.min_samples, n
            );
            warn!("{} ({})", message, symbol);
            return Ok(TrainingRun {
                outcome: TrainOutcome::InsufficientData {
                    message,
                    metrics: EvaluationMetrics::zero(),
                },
                model: None,
            });
        }

        let split = (n as f64 * self.config.train_ratio).floor() as usize;
        if split == 0 || split >= n {
            return Err(ForecastError::InvalidParameter(format!(
                "train ratio {} leaves an empty slice for {} rows",
                self.config.train_ratio, n
            )));
        }

        let family = tf_config.family;
        info!(
            "Training {} for {} ({}) on {} rows, testing on {}",
            family,
            symbol,
            self.timeframe,
            split,
            n - split
        );

        let x = table.features()?;
        let y = table.target_vector();
        let x_train = x.slice(s![..split, ..]).to_owned();
        let x_test = x.slice(s![split.., ..]).to_owned();
        let y_train = y.slice(s![..split]).to_owned();
        let actuals: Vec<f64> = y.slice(s![split..]).to_vec();

        let scaler = StandardScaler::fit(&x_train)?;
        let x_train_scaled = scaler.transform(&x_train)?;
        let x_test_scaled: Array2<f64> = scaler.transform(&x_test)?;

        let mut regressor = horizon_model(family, self.config.seed);
        regressor.fit(&x_train_scaled, &y_train)?;
        let predictions = regressor.predict(&x_test_scaled)?.to_vec();

        let metrics = evaluate(&actuals, &predictions)?;
        let spread = residual_std(&actuals, &predictions);
        let importances = regressor.feature_importances().map(|values| {
            let mut ranked: Vec<FeatureImportance> = table
                .columns
                .iter()
                .zip(values)
                .map(|(feature, &importance)| FeatureImportance {
                    feature: feature.clone(),
                    importance,
                })
                .collect();
            ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
            ranked
        });

        info!(
            "{} {} trained: rmse={:.4} mae={:.4} r2={:.4} mape={:.2}%",
            symbol, self.timeframe, metrics.rmse, metrics.mae, metrics.r2, metrics.mape
        );

        let model = TrainedModel {
            family,
            regressor,
            scaler,
            feature_columns: table.columns.clone(),
            importances,
            metrics,
            residual_std: spread,
            test_predictions: predictions.clone(),
            test_actuals: actuals.clone(),
        };

        let report = TrainingReport {
            symbol: symbol.to_string(),
            timeframe: self.timeframe,
            model_family: family,
            upper_bound: predictions.iter().map(|p| p + BAND_WIDTH * spread).collect(),
            lower_bound: predictions.iter().map(|p| p - BAND_WIDTH * spread).collect(),
            predictions,
            actuals,
            dates: table.dates[split..].to_vec(),
            metrics,
            feature_columns: table.columns.clone(),
            feature_importance: model.top_features(self.config.top_features),
            train_size: split,
            test_size: n - split,
        };

        Ok(TrainingRun {
            outcome: TrainOutcome::Trained(report),
            model: Some(model),
        })
    }
}

//! Side-by-side evaluation of the regression families
//!
//! Unlike the horizon trainer, the comparison uses a shuffled split: rows are
//! permuted with the configured seed and the first `ceil(0.2 n)` become the
//! test set. Scores are therefore not comparable with the chronological
//! training metrics.

use crate::error::{ForecastError, Result};
use crate::features::FeatureTable;
use crate::metrics::{evaluate, EvaluationMetrics};
use crate::models::{
    BoostingConfig, ForestConfig, GradientBoosting, LassoRegression, LinearRegression,
    ModelFamily, RandomForest, Regressor, RidgeRegression,
};
use crate::scaler::StandardScaler;
use log::info;
use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Share of rows held out for testing
const TEST_FRACTION: f64 = 0.2;

/// Test metrics for one family
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResult {
    pub name: String,
    pub family: ModelFamily,
    #[serde(flatten)]
    pub metrics: EvaluationMetrics,
}

/// Every family's result, best R² first
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelComparison {
    pub symbol: String,
    pub results: Vec<ModelResult>,
    pub best_model: String,
}

/// Trains and scores each family on the same shuffled split
#[derive(Debug, Clone)]
pub struct ModelComparator {
    seed: u64,
}

impl ModelComparator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// The families compared, configured as they are benchmarked
    fn candidates(&self) -> Vec<(ModelFamily, Box<dyn Regressor>)> {
        vec![
            (
                ModelFamily::LinearRegression,
                Box::new(LinearRegression::new()) as Box<dyn Regressor>,
            ),
            (ModelFamily::Ridge, Box::new(RidgeRegression::new(1.0))),
            (ModelFamily::Lasso, Box::new(LassoRegression::new(1.0))),
            (
                ModelFamily::RandomForest,
                Box::new(RandomForest::new(ForestConfig {
                    min_samples_split: 2,
                    seed: self.seed,
                    ..ForestConfig::default()
                })),
            ),
            (
                ModelFamily::GradientBoosting,
                Box::new(GradientBoosting::new(BoostingConfig {
                    seed: self.seed,
                    ..BoostingConfig::default()
                })),
            ),
        ]
    }

    /// Row indices of the (train, test) split
    pub fn split_indices(&self, n: usize) -> (Vec<usize>, Vec<usize>) {
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut ChaCha8Rng::seed_from_u64(self.seed));

        let test_size = (n as f64 * TEST_FRACTION).ceil() as usize;
        let train = order.split_off(test_size.min(n));
        (train, order)
    }

    pub fn compare(&self, table: &FeatureTable, symbol: &str) -> Result<ModelComparison> {
        let n = table.len();
        let (train_idx, test_idx) = self.split_indices(n);
        if train_idx.is_empty() || test_idx.is_empty() {
            return Err(ForecastError::InsufficientData(format!(
                "Model comparison for {} needs at least 2 feature rows, got {}",
                symbol, n
            )));
        }

        let x = table.features()?;
        let y = table.target_vector();
        let (x_train, y_train) = select(&x, &y, &train_idx);
        let (x_test, y_test) = select(&x, &y, &test_idx);

        let scaler = StandardScaler::fit(&x_train)?;
        let x_train = scaler.transform(&x_train)?;
        let x_test = scaler.transform(&x_test)?;
        let actuals = y_test.to_vec();

        let mut results = Vec::new();
        for (family, mut model) in self.candidates() {
            model.fit(&x_train, &y_train)?;
            let predictions = model.predict(&x_test)?.to_vec();
            let metrics = evaluate(&actuals, &predictions)?;

            info!(
                "{} comparison, {}: rmse={:.4} r2={:.4}",
                symbol, family, metrics.rmse, metrics.r2
            );
            results.push(ModelResult {
                name: family.name().to_string(),
                family,
                metrics,
            });
        }

        // Stable sort keeps declaration order on ties; NaN scores sink
        results.sort_by(|a, b| rank_key(b).total_cmp(&rank_key(a)));
        let best_model = results
            .first()
            .map(|r| r.name.clone())
            .unwrap_or_default();

        Ok(ModelComparison {
            symbol: symbol.to_string(),
            results,
            best_model,
        })
    }
}

fn rank_key(result: &ModelResult) -> f64 {
    if result.metrics.r2.is_nan() {
        f64::NEG_INFINITY
    } else {
        result.metrics.r2
    }
}

fn select(x: &Array2<f64>, y: &Array1<f64>, rows: &[usize]) -> (Array2<f64>, Array1<f64>) {
    (x.select(Axis(0), rows), y.select(Axis(0), rows))
}

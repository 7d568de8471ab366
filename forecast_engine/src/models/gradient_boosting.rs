//! Gradient-boosted regression trees with squared loss

use super::decision_tree::{DecisionTree, TreeConfig};
use super::{check_training_shape, normalize, Regressor};
use crate::error::{ForecastError, Result};
use ndarray::{Array1, Array2};
use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Boosting hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostingConfig {
    /// Number of boosting iterations (trees)
    pub n_estimators: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Learning rate (shrinkage)
    pub learning_rate: f64,
    /// Minimum samples required to split a node
    pub min_samples_split: usize,
    /// Minimum samples required in a leaf node
    pub min_samples_leaf: usize,
    /// Fraction of rows drawn (without replacement) for each tree
    pub subsample: f64,
    /// Random seed
    pub seed: u64,
}

impl Default for BoostingConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 5,
            learning_rate: 0.1,
            min_samples_split: 2,
            min_samples_leaf: 1,
            subsample: 1.0,
            seed: 42,
        }
    }
}

impl BoostingConfig {
    /// Deeper, slower-learning ensemble used for the long horizons
    pub fn horizon() -> Self {
        Self {
            n_estimators: 150,
            max_depth: 8,
            learning_rate: 0.05,
            ..Self::default()
        }
    }
}

/// Gradient boosting regressor.
///
/// Starts from the training mean and fits each tree to the current residuals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoosting {
    config: BoostingConfig,
    init: Option<f64>,
    trees: Vec<DecisionTree>,
    feature_importances: Vec<f64>,
}

impl GradientBoosting {
    pub fn new(config: BoostingConfig) -> Self {
        Self {
            config,
            init: None,
            trees: Vec::new(),
            feature_importances: Vec::new(),
        }
    }

    pub fn config(&self) -> &BoostingConfig {
        &self.config
    }

    fn validate_config(&self) -> Result<()> {
        if self.config.n_estimators == 0 {
            return Err(ForecastError::InvalidParameter(
                "boosting needs at least one estimator".to_string(),
            ));
        }
        if self.config.learning_rate.is_nan() || self.config.learning_rate <= 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "learning rate must be positive, got {}",
                self.config.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.config.subsample) || self.config.subsample == 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "subsample must be in (0, 1], got {}",
                self.config.subsample
            )));
        }
        Ok(())
    }
}

impl Regressor for GradientBoosting {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_training_shape(x, y)?;
        self.validate_config()?;

        let n_samples = x.nrows();
        let init = y.sum() / n_samples as f64;
        let mut current = Array1::from_elem(n_samples, init);
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let sample_size = ((n_samples as f64 * self.config.subsample).round() as usize).max(1);

        let mut trees = Vec::with_capacity(self.config.n_estimators);
        let mut importances = vec![0.0; x.ncols()];

        for stage in 0..self.config.n_estimators {
            // Negative gradient of squared loss
            let residuals = y - &current;

            let mut samples = if sample_size < n_samples {
                index::sample(&mut rng, n_samples, sample_size).into_vec()
            } else {
                (0..n_samples).collect()
            };

            let mut tree = DecisionTree::new(TreeConfig {
                max_depth: self.config.max_depth,
                min_samples_split: self.config.min_samples_split,
                min_samples_leaf: self.config.min_samples_leaf,
                max_features: None,
                seed: self.config.seed.wrapping_add(stage as u64),
            });
            tree.fit_samples(x, &residuals, &mut samples)?;

            let update = tree.predict(x)?;
            current.scaled_add(self.config.learning_rate, &update);

            if let Some(tree_importances) = tree.feature_importances() {
                for (total, &imp) in importances.iter_mut().zip(tree_importances) {
                    *total += imp;
                }
            }
            trees.push(tree);
        }
        normalize(&mut importances);

        self.init = Some(init);
        self.trees = trees;
        self.feature_importances = importances;
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let init = self.init.ok_or(ForecastError::NotFitted)?;

        let mut prediction = Array1::from_elem(x.nrows(), init);
        for tree in &self.trees {
            prediction.scaled_add(self.config.learning_rate, &tree.predict(x)?);
        }
        Ok(prediction)
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        self.init.map(|_| self.feature_importances.as_slice())
    }
}

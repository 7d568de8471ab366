//! Random Forest (bagged regression trees)

use super::decision_tree::{DecisionTree, TreeConfig};
use super::{check_training_shape, normalize, Regressor};
use crate::error::{ForecastError, Result};
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Random Forest configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees in the forest
    pub n_trees: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Features considered per split (None = all)
    pub max_features: Option<usize>,
    /// Bootstrap sampling
    pub bootstrap: bool,
    /// Random seed
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 5,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

/// Random Forest model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
    feature_importances: Vec<f64>,
}

impl RandomForest {
    /// Create a new random forest
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            feature_importances: Vec::new(),
        }
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Number of fitted trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Rows drawn with replacement for tree `i`
    fn bootstrap_sample(&self, n_samples: usize, tree: usize) -> Vec<usize> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed.wrapping_add(tree as u64));
        (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
    }
}

impl Regressor for RandomForest {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_training_shape(x, y)?;
        if self.config.n_trees == 0 {
            return Err(ForecastError::InvalidParameter(
                "forest needs at least one tree".to_string(),
            ));
        }

        let n_samples = x.nrows();

        // Each tree derives its own seed, so the result does not depend on
        // how rayon schedules the work
        let trees = (0..self.config.n_trees)
            .into_par_iter()
            .map(|i| {
                let mut tree = DecisionTree::new(TreeConfig {
                    max_depth: self.config.max_depth,
                    min_samples_split: self.config.min_samples_split,
                    min_samples_leaf: self.config.min_samples_leaf,
                    max_features: self.config.max_features,
                    seed: self.config.seed.wrapping_add(i as u64),
                });

                let mut samples = if self.config.bootstrap {
                    self.bootstrap_sample(n_samples, i)
                } else {
                    (0..n_samples).collect()
                };
                tree.fit_samples(x, y, &mut samples)?;
                Ok(tree)
            })
            .collect::<Result<Vec<DecisionTree>>>()?;

        let mut importances = vec![0.0; x.ncols()];
        for tree in &trees {
            if let Some(tree_importances) = tree.feature_importances() {
                for (total, &imp) in importances.iter_mut().zip(tree_importances) {
                    *total += imp;
                }
            }
        }
        normalize(&mut importances);

        self.trees = trees;
        self.feature_importances = importances;
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(ForecastError::NotFitted);
        }

        let mut total = Array1::<f64>::zeros(x.nrows());
        for tree in &self.trees {
            total += &tree.predict(x)?;
        }
        Ok(total / self.trees.len() as f64)
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        if self.trees.is_empty() {
            None
        } else {
            Some(&self.feature_importances)
        }
    }
}

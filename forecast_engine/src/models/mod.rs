//! Regression models behind a common interface
//!
//! Every model fits on a standardised feature matrix and predicts one value
//! per row. Tree-based models also report normalised feature importances.

use crate::error::{ForecastError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

pub mod decision_tree;
pub mod gradient_boosting;
pub mod linear;
pub mod random_forest;

pub use decision_tree::{DecisionTree, TreeConfig};
pub use gradient_boosting::{BoostingConfig, GradientBoosting};
pub use linear::{LassoRegression, LinearRegression, RidgeRegression};
pub use random_forest::{ForestConfig, RandomForest};

/// Common interface for regression models
pub trait Regressor: Debug + Send + Sync {
    /// Fit the model to `x` (rows are samples) and targets `y`
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Predict one value per row of `x`
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    /// Normalised importance per feature column, if the model has a notion of it
    fn feature_importances(&self) -> Option<&[f64]> {
        None
    }
}

/// Regression model families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFamily {
    LinearRegression,
    Ridge,
    Lasso,
    RandomForest,
    GradientBoosting,
}

impl ModelFamily {
    /// Display name used in reports
    pub fn name(self) -> &'static str {
        match self {
            ModelFamily::LinearRegression => "Linear Regression",
            ModelFamily::Ridge => "Ridge Regression",
            ModelFamily::Lasso => "Lasso Regression",
            ModelFamily::RandomForest => "Random Forest",
            ModelFamily::GradientBoosting => "Gradient Boosting",
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Model trained for a forecast horizon, with its hyperparameters
pub fn horizon_model(family: ModelFamily, seed: u64) -> Box<dyn Regressor> {
    match family {
        ModelFamily::RandomForest => Box::new(RandomForest::new(ForestConfig {
            seed,
            ..ForestConfig::default()
        })),
        ModelFamily::GradientBoosting => Box::new(GradientBoosting::new(BoostingConfig {
            seed,
            ..BoostingConfig::horizon()
        })),
        ModelFamily::LinearRegression => Box::new(LinearRegression::new()),
        ModelFamily::Ridge => Box::new(RidgeRegression::new(1.0)),
        ModelFamily::Lasso => Box::new(LassoRegression::new(1.0)),
    }
}

/// Check that `x` and `y` describe the same non-empty set of samples
pub(crate) fn check_training_shape(x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: x.nrows(),
            got: y.len(),
        });
    }
    if x.nrows() == 0 {
        return Err(ForecastError::ModelError(
            "cannot fit on zero samples".to_string(),
        ));
    }
    Ok(())
}

/// Scale `importances` to sum to one, leaving an all-zero vector alone
pub(crate) fn normalize(importances: &mut [f64]) {
    let total: f64 = importances.iter().sum();
    if total > 0.0 {
        for value in importances.iter_mut() {
            *value /= total;
        }
    }
}

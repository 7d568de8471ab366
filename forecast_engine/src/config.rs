//! Runtime knobs for the engine

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Seed and split settings shared by training and comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seed for every randomised model and the comparison split
    pub seed: u64,
    /// Fraction of feature rows used for training in the chronological split
    pub train_ratio: f64,
    /// Number of ranked features kept in training reports
    pub top_features: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            train_ratio: 0.8,
            top_features: 10,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the training fraction, which must lie strictly between 0 and 1
    pub fn with_train_ratio(mut self, train_ratio: f64) -> Result<Self> {
        if !(train_ratio > 0.0 && train_ratio < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "train ratio must be in (0, 1), got {}",
                train_ratio
            )));
        }
        self.train_ratio = train_ratio;
        Ok(self)
    }

    pub fn with_top_features(mut self, top_features: usize) -> Self {
        self.top_features = top_features;
        self
    }
}

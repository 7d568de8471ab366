//! Per-column standardisation

use crate::error::{ForecastError, Result};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Z-score scaler fitted on a training matrix.
///
/// Uses the population standard deviation; constant columns get a scale of 1
/// so they map to zero instead of dividing by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Learn column means and scales from `x`
    pub fn fit(x: &Array2<f64>) -> Result<Self> {
        let mean = x.mean_axis(Axis(0)).ok_or_else(|| {
            ForecastError::InvalidParameter("cannot fit a scaler on zero rows".to_string())
        })?;
        let std = x.std_axis(Axis(0), 0.0);

        Ok(Self {
            mean: mean.to_vec(),
            scale: std
                .iter()
                .map(|&s| if s == 0.0 { 1.0 } else { s })
                .collect(),
        })
    }

    /// Standardise every row of `x`
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_width(x.ncols())?;

        let mean = Array1::from_vec(self.mean.clone());
        let scale = Array1::from_vec(self.scale.clone());
        Ok((x - &mean) / &scale)
    }

    /// Standardise a single row
    pub fn transform_row(&self, row: ArrayView1<f64>) -> Result<Array1<f64>> {
        self.check_width(row.len())?;

        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&v, (&m, &s))| (v - m) / s)
            .collect())
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn check_width(&self, got: usize) -> Result<()> {
        if got != self.mean.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.mean.len(),
                got,
            });
        }
        Ok(())
    }
}

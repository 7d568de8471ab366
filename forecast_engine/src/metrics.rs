//! Metrics for evaluating forecast performance

use crate::error::{ForecastError, Result};
use serde::Serialize;
use statrs::statistics::Statistics;

/// Regression metrics on a held-out slice
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationMetrics {
    /// Root mean squared error
    pub rmse: f64,
    /// Mean absolute error
    pub mae: f64,
    /// Coefficient of determination
    pub r2: f64,
    /// Mean absolute percentage error, in percent
    pub mape: f64,
}

impl EvaluationMetrics {
    /// All-zero metrics, reported when no model could be trained
    pub fn zero() -> Self {
        Self {
            rmse: 0.0,
            mae: 0.0,
            r2: 0.0,
            mape: 0.0,
        }
    }
}

/// Evaluate predictions against actual values
pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Result<EvaluationMetrics> {
    check_lengths(actual, predicted)?;

    Ok(EvaluationMetrics {
        rmse: root_mean_squared_error(actual, predicted),
        mae: mean_absolute_error(actual, predicted),
        r2: r2_score(actual, predicted),
        mape: mean_absolute_percentage_error(actual, predicted),
    })
}

fn check_lengths(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Err(ForecastError::InvalidParameter(
            "cannot evaluate an empty prediction set".to_string(),
        ));
    }
    Ok(())
}

/// Mean absolute error
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .mean()
}

/// Mean squared error
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .mean()
}

/// Root mean squared error
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    mean_squared_error(actual, predicted).sqrt()
}

/// Mean of `|err / actual|` in percent; a zero actual propagates inf or NaN
pub fn mean_absolute_percentage_error(actual: &[f64], predicted: &[f64]) -> f64 {
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| ((a - p) / a).abs())
        .mean()
        * 100.0
}

/// R² score. A constant `actual` scores 1 for a perfect fit and 0 otherwise.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    let mean = actual.iter().mean();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// Population standard deviation of `actual - predicted`
pub fn residual_std(actual: &[f64], predicted: &[f64]) -> f64 {
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| a - p)
        .population_std_dev()
}

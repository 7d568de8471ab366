//! Linear regression models
//!
//! Ordinary least squares, ridge (L2) and lasso (L1). All three fit an
//! unpenalised intercept by centring the data first.

use super::{check_training_shape, Regressor};
use crate::error::{ForecastError, Result};
use ndarray::{Array1, Array2, Axis};

/// Diagonal jitter tried first when the normal equations are singular
const BASE_JITTER: f64 = 1e-10;
/// Jitter escalation steps before giving up
const MAX_JITTER_STEPS: usize = 12;

/// Fitted coefficients shared by the linear models
#[derive(Debug, Clone, PartialEq)]
struct LinearFit {
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LinearFit {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.coefficients.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: x.ncols(),
            });
        }
        Ok(x.dot(&self.coefficients) + self.intercept)
    }
}

/// Centred copies of `x` and `y` plus the means removed
fn center(x: &Array2<f64>, y: &Array1<f64>) -> Result<(Array2<f64>, Array1<f64>, Array1<f64>, f64)> {
    let x_mean = x
        .mean_axis(Axis(0))
        .ok_or_else(|| ForecastError::ModelError("cannot center zero rows".to_string()))?;
    let y_mean = y
        .mean()
        .ok_or_else(|| ForecastError::ModelError("cannot center zero targets".to_string()))?;

    Ok((x - &x_mean, y - y_mean, x_mean, y_mean))
}

/// Solve `(XᵀX + alpha·I) w = Xᵀy` on centred data.
///
/// A singular system (collinear features with `alpha == 0`) is retried with
/// a growing diagonal jitter, which approaches the minimum-norm solution.
fn solve_normal_equations(x: &Array2<f64>, y: &Array1<f64>, alpha: f64) -> Result<Array1<f64>> {
    let xtx = x.t().dot(x);
    let xty = x.t().dot(y);
    let p = xtx.nrows();

    let scale = (xtx.diag().sum() / p.max(1) as f64).max(1.0);
    let mut jitter = 0.0;

    for step in 0..=MAX_JITTER_STEPS {
        let mut system = xtx.clone();
        for i in 0..p {
            system[[i, i]] += alpha + jitter;
        }

        if let Some(beta) = cholesky_solve(&system, &xty) {
            return Ok(beta);
        }

        jitter = BASE_JITTER * scale * 10f64.powi(step as i32);
    }

    Err(ForecastError::ModelError(
        "normal equations are singular".to_string(),
    ))
}

/// Solve `a · x = b` for symmetric positive definite `a`
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    // A = L * L^T
    for i in 0..n {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum();

            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 || !diag.is_finite() {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // L * z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[[i, j]] * z[j]).sum();
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    // L^T * x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let sum: f64 = ((i + 1)..n).map(|j| l[[j, i]] * x[j]).sum();
        x[i] = (z[i] - sum) / l[[i, i]];
    }

    Some(x)
}

/// Ordinary least squares
#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    fit: Option<LinearFit>,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fitted coefficients, one per feature
    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        self.fit.as_ref().map(|f| &f.coefficients)
    }

    pub fn intercept(&self) -> Option<f64> {
        self.fit.as_ref().map(|f| f.intercept)
    }
}

impl Regressor for LinearRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_training_shape(x, y)?;
        let (xc, yc, x_mean, y_mean) = center(x, y)?;

        let coefficients = solve_normal_equations(&xc, &yc, 0.0)?;
        let intercept = y_mean - x_mean.dot(&coefficients);
        self.fit = Some(LinearFit {
            coefficients,
            intercept,
        });
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.fit.as_ref().ok_or(ForecastError::NotFitted)?.predict(x)
    }
}

/// Ridge regression (L2 penalty on the coefficients)
#[derive(Debug, Clone)]
pub struct RidgeRegression {
    alpha: f64,
    fit: Option<LinearFit>,
}

impl RidgeRegression {
    /// Create a ridge model with regularisation strength `alpha`
    pub fn new(alpha: f64) -> Self {
        Self { alpha, fit: None }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        self.fit.as_ref().map(|f| &f.coefficients)
    }
}

impl Regressor for RidgeRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_training_shape(x, y)?;
        if self.alpha.is_nan() || self.alpha < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Invalid alpha value: {}",
                self.alpha
            )));
        }

        let (xc, yc, x_mean, y_mean) = center(x, y)?;
        let coefficients = solve_normal_equations(&xc, &yc, self.alpha)?;
        let intercept = y_mean - x_mean.dot(&coefficients);
        self.fit = Some(LinearFit {
            coefficients,
            intercept,
        });
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.fit.as_ref().ok_or(ForecastError::NotFitted)?.predict(x)
    }
}

/// Lasso regression fitted by cyclic coordinate descent.
///
/// Minimises `1/(2n)·‖y − Xw‖² + alpha·‖w‖₁`.
#[derive(Debug, Clone)]
pub struct LassoRegression {
    alpha: f64,
    max_iter: usize,
    tolerance: f64,
    fit: Option<LinearFit>,
}

impl LassoRegression {
    /// Create a lasso model with regularisation strength `alpha`
    pub fn new(alpha: f64) -> Self {
        Self::with_solver(alpha, 1000, 1e-4)
    }

    pub fn with_solver(alpha: f64, max_iter: usize, tolerance: f64) -> Self {
        Self {
            alpha,
            max_iter,
            tolerance,
            fit: None,
        }
    }

    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        self.fit.as_ref().map(|f| &f.coefficients)
    }

    /// Number of coefficients not shrunk to zero
    pub fn n_nonzero(&self) -> usize {
        self.coefficients()
            .map(|c| c.iter().filter(|&&v| v.abs() > 1e-10).count())
            .unwrap_or(0)
    }

    fn soft_threshold(x: f64, lambda: f64) -> f64 {
        if x > lambda {
            x - lambda
        } else if x < -lambda {
            x + lambda
        } else {
            0.0
        }
    }
}

impl Regressor for LassoRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_training_shape(x, y)?;
        if self.alpha.is_nan() || self.alpha < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Invalid alpha value: {}",
                self.alpha
            )));
        }

        let (xc, yc, x_mean, y_mean) = center(x, y)?;
        let n_features = xc.ncols();
        let threshold = self.alpha * xc.nrows() as f64;

        let column_norms: Vec<f64> = xc
            .columns()
            .into_iter()
            .map(|col| col.dot(&col))
            .collect();

        let mut coef = Array1::<f64>::zeros(n_features);
        // Residual of the current coefficients, kept in sync per update
        let mut residual = yc;

        for _ in 0..self.max_iter {
            let mut max_change: f64 = 0.0;

            for j in 0..n_features {
                if column_norms[j] <= 1e-12 {
                    continue;
                }

                let column = xc.column(j);
                let old = coef[j];
                let rho = column.dot(&residual) + old * column_norms[j];
                let new = Self::soft_threshold(rho, threshold) / column_norms[j];

                if new != old {
                    residual.scaled_add(old - new, &column);
                    coef[j] = new;
                    max_change = max_change.max((new - old).abs());
                }
            }

            if max_change < self.tolerance {
                break;
            }
        }

        let intercept = y_mean - x_mean.dot(&coef);
        self.fit = Some(LinearFit {
            coefficients: coef,
            intercept,
        });
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.fit.as_ref().ok_or(ForecastError::NotFitted)?.predict(x)
    }
}

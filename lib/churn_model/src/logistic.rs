//! Binary logistic regression with an L2 penalty.
//!
//! Fitting is delegated to `linfa-logistic`, which minimizes the summed
//! log-loss plus `alpha * ||w||² / 2` with L-BFGS. Setting `alpha = 1 / C`
//! gives the usual inverse-regularization `C`; the intercept is not
//! penalized. Only the fitted weights and intercept are kept, so a saved
//! model scores rows without linfa.

use linfa::prelude::*;
use linfa_logistic::LogisticRegression as LinfaLogistic;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::backend::{BackendError, ModelBackend};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogisticRegression {
    coefficients: Option<Vec<f64>>,
    intercept: f64,
    /// Inverse regularization strength
    c: f64,
    max_iter: usize,
    /// Bound on the max-abs gradient of the mean loss
    tol: f64,
    converged: bool,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: 0.0,
            c: 1.0,
            max_iter: 1000,
            tol: 1e-4,
            converged: false,
        }
    }

    /// A fitted model from known parameters.
    pub fn from_parts(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients: Some(coefficients),
            intercept,
            converged: true,
            ..Self::new()
        }
    }

    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    pub fn decision_function(&self, row: &[f64]) -> Result<f64, BackendError> {
        let w = self.coefficients.as_ref().ok_or(BackendError::NotFitted)?;
        if row.len() != w.len() {
            return Err(BackendError::InvalidInput(format!(
                "row has {} features, model expects {}",
                row.len(),
                w.len()
            )));
        }
        if let Some(pos) = row.iter().position(|v| !v.is_finite()) {
            return Err(BackendError::InvalidInput(format!(
                "feature {pos} is not a finite number"
            )));
        }
        Ok(dot(w, row) + self.intercept)
    }

    pub fn fit(&mut self, x: &[Vec<f64>], y: &[u8]) -> Result<(), BackendError> {
        let n = x.len();
        if n == 0 {
            return Err(BackendError::FitError("cannot fit with zero samples".into()));
        }
        if n != y.len() {
            return Err(BackendError::FitError(format!(
                "{n} rows but {} labels",
                y.len()
            )));
        }
        if !(self.c > 0.0) || self.max_iter == 0 {
            return Err(BackendError::FitError(format!(
                "invalid hyper-parameters: C={} max_iter={}",
                self.c, self.max_iter
            )));
        }
        let d = x[0].len();
        for (i, row) in x.iter().enumerate() {
            if row.len() != d {
                return Err(BackendError::FitError(format!(
                    "row {i} has {} features, expected {d}",
                    row.len()
                )));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(BackendError::FitError(format!("row {i} has a non-finite value")));
            }
        }
        if let Some(bad) = y.iter().find(|&&l| l > 1) {
            return Err(BackendError::FitError(format!(
                "labels must be 0 or 1, found {bad}"
            )));
        }

        let records = Array2::from_shape_vec((n, d), x.iter().flatten().copied().collect())
            .map_err(|e| BackendError::FitError(e.to_string()))?;
        let targets = Array1::from_iter(y.iter().copied());
        let dataset = Dataset::new(records, targets);

        // the larger label (1 = churn) is linfa's positive class
        let fitted = LinfaLogistic::default()
            .alpha(1.0 / self.c)
            .max_iterations(self.max_iter as u64)
            .gradient_tolerance(self.tol)
            .fit(&dataset)
            .map_err(|e| BackendError::FitError(e.to_string()))?;

        let weights = fitted.params().clone();
        let intercept = fitted.intercept();
        let gmax = mean_gradient_max_abs(dataset.records(), y, &weights, intercept, 1.0 / self.c);
        self.converged = gmax <= self.tol;
        if !self.converged {
            log::warn!(
                "logistic regression stopped before converging (|g|max = {gmax:.3e}, tol = {:.1e})",
                self.tol
            );
        } else {
            log::debug!("logistic regression converged (|g|max = {gmax:.3e})");
        }
        self.intercept = intercept;
        self.coefficients = Some(weights.to_vec());
        Ok(())
    }
}

impl ModelBackend for LogisticRegression {
    fn predict_proba(&self, row: &[f64]) -> Result<f64, BackendError> {
        Ok(sigmoid(self.decision_function(row)?))
    }

    fn n_features(&self) -> usize {
        self.coefficients.as_ref().map(Vec::len).unwrap_or(0)
    }

    fn backend_name(&self) -> &str {
        "logistic_regression"
    }

    fn coefficients(&self) -> Result<&[f64], BackendError> {
        self.coefficients
            .as_deref()
            .ok_or(BackendError::NotFitted)
    }
}

pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Largest absolute component of the gradient of the mean penalized loss,
/// intercept included.
fn mean_gradient_max_abs(
    x: &Array2<f64>,
    y: &[u8],
    weights: &Array1<f64>,
    intercept: f64,
    alpha: f64,
) -> f64 {
    let n = x.nrows() as f64;
    let labels = Array1::from_iter(y.iter().map(|&l| f64::from(l)));
    let residual = (x.dot(weights) + intercept).mapv(sigmoid) - labels;
    let grad_w = (x.t().dot(&residual) + weights * alpha) / n;
    let grad_b = residual.sum() / n;
    grad_w
        .iter()
        .fold(grad_b.abs(), |m, g| m.max(g.abs()))
}

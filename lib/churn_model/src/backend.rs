//! Pluggable classifier trait and error types for churn inference

use thiserror::Error;

/// Probability at or above which a customer is labelled as churning.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Errors that can occur during backend operations
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Model is not fitted")]
    NotFitted,
    #[error("Backend '{0}' does not expose linear coefficients")]
    NotLinear(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Fitting failed: {0}")]
    FitError(String),
}

/// Binary classifier over an already-encoded feature row.
///
/// Implementations only have to produce the positive-class probability;
/// the label is derived from it with [`DECISION_THRESHOLD`].
pub trait ModelBackend: Send + Sync {
    /// Probability of churn for one encoded row
    fn predict_proba(&self, row: &[f64]) -> Result<f64, BackendError>;

    /// Churn label (1) or no-churn label (0) for one encoded row
    fn predict(&self, row: &[f64]) -> Result<u8, BackendError> {
        Ok(label_for(self.predict_proba(row)?))
    }

    fn predict_proba_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, BackendError> {
        rows.iter().map(|r| self.predict_proba(r)).collect()
    }

    /// Number of features the backend expects per row
    fn n_features(&self) -> usize;

    /// Get backend name/identifier
    fn backend_name(&self) -> &str;

    /// Per-feature linear weights, for backends that have them
    fn coefficients(&self) -> Result<&[f64], BackendError> {
        Err(BackendError::NotLinear(self.backend_name().to_string()))
    }
}

pub fn label_for(probability: f64) -> u8 {
    u8::from(probability >= DECISION_THRESHOLD)
}

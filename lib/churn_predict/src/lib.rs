//! Single-customer churn inference.
//!
//! A [`CustomerForm`] is validated, encoded against the artifact's own
//! encoder tables and feature order, scored by the model backend and
//! annotated with the rule-based [`ChurnReason`] overlay.

pub mod cache;
pub mod encoding;
pub mod explain;
pub mod form;
pub mod predictor;

pub use cache::ArtifactCache;
pub use encoding::{encode_form, fixed_binary_code, AlignedRow, EncodingSource};
pub use explain::{describe, explain, ChurnReason, STABLE_SUMMARY};
pub use form::{CustomerForm, FormError};
pub use predictor::{ChurnLabel, PredictConfig, PredictError, PredictionResult, Predictor};

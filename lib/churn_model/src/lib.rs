//! Churn classifier, model artifact and evaluation.
//!
//! The [`ModelBackend`] trait is the seam between the trainer/predictor and a
//! concrete classifier; [`LogisticRegression`] is the backend the trainer
//! fits. A fitted model travels between processes inside a [`ModelArtifact`]
//! together with its ordered feature names and encoder tables.

pub mod artifact;
pub mod backend;
pub mod feature_importance;
pub mod logistic;
pub mod metadata;
pub mod metrics;
pub mod trainer;

pub use artifact::{ArtifactError, ModelArtifact};
pub use backend::{label_for, BackendError, ModelBackend, DECISION_THRESHOLD};
pub use feature_importance::{rank_by_coefficients, render_bars, FeatureImportance};
pub use logistic::{sigmoid, LogisticRegression};
pub use metadata::{ModelKind, ModelMetadata};
pub use metrics::{
    AverageScores, ClassScores, ClassificationReport, Confusion, RocAuc, ValidationMetric,
};
pub use trainer::{fit_from_dataset, train, TrainConfig, TrainError, TrainingOutcome};

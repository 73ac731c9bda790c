//! Descriptive metadata stored alongside a trained model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Model family identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    LogisticRegression,
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelKind::LogisticRegression => write!(f, "logistic_regression"),
        }
    }
}

/// How and when a model artifact was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelMetadata {
    /// Model name
    pub name: String,
    /// Model family
    pub model_kind: ModelKind,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Rows used for fitting
    pub train_rows: usize,
    /// Rows held out for evaluation
    pub test_rows: usize,
    /// Seed of the train/test shuffle
    pub random_seed: u64,
    /// Held-out fraction
    pub test_size: f64,
    /// Additional free-form labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl ModelMetadata {
    pub fn new(name: impl Into<String>, model_kind: ModelKind) -> Self {
        Self {
            name: name.into(),
            model_kind,
            created_at: chrono::Utc::now().to_rfc3339(),
            train_rows: 0,
            test_rows: 0,
            random_seed: 0,
            test_size: 0.0,
            tags: BTreeMap::new(),
        }
    }

    pub fn with_split(
        mut self,
        train_rows: usize,
        test_rows: usize,
        test_size: f64,
        seed: u64,
    ) -> Self {
        self.train_rows = train_rows;
        self.test_rows = test_rows;
        self.test_size = test_size;
        self.random_seed = seed;
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

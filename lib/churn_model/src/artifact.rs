//! The trained-model artifact: one JSON document written by the trainer and
//! read by every predictor.
//!
//! It carries the fitted weights, the exact ordered feature list the weights
//! refer to, and the per-column encoder tables used at fit time. There is no
//! format version; [`ModelArtifact::load`] accepts only the shape written by
//! [`ModelArtifact::save`].

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use churn_data::CategoricalEncoder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::ModelBackend;
use crate::logistic::LogisticRegression;
use crate::metadata::ModelMetadata;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("model artifact not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed model artifact: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to persist model artifact: {0}")]
    Persist(#[from] tempfile::PersistError),
    #[error("inconsistent model artifact: {0}")]
    Inconsistent(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelArtifact {
    pub metadata: ModelMetadata,
    /// Training column order; the single source of truth at inference
    pub feature_names: Vec<String>,
    pub encoder: CategoricalEncoder,
    pub model: LogisticRegression,
}

impl ModelArtifact {
    pub fn new(
        metadata: ModelMetadata,
        feature_names: Vec<String>,
        encoder: CategoricalEncoder,
        model: LogisticRegression,
    ) -> Result<Self, ArtifactError> {
        let artifact = Self {
            metadata,
            feature_names,
            encoder,
            model,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn backend(&self) -> &dyn ModelBackend {
        &self.model
    }

    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.feature_names.iter().position(|f| f == name)
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        if !self.model.is_fitted() {
            return Err(ArtifactError::Inconsistent("model is not fitted".into()));
        }
        if self.model.n_features() != self.feature_names.len() {
            return Err(ArtifactError::Inconsistent(format!(
                "{} feature names but {} coefficients",
                self.feature_names.len(),
                self.model.n_features()
            )));
        }
        let mut seen = HashSet::new();
        for name in &self.feature_names {
            if !seen.insert(name.as_str()) {
                return Err(ArtifactError::Inconsistent(format!(
                    "duplicate feature '{name}'"
                )));
            }
        }
        for (column, _) in self.encoder.columns() {
            if !seen.contains(column) {
                return Err(ArtifactError::Inconsistent(format!(
                    "encoder table for '{column}' which is not a feature"
                )));
            }
        }
        Ok(())
    }

    /// Write the artifact through a temporary file in the target directory so
    /// a failed write never leaves a truncated artifact behind.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|source| ArtifactError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        let io_err = |source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(io_err)?;
        serde_json::to_writer_pretty(&mut tmp, self)?;
        tmp.write_all(b"\n").map_err(io_err)?;
        tmp.flush().map_err(io_err)?;
        tmp.persist(path)?;
        log::info!("model artifact written to {}", path.display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ArtifactError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let artifact: Self = serde_json::from_str(&text)?;
        artifact.validate()?;
        log::debug!(
            "loaded artifact '{}' with {} features from {}",
            artifact.metadata.name,
            artifact.feature_names.len(),
            path.display()
        );
        Ok(artifact)
    }
}

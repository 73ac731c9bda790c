//! `churn.toml`: every key optional, command-line flags win.

use std::path::{Path, PathBuf};

use churn_model::TrainConfig;
use churn_predict::PredictConfig;
use churn_viz::InsightConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "churn.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingSection {
    pub model_name: String,
    pub test_size: f64,
    pub seed: u64,
    pub max_iter: usize,
    pub c: f64,
    pub tol: f64,
}

impl Default for TrainingSection {
    fn default() -> Self {
        let d = TrainConfig::default();
        Self {
            model_name: d.model_name,
            test_size: d.test_size,
            seed: d.seed,
            max_iter: d.max_iter,
            c: d.c,
            tol: d.tol,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChurnConfig {
    pub dataset: PathBuf,
    pub artifact: PathBuf,
    pub training: TrainingSection,
    pub predict: PredictConfig,
    pub insights: InsightConfig,
}

impl Default for ChurnConfig {
    fn default() -> Self {
        let d = TrainConfig::default();
        Self {
            dataset: d.dataset,
            artifact: d.artifact,
            training: TrainingSection::default(),
            predict: PredictConfig::default(),
            insights: InsightConfig::default(),
        }
    }
}

impl ChurnConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// An explicit path must exist. Without one, `./churn.toml` is read
    /// when present and defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(p) if !p.exists() => return Err(ConfigError::NotFound(p.to_path_buf())),
            Some(p) => p.to_path_buf(),
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !p.exists() {
                    log::debug!("no {DEFAULT_CONFIG_FILE}; using defaults");
                    return Ok(Self::default());
                }
                p
            }
        };
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!("configuration read from {}", path.display());
        Ok(config)
    }

    pub fn train_config(&self) -> TrainConfig {
        TrainConfig {
            dataset: self.dataset.clone(),
            artifact: self.artifact.clone(),
            model_name: self.training.model_name.clone(),
            test_size: self.training.test_size,
            seed: self.training.seed,
            max_iter: self.training.max_iter,
            c: self.training.c,
            tol: self.training.tol,
        }
    }
}

//! Offline training pipeline: load → clean → encode → split → fit → evaluate → persist.

use std::path::PathBuf;

use churn_data::{
    load_clean, prepare_training_frame, train_test_split, CleaningReport, DataError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::artifact::{ArtifactError, ModelArtifact};
use crate::backend::{label_for, BackendError, ModelBackend};
use crate::logistic::LogisticRegression;
use crate::metadata::{ModelKind, ModelMetadata};
use crate::metrics::{ClassificationReport, RocAuc, ValidationMetric};

#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub dataset: PathBuf,
    pub artifact: PathBuf,
    pub model_name: String,
    pub test_size: f64,
    pub seed: u64,
    pub max_iter: usize,
    pub c: f64,
    pub tol: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("Telco-Customer-Churn.csv"),
            artifact: PathBuf::from("churn_model.json"),
            model_name: "telco-churn".to_string(),
            test_size: 0.2,
            seed: 42,
            max_iter: 1000,
            c: 1.0,
            tol: 1e-4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub artifact: ModelArtifact,
    pub cleaning: CleaningReport,
    pub report: ClassificationReport,
    pub roc_auc: f64,
}

/// Run the pipeline without writing anything to disk.
pub fn fit_from_dataset(config: &TrainConfig) -> Result<TrainingOutcome, TrainError> {
    let (data, cleaning) = load_clean(&config.dataset)?;
    let (matrix, encoder) = prepare_training_frame(&data)?;
    let split = train_test_split(matrix.n_samples(), config.test_size, config.seed)?;
    let (x_train, y_train) = matrix.select(&split.train);
    let (x_test, y_test) = matrix.select(&split.test);

    log::info!(
        "fitting logistic regression on {} rows x {} features",
        x_train.len(),
        matrix.n_features()
    );
    let mut model = LogisticRegression::new()
        .with_c(config.c)
        .with_max_iter(config.max_iter)
        .with_tolerance(config.tol);
    model.fit(&x_train, &y_train)?;
    log::info!("fit finished (converged: {})", model.converged());

    let probs = model.predict_proba_batch(&x_test)?;
    let y_pred: Vec<u8> = probs.iter().map(|&p| label_for(p)).collect();
    let report = ClassificationReport::new(&y_test, &y_pred);
    let truth: Vec<bool> = y_test.iter().map(|&y| y == 1).collect();
    let roc_auc = RocAuc.compute(&probs, &truth);

    let metadata = ModelMetadata::new(config.model_name.clone(), ModelKind::LogisticRegression)
        .with_split(split.train.len(), split.test.len(), config.test_size, config.seed)
        .with_tag("dataset", config.dataset.display().to_string());
    let artifact = ModelArtifact::new(metadata, matrix.feature_names, encoder, model)?;

    Ok(TrainingOutcome {
        artifact,
        cleaning,
        report,
        roc_auc,
    })
}

/// Run the pipeline and persist the artifact to `config.artifact`.
///
/// A missing dataset fails before anything is written.
pub fn train(config: &TrainConfig) -> Result<TrainingOutcome, TrainError> {
    let outcome = fit_from_dataset(config)?;
    outcome.artifact.save(&config.artifact)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    fn write_dataset(dir: &std::path::Path) -> PathBuf {
        let mut csv = String::from(concat!(
            "customerID,gender,SeniorCitizen,Partner,tenure,",
            "Contract,MonthlyCharges,TotalCharges,Churn\n",
        ));
        for i in 0..120u32 {
            let tenure = (i * 7) % 72;
            let monthly = 20.0 + ((i * 13) % 100) as f64;
            let contract = ["Month-to-month", "One year", "Two year"][(i % 3) as usize];
            let churn = if tenure < 20 && contract == "Month-to-month" || monthly > 110.0 {
                "Yes"
            } else {
                "No"
            };
            let total = if i == 5 {
                " ".to_string()
            } else {
                format!("{:.2}", monthly * tenure as f64)
            };
            let gender = if i % 2 == 0 { "Male" } else { "Female" };
            let partner = if i % 5 == 0 { "Yes" } else { "No" };
            writeln!(
                csv,
                "C{i:04},{gender},{},{partner},{tenure},{contract},{monthly:.2},{total},{churn}",
                i % 4 / 3
            )
            .unwrap();
        }
        let path = dir.join("telco.csv");
        std::fs::write(&path, csv).unwrap();
        path
    }

    #[test]
    fn train_writes_artifact_with_training_order() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainConfig {
            dataset: write_dataset(dir.path()),
            artifact: dir.path().join("model.json"),
            ..TrainConfig::default()
        };
        let outcome = train(&config).unwrap();
        assert_eq!(outcome.cleaning.dropped_unparseable_total_charges, 1);
        assert_eq!(
            outcome.artifact.feature_names,
            vec![
                "gender",
                "SeniorCitizen",
                "Partner",
                "tenure",
                "Contract",
                "MonthlyCharges",
                "TotalCharges"
            ]
        );
        assert_eq!(outcome.artifact.metadata.train_rows, 95);
        assert_eq!(outcome.artifact.metadata.test_rows, 24);
        let loaded = ModelArtifact::load(&config.artifact).unwrap();
        assert_eq!(loaded.feature_names, outcome.artifact.feature_names);
        assert_eq!(outcome.report.macro_avg.support, 24);
    }

    #[test]
    fn missing_dataset_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainConfig {
            dataset: dir.path().join("absent.csv"),
            artifact: dir.path().join("model.json"),
            ..TrainConfig::default()
        };
        let err = train(&config).unwrap_err();
        assert!(matches!(err, TrainError::Data(DataError::DatasetNotFound(_))));
        assert!(!config.artifact.exists());
    }

    #[test]
    fn fixed_seed_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainConfig {
            dataset: write_dataset(dir.path()),
            ..TrainConfig::default()
        };
        let a = fit_from_dataset(&config).unwrap();
        let b = fit_from_dataset(&config).unwrap();
        assert_eq!(a.artifact.feature_names, b.artifact.feature_names);
        assert_eq!(a.artifact.model, b.artifact.model);
        assert_eq!(a.report, b.report);
    }
}

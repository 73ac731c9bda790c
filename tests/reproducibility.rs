//! A fixed seed pins the split, so two runs over the same file produce the
//! same model and the same evaluation.

use churn_model::{fit_from_dataset, train, ModelArtifact, TrainConfig};
use churn_tests::telco_csv;
use pretty_assertions::assert_eq;

fn config(dir: &std::path::Path, seed: u64) -> TrainConfig {
    TrainConfig {
        dataset: telco_csv(500, 5).write_to(dir),
        artifact: dir.join(format!("model-{seed}.json")),
        seed,
        ..TrainConfig::default()
    }
}

#[test]
fn same_seed_same_model_and_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let a = fit_from_dataset(&config(dir.path(), 42)).unwrap();
    let b = fit_from_dataset(&config(dir.path(), 42)).unwrap();
    assert_eq!(a.artifact.feature_names, b.artifact.feature_names);
    assert_eq!(a.artifact.encoder, b.artifact.encoder);
    assert_eq!(a.artifact.model, b.artifact.model);
    assert_eq!(a.report, b.report);
    assert_eq!(a.roc_auc, b.roc_auc);
}

#[test]
fn seed_changes_the_split_only() {
    let dir = tempfile::tempdir().unwrap();
    let a = fit_from_dataset(&config(dir.path(), 1)).unwrap();
    let b = fit_from_dataset(&config(dir.path(), 2)).unwrap();
    assert_eq!(a.artifact.feature_names, b.artifact.feature_names);
    assert_eq!(a.artifact.metadata.test_rows, b.artifact.metadata.test_rows);
    assert_ne!(a.artifact.model, b.artifact.model);
}

#[test]
fn saved_artifact_reloads_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), 42);
    let outcome = train(&cfg).unwrap();
    let loaded = ModelArtifact::load(&cfg.artifact).unwrap();
    assert_eq!(loaded, outcome.artifact);
    assert_eq!(loaded.metadata.random_seed, 42);
    assert_eq!(
        loaded.metadata.train_rows + loaded.metadata.test_rows,
        outcome.cleaning.rows_kept
    );
}

//! Process-wide, load-once handle on the model artifact.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use churn_model::{ArtifactError, ModelArtifact};
use parking_lot::Mutex;

/// Lazily loads the artifact on first use and hands out shared references
/// afterwards. The loaded artifact is immutable for the life of the cache.
/// A failed load is not remembered; the next call retries.
pub struct ArtifactCache {
    path: PathBuf,
    cell: OnceLock<Arc<ModelArtifact>>,
    init: Mutex<()>,
}

impl ArtifactCache {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            cell: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Result<Arc<ModelArtifact>, ArtifactError> {
        if let Some(artifact) = self.cell.get() {
            return Ok(Arc::clone(artifact));
        }
        let _guard = self.init.lock();
        // another caller may have loaded it while we waited for the guard
        if let Some(artifact) = self.cell.get() {
            return Ok(Arc::clone(artifact));
        }
        let artifact = Arc::new(ModelArtifact::load(&self.path)?);
        log::info!("model artifact cached from {}", self.path.display());
        Ok(Arc::clone(self.cell.get_or_init(|| artifact)))
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use churn_data::CategoricalEncoder;
    use churn_model::{LogisticRegression, ModelKind, ModelMetadata};

    fn write_artifact(path: &Path, intercept: f64) {
        ModelArtifact::new(
            ModelMetadata::new("cache", ModelKind::LogisticRegression),
            vec!["tenure".into()],
            CategoricalEncoder::new(),
            LogisticRegression::from_parts(vec![-0.1], intercept),
        )
        .unwrap()
        .save(path)
        .unwrap();
    }

    #[test]
    fn loads_once_and_shares() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.json");
        write_artifact(&path, 0.5);
        let cache = ArtifactCache::new(&path);
        assert!(!cache.is_loaded());
        let a = cache.get().unwrap();
        // retraining on disk is not picked up by a live cache
        write_artifact(&path, 1.5);
        let b = cache.get().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(b.model.intercept(), 0.5);
    }

    #[test]
    fn failures_are_retried() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.json");
        let cache = ArtifactCache::new(&path);
        assert!(matches!(cache.get(), Err(ArtifactError::NotFound(_))));
        assert!(!cache.is_loaded());
        write_artifact(&path, 0.0);
        assert!(cache.get().is_ok());
        assert!(cache.is_loaded());
    }

    #[test]
    fn concurrent_first_use_loads_one_copy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.json");
        write_artifact(&path, 0.0);
        let cache = Arc::new(ArtifactCache::new(&path));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get().unwrap())
            })
            .collect();
        let loaded: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for a in &loaded[1..] {
            assert!(Arc::ptr_eq(&loaded[0], a));
        }
    }
}

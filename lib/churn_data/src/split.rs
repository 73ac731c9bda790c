use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::DataError;

/// Row indices of a train/test partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n_samples` with a seeded RNG and cut off `ceil(n * test_size)`
/// rows for the test set. The same seed always yields the same partition.
pub fn train_test_split(
    n_samples: usize,
    test_size: f64,
    seed: u64,
) -> Result<SplitIndices, DataError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(DataError::InvalidSplit(format!(
            "test_size must be in (0, 1), got {test_size}"
        )));
    }
    let n_test = (n_samples as f64 * test_size).ceil() as usize;
    if n_test == 0 || n_test >= n_samples {
        return Err(DataError::InvalidSplit(format!(
            "{n_samples} samples cannot be split with test_size {test_size}"
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    log::debug!(
        "split {n_samples} rows into {} train / {} test (seed {seed})",
        train.len(),
        indices.len()
    );
    Ok(SplitIndices {
        train,
        test: indices,
    })
}

//! Stratified train/test partitioning.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{info, instrument};

use crate::error::SampleError;
use crate::resampled::class_counts;

/// Stratified split configuration.
///
/// Construct via [`StratifiedSplit::new`], then chain `with_seed` if desired.
#[derive(Debug, Clone)]
pub struct StratifiedSplit {
    train_fraction: f64,
    seed: u64,
}

/// Row indices of the two partitions, each sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    /// Rows assigned to training.
    pub train: Vec<usize>,
    /// Rows held out for testing.
    pub test: Vec<usize>,
}

impl StratifiedSplit {
    /// Create a split that sends `train_fraction` of each class to training.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::InvalidTrainFraction`] unless `0 < train_fraction < 1`.
    pub fn new(train_fraction: f64) -> Result<Self, SampleError> {
        if !(train_fraction > 0.0 && train_fraction < 1.0) {
            return Err(SampleError::InvalidTrainFraction {
                fraction: train_fraction,
            });
        }
        Ok(Self {
            train_fraction,
            seed: 42,
        })
    }

    /// Set the random seed for within-class shuffling.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Return the train fraction.
    #[must_use]
    pub fn train_fraction(&self) -> f64 {
        self.train_fraction
    }

    /// Number of rows of a class with `n` members that go to training.
    fn n_train(&self, n: usize) -> usize {
        // Subtract a hair so 0.7 * 10 stays 7 despite binary rounding.
        let raw = (n as f64 * self.train_fraction - 1e-9).ceil();
        (raw.max(0.0) as usize).min(n)
    }

    /// Partition row indices by label.
    ///
    /// Groups rows by class, shuffles within each class, and sends the first
    /// `ceil(train_fraction * n_class)` of each class to training.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SampleError::EmptyDataset`] | Zero labels |
    /// | [`SampleError::EmptyPartition`] | Train or test ends up empty |
    #[instrument(skip_all, fields(n_samples = labels.len(), train_fraction = self.train_fraction))]
    pub fn split(&self, labels: &[usize]) -> Result<SplitIndices, SampleError> {
        if labels.is_empty() {
            return Err(SampleError::EmptyDataset);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);

        let counts = class_counts(labels);
        let mut class_indices: Vec<Vec<usize>> = counts
            .iter()
            .map(|&c| Vec::with_capacity(c))
            .collect();
        for (i, &label) in labels.iter().enumerate() {
            class_indices[label].push(i);
        }

        let mut train = Vec::new();
        let mut test = Vec::new();
        for indices in &mut class_indices {
            indices.shuffle(&mut rng);
            let cut = self.n_train(indices.len());
            train.extend_from_slice(&indices[..cut]);
            test.extend_from_slice(&indices[cut..]);
        }
        train.sort_unstable();
        test.sort_unstable();

        if train.is_empty() {
            return Err(SampleError::EmptyPartition { partition: "train" });
        }
        if test.is_empty() {
            return Err(SampleError::EmptyPartition { partition: "test" });
        }

        info!(n_train = train.len(), n_test = test.len(), "stratified split");
        Ok(SplitIndices { train, test })
    }
}

//! Random undersampling of the larger classes.

use rand::SeedableRng;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, instrument};

use crate::error::SampleError;
use crate::resampled::{Origin, Resampled, class_counts, present_classes, validate};

/// Downsamples every class to the size of the smallest one.
///
/// Rows are drawn without replacement; kept rows stay in their original order.
///
/// # Defaults
///
/// | Parameter | Default |
/// |---|---|
/// | `seed` | 42 |
#[derive(Debug, Clone)]
pub struct Undersampler {
    seed: u64,
}

impl Default for Undersampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Undersampler {
    /// Create an undersampler with the default seed.
    #[must_use]
    pub fn new() -> Self {
        Self { seed: 42 }
    }

    /// Set the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Return the seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Select which row indices survive, sorted ascending.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SampleError::EmptyDataset`] | Zero labels |
    /// | [`SampleError::SingleClass`] | Only one class present |
    pub fn select(&self, labels: &[usize]) -> Result<Vec<usize>, SampleError> {
        if labels.is_empty() {
            return Err(SampleError::EmptyDataset);
        }
        let counts = class_counts(labels);
        let classes = present_classes(&counts)?;
        let target = classes.iter().map(|&c| counts[c]).min().unwrap_or(0);

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut keep = Vec::with_capacity(target * classes.len());
        for &class in &classes {
            let members: Vec<usize> = labels
                .iter()
                .enumerate()
                .filter(|&(_, &l)| l == class)
                .map(|(i, _)| i)
                .collect();
            if members.len() == target {
                keep.extend_from_slice(&members);
            } else {
                debug!(class, from = members.len(), to = target, "downsampling class");
                keep.extend(index::sample(&mut rng, members.len(), target).into_iter().map(|j| members[j]));
            }
        }
        keep.sort_unstable();
        Ok(keep)
    }

    /// Build the balanced training set.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SampleError::EmptyDataset`] | Zero rows |
    /// | [`SampleError::LengthMismatch`] | Label count differs from row count |
    /// | [`SampleError::FeatureCountMismatch`] | Ragged rows |
    /// | [`SampleError::NonFiniteValue`] | NaN or infinite feature |
    /// | [`SampleError::SingleClass`] | Only one class present |
    #[instrument(skip_all, fields(n_samples = features.len(), seed = self.seed))]
    pub fn resample(&self, features: &[Vec<f64>], labels: &[usize]) -> Result<Resampled, SampleError> {
        validate(features, labels)?;
        let keep = self.select(labels)?;

        let resampled = Resampled {
            features: keep.iter().map(|&i| features[i].clone()).collect(),
            labels: keep.iter().map(|&i| labels[i]).collect(),
            origins: keep.iter().map(|&i| Origin::Original(i)).collect(),
        };
        info!(
            n_before = labels.len(),
            n_after = resampled.n_samples(),
            "undersampled training set"
        );
        Ok(resampled)
    }
}

//! Synthetic minority oversampling (SMOTE).
//!
//! Each synthetic row lies on the segment between a minority row and one of
//! its `k` nearest minority neighbors (Euclidean distance). Features should
//! be standardized first so no single column dominates the distance.

use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::error::SampleError;
use crate::resampled::{Origin, Resampled, class_counts, present_classes, validate};

/// Largest accepted over ratio.
pub const MAX_OVER_RATIO: f64 = 100.0;

/// SMOTE configuration.
///
/// Construct via [`Smote::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter | Default |
/// |---|---|
/// | `k_neighbors` | 5 |
/// | `over_ratio` | 1.0 (minority grows to the majority count) |
/// | `seed` | 42 |
#[derive(Debug, Clone)]
pub struct Smote {
    k_neighbors: usize,
    over_ratio: f64,
    seed: u64,
}

impl Default for Smote {
    fn default() -> Self {
        Self {
            k_neighbors: 5,
            over_ratio: 1.0,
            seed: 42,
        }
    }
}

impl Smote {
    /// Create a SMOTE sampler that interpolates toward `k_neighbors` neighbors.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::InvalidNeighborCount`] if `k_neighbors == 0`.
    pub fn new(k_neighbors: usize) -> Result<Self, SampleError> {
        if k_neighbors == 0 {
            return Err(SampleError::InvalidNeighborCount { k: k_neighbors });
        }
        Ok(Self {
            k_neighbors,
            ..Self::default()
        })
    }

    /// Set the target minority size as a multiple of the majority count.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::InvalidOverRatio`] unless `0 < ratio <= MAX_OVER_RATIO`.
    pub fn with_over_ratio(mut self, ratio: f64) -> Result<Self, SampleError> {
        if !(ratio > 0.0 && ratio <= MAX_OVER_RATIO) {
            return Err(SampleError::InvalidOverRatio { ratio });
        }
        self.over_ratio = ratio;
        Ok(self)
    }

    /// Set the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Return the configured neighbor count.
    #[must_use]
    pub fn k_neighbors(&self) -> usize {
        self.k_neighbors
    }

    /// Return the over ratio.
    #[must_use]
    pub fn over_ratio(&self) -> f64 {
        self.over_ratio
    }

    /// Return the seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Grow the smallest class with interpolated rows.
    ///
    /// The output lists every input row unchanged (in input order) followed by
    /// the synthetic rows. Other classes are never altered.
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
    /// | [`SampleError::TooFewMinority`] | Minority class has fewer than 2 rows |
    #[instrument(skip_all, fields(n_samples = features.len(), k = self.k_neighbors, over_ratio = self.over_ratio))]
    pub fn resample(&self, features: &[Vec<f64>], labels: &[usize]) -> Result<Resampled, SampleError> {
        let n_features = validate(features, labels)?;
        let counts = class_counts(labels);
        let classes = present_classes(&counts)?;

        // Ties resolve to the lowest label for the majority, highest for the minority.
        let majority = classes
            .iter()
            .copied()
            .max_by(|&a, &b| counts[a].cmp(&counts[b]).then(b.cmp(&a)))
            .unwrap_or(0);
        let minority = classes
            .iter()
            .copied()
            .min_by(|&a, &b| counts[a].cmp(&counts[b]).then(b.cmp(&a)))
            .unwrap_or(0);
        let n_min = counts[minority];

        let mut out = Resampled {
            features: features.to_vec(),
            labels: labels.to_vec(),
            origins: (0..labels.len()).map(Origin::Original).collect(),
        };

        let target = (self.over_ratio * counts[majority] as f64).round() as usize;
        let n_new = target.saturating_sub(n_min);
        if n_new == 0 {
            info!(minority, n_min, target, "minority already at target; nothing to synthesize");
            return Ok(out);
        }
        if n_min < 2 {
            return Err(SampleError::TooFewMinority {
                class: minority,
                count: n_min,
            });
        }

        let k = self.k_neighbors.min(n_min - 1);
        if k < self.k_neighbors {
            warn!(requested = self.k_neighbors, used = k, "k_neighbors clamped to minority size - 1");
        }

        let members: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l == minority)
            .map(|(i, _)| i)
            .collect();
        let neighbors = nearest_neighbors(features, &members, k);
        debug!(n_min, k, "neighbor lists built");

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let allocation = allocate(n_new, n_min, &mut rng);

        out.features.reserve(n_new);
        out.labels.reserve(n_new);
        out.origins.reserve(n_new);
        for (pos, &n_make) in allocation.iter().enumerate() {
            let base = members[pos];
            for _ in 0..n_make {
                let neighbor = members[neighbors[pos][rng.gen_range(0..k)]];
                let gap: f64 = rng.r#gen();
                let row: Vec<f64> = (0..n_features)
                    .map(|f| {
                        let a = features[base][f];
                        a + gap * (features[neighbor][f] - a)
                    })
                    .collect();
                out.features.push(row);
                out.labels.push(minority);
                out.origins.push(Origin::Synthetic { base, neighbor });
            }
        }

        info!(
            minority,
            majority,
            n_min,
            n_majority = counts[majority],
            n_synthetic = n_new,
            "SMOTE oversampling complete"
        );
        Ok(out)
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// For each member, positions (into `members`) of its `k` nearest other members.
///
/// Ties in distance break toward the lower position, so the result is
/// independent of thread scheduling.
fn nearest_neighbors(features: &[Vec<f64>], members: &[usize], k: usize) -> Vec<Vec<usize>> {
    members
        .par_iter()
        .enumerate()
        .map(|(pos, &row)| {
            let mut dists: Vec<(f64, usize)> = members
                .iter()
                .enumerate()
                .filter(|&(other, _)| other != pos)
                .map(|(other, &o)| (squared_distance(&features[row], &features[o]), other))
                .collect();
            dists.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            dists.truncate(k);
            dists.into_iter().map(|(_, other)| other).collect()
        })
        .collect()
}

/// Spread `n_new` synthetic rows evenly over `n_min` bases; the remainder
/// goes to distinct, randomly chosen bases.
fn allocate(n_new: usize, n_min: usize, rng: &mut ChaCha8Rng) -> Vec<usize> {
    let mut allocation = vec![n_new / n_min; n_min];
    let remainder = n_new % n_min;
    if remainder > 0 {
        for pos in index::sample(rng, n_min, remainder) {
            allocation[pos] += 1;
        }
    }
    allocation
}

//! Derived training sets and row provenance.

use crate::error::SampleError;

/// Where a resampled row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A copy of the training row at this index.
    Original(usize),
    /// Interpolated between training row `base` and its neighbor `neighbor`.
    Synthetic {
        /// Index of the minority row the sample was grown from.
        base: usize,
        /// Index of the nearest-neighbor row it was interpolated toward.
        neighbor: usize,
    },
}

/// A training set derived from the original training rows.
///
/// `features[i]`, `labels[i]`, and `origins[i]` describe the same row.
#[derive(Debug, Clone)]
pub struct Resampled {
    /// Feature matrix (row-major).
    pub features: Vec<Vec<f64>>,
    /// Class labels.
    pub labels: Vec<usize>,
    /// Provenance of each row.
    pub origins: Vec<Origin>,
}

impl Resampled {
    /// Return the number of rows.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.labels.len()
    }

    /// Return the number of synthetic rows.
    #[must_use]
    pub fn n_synthetic(&self) -> usize {
        self.origins
            .iter()
            .filter(|o| matches!(o, Origin::Synthetic { .. }))
            .count()
    }

    /// Return per-class row counts, indexed by label.
    #[must_use]
    pub fn class_counts(&self) -> Vec<usize> {
        class_counts(&self.labels)
    }
}

/// Count rows per class; the result has `max(label) + 1` entries.
#[must_use]
pub fn class_counts(labels: &[usize]) -> Vec<usize> {
    let n_classes = labels.iter().max().map_or(0, |&m| m + 1);
    let mut counts = vec![0usize; n_classes];
    for &label in labels {
        counts[label] += 1;
    }
    counts
}

/// Validate a feature matrix against its labels; returns the feature count.
pub(crate) fn validate(features: &[Vec<f64>], labels: &[usize]) -> Result<usize, SampleError> {
    if features.is_empty() {
        return Err(SampleError::EmptyDataset);
    }
    if labels.len() != features.len() {
        return Err(SampleError::LengthMismatch {
            expected: features.len(),
            got: labels.len(),
        });
    }
    let n_features = features[0].len();
    for (sample_index, row) in features.iter().enumerate() {
        if row.len() != n_features {
            return Err(SampleError::FeatureCountMismatch {
                expected: n_features,
                got: row.len(),
                sample_index,
            });
        }
        if let Some(feature_index) = row.iter().position(|v| !v.is_finite()) {
            return Err(SampleError::NonFiniteValue {
                sample_index,
                feature_index,
            });
        }
    }
    Ok(n_features)
}

/// Return the classes with at least one row, or `SingleClass` if fewer than two.
pub(crate) fn present_classes(counts: &[usize]) -> Result<Vec<usize>, SampleError> {
    let present: Vec<usize> = counts
        .iter()
        .enumerate()
        .filter(|&(_, &c)| c > 0)
        .map(|(class, _)| class)
        .collect();
    match present.as_slice() {
        [] => Err(SampleError::EmptyDataset),
        [only] => Err(SampleError::SingleClass { class: *only }),
        _ => Ok(present),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_label() {
        assert_eq!(class_counts(&[0, 1, 1, 0, 0]), vec![3, 2]);
        assert_eq!(class_counts(&[]), Vec::<usize>::new());
        assert_eq!(class_counts(&[2]), vec![0, 0, 1]);
    }

    #[test]
    fn validate_rejects_ragged_rows() {
        let err = validate(&[vec![1.0, 2.0], vec![1.0]], &[0, 1]).unwrap_err();
        assert!(matches!(
            err,
            SampleError::FeatureCountMismatch {
                sample_index: 1,
                ..
            }
        ));
    }

    #[test]
    fn validate_rejects_nan() {
        let err = validate(&[vec![1.0, f64::NAN]], &[0]).unwrap_err();
        assert!(matches!(
            err,
            SampleError::NonFiniteValue {
                sample_index: 0,
                feature_index: 1
            }
        ));
    }

    #[test]
    fn present_classes_needs_two() {
        assert!(matches!(
            present_classes(&[0, 4]),
            Err(SampleError::SingleClass { class: 1 })
        ));
        assert_eq!(present_classes(&[3, 0, 2]).unwrap(), vec![0, 2]);
    }

    #[test]
    fn synthetic_count() {
        let r = Resampled {
            features: vec![vec![0.0]; 3],
            labels: vec![0, 1, 1],
            origins: vec![
                Origin::Original(0),
                Origin::Original(1),
                Origin::Synthetic { base: 1, neighbor: 2 },
            ],
        };
        assert_eq!(r.n_samples(), 3);
        assert_eq!(r.n_synthetic(), 1);
        assert_eq!(r.class_counts(), vec![1, 2]);
    }
}

//! Column standardization fitted on training rows.

use tracing::{debug, instrument, warn};

use crate::error::SampleError;

/// Per-column mean and sample standard deviation.
///
/// Fit on training rows only, then apply the same statistics to any other
/// matrix with [`Standardizer::transform`]. Zero-variance columns are
/// centered and left unscaled.
#[derive(Debug, Clone, PartialEq)]
pub struct Standardizer {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl Standardizer {
    /// Compute column statistics from a row-major matrix.
    ///
    /// Uses the sample standard deviation (divides by n - 1); a single row
    /// gives every column a scale of 1.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SampleError::EmptyDataset`] | Zero rows |
    /// | [`SampleError::FeatureCountMismatch`] | Ragged rows |
    /// | [`SampleError::NonFiniteValue`] | NaN or infinite value |
    #[instrument(skip_all, fields(n_samples = rows.len()))]
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self, SampleError> {
        let Some(first) = rows.first() else {
            return Err(SampleError::EmptyDataset);
        };
        let n_features = first.len();
        for (sample_index, row) in rows.iter().enumerate() {
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

        let n = rows.len() as f64;
        let mut means = vec![0.0; n_features];
        for row in rows {
            for (m, &v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut means {
            *m /= n;
        }

        let mut scales = vec![0.0; n_features];
        for row in rows {
            for ((s, &v), &m) in scales.iter_mut().zip(row).zip(&means) {
                *s += (v - m) * (v - m);
            }
        }
        let mut constant = 0usize;
        for s in &mut scales {
            let sd = if rows.len() > 1 { (*s / (n - 1.0)).sqrt() } else { 0.0 };
            *s = if sd > 0.0 {
                sd
            } else {
                constant += 1;
                1.0
            };
        }
        if constant > 0 {
            warn!(constant, "zero-variance columns are centered but not scaled");
        }
        debug!(n_features, "standardizer fitted");

        Ok(Self { means, scales })
    }

    /// Return `(x - mean) / scale` for every cell.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::FeatureCountMismatch`] if a row's width differs
    /// from the fitted column count.
    pub fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, SampleError> {
        rows.iter()
            .enumerate()
            .map(|(sample_index, row)| {
                if row.len() != self.means.len() {
                    return Err(SampleError::FeatureCountMismatch {
                        expected: self.means.len(),
                        got: row.len(),
                        sample_index,
                    });
                }
                Ok(row
                    .iter()
                    .zip(&self.means)
                    .zip(&self.scales)
                    .map(|((&v, &m), &s)| (v - m) / s)
                    .collect())
            })
            .collect()
    }

    /// Return the column means.
    #[must_use]
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Return the column scales (1.0 for zero-variance columns).
    #[must_use]
    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    /// Return the number of fitted columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.means.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn training_columns_become_standard() {
        let rows = vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0], vec![4.0, 40.0]];
        let s = Standardizer::fit(&rows).unwrap();
        let z = s.transform(&rows).unwrap();
        for f in 0..2 {
            let col: Vec<f64> = z.iter().map(|r| r[f]).collect();
            let mean = col.iter().sum::<f64>() / 4.0;
            let var = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 3.0;
            assert!(mean.abs() < 1e-12);
            assert!((var - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn sample_standard_deviation() {
        let s = Standardizer::fit(&[vec![2.0], vec![4.0]]).unwrap();
        assert!((s.means()[0] - 3.0).abs() < 1e-12);
        assert!((s.scales()[0] - 2.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_rows_use_training_statistics() {
        let s = Standardizer::fit(&[vec![0.0], vec![2.0]]).unwrap();
        let z = s.transform(&[vec![100.0]]).unwrap();
        assert!((z[0][0] - (100.0 - 1.0) / 2.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn constant_column_is_centered_only() {
        let s = Standardizer::fit(&[vec![5.0], vec![5.0], vec![5.0]]).unwrap();
        assert_eq!(s.scales(), &[1.0]);
        assert_eq!(s.transform(&[vec![7.0]]).unwrap(), vec![vec![2.0]]);
    }

    #[test]
    fn width_mismatch_on_transform() {
        let s = Standardizer::fit(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert!(matches!(
            s.transform(&[vec![1.0]]),
            Err(SampleError::FeatureCountMismatch { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn empty_input() {
        assert!(matches!(Standardizer::fit(&[]), Err(SampleError::EmptyDataset)));
    }
}

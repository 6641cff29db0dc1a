//! Inverse-frequency class weights.

use tracing::debug;

use crate::error::SampleError;
use crate::resampled::{class_counts, present_classes};

/// Per-class weight `1 / count(class)`, so every present class carries a
/// total mass of one.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassWeights {
    weights: Vec<f64>,
}

impl ClassWeights {
    /// Derive weights from the training labels.
    ///
    /// Absent classes get weight 0.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SampleError::EmptyDataset`] | Zero labels |
    /// | [`SampleError::SingleClass`] | Only one class present |
    pub fn inverse_frequency(labels: &[usize]) -> Result<Self, SampleError> {
        if labels.is_empty() {
            return Err(SampleError::EmptyDataset);
        }
        let counts = class_counts(labels);
        present_classes(&counts)?;
        let weights: Vec<f64> = counts
            .iter()
            .map(|&c| if c == 0 { 0.0 } else { 1.0 / c as f64 })
            .collect();
        debug!(?counts, ?weights, "inverse-frequency class weights");
        Ok(Self { weights })
    }

    /// Weight of a single class (0 for classes never seen).
    #[must_use]
    pub fn weight(&self, class: usize) -> f64 {
        self.weights.get(class).copied().unwrap_or(0.0)
    }

    /// Per-class weights indexed by label.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    /// One weight per row.
    #[must_use]
    pub fn sample_weights(&self, labels: &[usize]) -> Vec<f64> {
        labels.iter().map(|&l| self.weight(l)).collect()
    }

    /// Total weight carried by each class over `labels`.
    #[must_use]
    pub fn class_mass(&self, labels: &[usize]) -> Vec<f64> {
        let mut mass = vec![0.0; self.weights.len()];
        for &l in labels {
            if let Some(m) = mass.get_mut(l) {
                *m += self.weights[l];
            }
        }
        mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toy_weights() {
        let labels = [0, 0, 1, 0, 0, 1, 0, 0, 1, 0];
        let w = ClassWeights::inverse_frequency(&labels).unwrap();
        assert!((w.weight(0) - 1.0 / 7.0).abs() < 1e-15);
        assert!((w.weight(1) - 1.0 / 3.0).abs() < 1e-15);

        let per_row = w.sample_weights(&labels);
        assert!((per_row[0] - 1.0 / 7.0).abs() < 1e-15);
        assert!((per_row[2] - 1.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn every_class_sums_to_one() {
        let labels: Vec<usize> = (0..1000).map(|i| usize::from(i % 13 == 0)).collect();
        let w = ClassWeights::inverse_frequency(&labels).unwrap();
        let mass = w.class_mass(&labels);
        assert!((mass[0] - 1.0).abs() < 1e-9);
        assert!((mass[1] - 1.0).abs() < 1e-9);
        assert!((mass[0] - mass[1]).abs() < 1e-9);
    }

    #[test]
    fn unseen_class_weighs_nothing() {
        let w = ClassWeights::inverse_frequency(&[0, 1]).unwrap();
        assert_eq!(w.weight(5), 0.0);
    }

    #[test]
    fn single_class_error() {
        assert!(matches!(
            ClassWeights::inverse_frequency(&[0, 0]),
            Err(SampleError::SingleClass { class: 0 })
        ));
    }
}

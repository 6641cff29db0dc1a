//! Binary confusion matrix with the enrolled class (1) as positive.

use std::fmt;

use crate::error::LogitError;

/// A 2x2 confusion matrix.
///
/// Counts are taken with label 1 as the positive class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BinaryConfusion {
    /// Predicted 1, truly 1.
    pub tp: usize,
    /// Predicted 1, truly 0.
    pub fp: usize,
    /// Predicted 0, truly 0.
    pub tn: usize,
    /// Predicted 0, truly 1.
    pub fn_: usize,
}

impl BinaryConfusion {
    /// Build a confusion matrix from true and predicted labels.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`LogitError::EmptyDataset`] | Zero labels provided |
    /// | [`LogitError::LengthMismatch`] | `predicted.len() != true_labels.len()` |
    /// | [`LogitError::InvalidLabel`] | A label is not 0 or 1 |
    pub fn from_labels(true_labels: &[usize], predicted: &[usize]) -> Result<Self, LogitError> {
        if true_labels.is_empty() {
            return Err(LogitError::EmptyDataset);
        }
        if predicted.len() != true_labels.len() {
            return Err(LogitError::LengthMismatch {
                what: "predicted labels",
                expected: true_labels.len(),
                got: predicted.len(),
            });
        }
        let mut cm = Self::default();
        for (sample_index, (&t, &p)) in true_labels.iter().zip(predicted).enumerate() {
            match (t, p) {
                (1, 1) => cm.tp += 1,
                (0, 1) => cm.fp += 1,
                (0, 0) => cm.tn += 1,
                (1, 0) => cm.fn_ += 1,
                _ => {
                    return Err(LogitError::InvalidLabel {
                        sample_index,
                        label: t.max(p),
                    });
                }
            }
        }
        Ok(cm)
    }

    /// Total number of samples counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_
    }

    /// Number of truly positive samples.
    #[must_use]
    pub fn actual_positive(&self) -> usize {
        self.tp + self.fn_
    }

    /// Number of truly negative samples.
    #[must_use]
    pub fn actual_negative(&self) -> usize {
        self.tn + self.fp
    }

    /// Number of samples predicted positive.
    #[must_use]
    pub fn predicted_positive(&self) -> usize {
        self.tp + self.fp
    }

    /// Number of samples predicted negative.
    #[must_use]
    pub fn predicted_negative(&self) -> usize {
        self.tn + self.fn_
    }

    /// Rows indexed `[true][predicted]`, matching the multi-class layout.
    #[must_use]
    pub fn as_rows(&self) -> [[usize; 2]; 2] {
        [[self.tn, self.fp], [self.fn_, self.tp]]
    }
}

impl fmt::Display for BinaryConfusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>12}{:>10}", "", "Reference")?;
        writeln!(f, "{:>12}{:>8}{:>8}", "Prediction", "0", "1")?;
        writeln!(f, "{:>12}{:>8}{:>8}", "0", self.tn, self.fn_)?;
        writeln!(f, "{:>12}{:>8}{:>8}", "1", self.fp, self.tp)?;
        Ok(())
    }
}

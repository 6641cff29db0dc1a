//! Fitted logistic model and prediction methods.

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::LogitError;

/// Default probability cut-off for the positive class.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// A fitted binary logistic regression.
///
/// `P(y = 1 | x) = 1 / (1 + exp(-(intercept + coefficients · x)))`.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    pub(crate) intercept: f64,
    pub(crate) coefficients: Vec<f64>,
    pub(crate) feature_names: Vec<String>,
}

/// Probability and thresholded label for one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Estimated probability of the positive class.
    pub probability: f64,
    /// 1 when `probability > threshold`, otherwise 0.
    pub label: usize,
}

impl Prediction {
    /// Apply `threshold` to a probability.
    #[must_use]
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        Self {
            probability,
            label: usize::from(probability > threshold),
        }
    }
}

/// Numerically stable logistic function.
pub(crate) fn sigmoid(eta: f64) -> f64 {
    if eta >= 0.0 {
        1.0 / (1.0 + (-eta).exp())
    } else {
        let e = eta.exp();
        e / (1.0 + e)
    }
}

/// Validate a classification threshold.
pub(crate) fn check_threshold(threshold: f64) -> Result<(), LogitError> {
    if threshold.is_finite() && threshold > 0.0 && threshold < 1.0 {
        Ok(())
    } else {
        Err(LogitError::InvalidThreshold { threshold })
    }
}

impl LogisticModel {
    /// Linear predictor `intercept + coefficients · sample` without length checks.
    pub(crate) fn linear_predictor(&self, sample: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(sample)
                .map(|(b, x)| b * x)
                .sum::<f64>()
    }

    /// Return the positive-class probability for a single sample.
    ///
    /// # Errors
    ///
    /// Returns [`LogitError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict_proba(&self, sample: &[f64]) -> Result<f64, LogitError> {
        if sample.len() != self.coefficients.len() {
            return Err(LogitError::PredictionFeatureMismatch {
                expected: self.coefficients.len(),
                got: sample.len(),
            });
        }
        Ok(sigmoid(self.linear_predictor(sample)))
    }

    /// Predict probability and label for a single sample.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`LogitError::InvalidThreshold`] | `threshold` outside (0, 1) |
    /// | [`LogitError::PredictionFeatureMismatch`] | wrong feature count |
    pub fn predict(&self, sample: &[f64], threshold: f64) -> Result<Prediction, LogitError> {
        check_threshold(threshold)?;
        let p = self.predict_proba(sample)?;
        Ok(Prediction::from_probability(p, threshold))
    }

    /// Predict a batch of samples in parallel, preserving input order.
    ///
    /// # Errors
    ///
    /// Same as [`LogisticModel::predict`], for the first offending sample.
    pub fn predict_batch(
        &self,
        features: &[Vec<f64>],
        threshold: f64,
    ) -> Result<Vec<Prediction>, LogitError> {
        check_threshold(threshold)?;
        features
            .into_par_iter()
            .map(|sample| {
                let p = self.predict_proba(sample)?;
                Ok(Prediction::from_probability(p, threshold))
            })
            .collect()
    }

    /// Return the intercept.
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Return the coefficients, one per feature column.
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Return the feature names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Return the number of features this model was fitted on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Return `(name, coefficient)` pairs ordered by descending absolute value.
    #[must_use]
    pub fn ranked_coefficients(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .feature_names
            .iter()
            .map(String::as_str)
            .zip(self.coefficients.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
        ranked
    }
}

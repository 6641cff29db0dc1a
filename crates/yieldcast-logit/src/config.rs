//! Configuration builder for logistic regression fitting.

use crate::error::LogitError;
use crate::result::FitResult;

/// Configuration for fitting a binary logistic regression by IRLS.
///
/// Construct via [`LogisticConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter  | Default |
/// |------------|---------|
/// | `max_iter` | 25      |
/// | `tol`      | 1e-8    |
/// | `l2`       | 1e-8    |
#[derive(Debug, Clone)]
pub struct LogisticConfig {
    pub(crate) max_iter: usize,
    pub(crate) tol: f64,
    pub(crate) l2: f64,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            max_iter: 25,
            tol: 1e-8,
            l2: 1e-8,
        }
    }
}

impl LogisticConfig {
    /// Create a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Setters ---

    /// Set the maximum number of IRLS iterations.
    ///
    /// # Errors
    ///
    /// Returns [`LogitError::InvalidMaxIter`] if `max_iter` is zero.
    pub fn with_max_iter(mut self, max_iter: usize) -> Result<Self, LogitError> {
        if max_iter == 0 {
            return Err(LogitError::InvalidMaxIter { max_iter });
        }
        self.max_iter = max_iter;
        Ok(self)
    }

    /// Set the relative deviance tolerance used to declare convergence.
    ///
    /// # Errors
    ///
    /// Returns [`LogitError::InvalidTolerance`] unless `tol` is positive and finite.
    pub fn with_tol(mut self, tol: f64) -> Result<Self, LogitError> {
        if !tol.is_finite() || tol <= 0.0 {
            return Err(LogitError::InvalidTolerance { tol });
        }
        self.tol = tol;
        Ok(self)
    }

    /// Set the ridge penalty added to the coefficient diagonal (intercept excluded).
    ///
    /// # Errors
    ///
    /// Returns [`LogitError::InvalidPenalty`] if `l2` is negative or non-finite.
    pub fn with_l2(mut self, l2: f64) -> Result<Self, LogitError> {
        if !l2.is_finite() || l2 < 0.0 {
            return Err(LogitError::InvalidPenalty { l2 });
        }
        self.l2 = l2;
        Ok(self)
    }

    // --- Getters ---

    /// Return the maximum number of IRLS iterations.
    #[must_use]
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Return the convergence tolerance.
    #[must_use]
    pub fn tol(&self) -> f64 {
        self.tol
    }

    /// Return the ridge penalty.
    #[must_use]
    pub fn l2(&self) -> f64 {
        self.l2
    }

    /// Fit an unweighted logistic regression.
    ///
    /// `features[sample_idx][feature_idx]`: row-major layout.
    /// `labels[sample_idx]`: 0 or 1, where 1 is the positive class.
    /// `feature_names`: names for each feature column.
    ///
    /// # Errors
    ///
    /// See [`LogisticConfig::fit_weighted`].
    pub fn fit(
        &self,
        features: &[Vec<f64>],
        labels: &[usize],
        feature_names: &[String],
    ) -> Result<FitResult, LogitError> {
        crate::irls::train(self, features, labels, None, feature_names)
    }

    /// Fit a logistic regression with one non-negative weight per sample.
    ///
    /// # Errors
    ///
    /// | Variant                               | When                                        |
    /// |---------------------------------------|---------------------------------------------|
    /// | [`LogitError::EmptyDataset`]          | `features` is empty                         |
    /// | [`LogitError::LengthMismatch`]        | labels, weights, or names are mis-sized     |
    /// | [`LogitError::FeatureCountMismatch`]  | rows have inconsistent lengths              |
    /// | [`LogitError::NonFiniteValue`]        | any feature value is NaN or infinite        |
    /// | [`LogitError::InvalidLabel`]          | a label is not 0 or 1                       |
    /// | [`LogitError::InvalidWeight`]         | a weight is negative or non-finite          |
    /// | [`LogitError::ZeroTotalWeight`]       | all weights are zero                        |
    /// | [`LogitError::SingleClass`]           | only one class carries positive weight      |
    /// | [`LogitError::SingularSystem`]        | the normal equations cannot be solved       |
    pub fn fit_weighted(
        &self,
        features: &[Vec<f64>],
        labels: &[usize],
        weights: &[f64],
        feature_names: &[String],
    ) -> Result<FitResult, LogitError> {
        crate::irls::train(self, features, labels, Some(weights), feature_names)
    }
}

//! Fit result types for logistic regression.

use crate::model::LogisticModel;

/// Diagnostics about the IRLS run.
#[derive(Debug, Clone)]
pub struct FitDiagnostics {
    /// Number of IRLS iterations performed.
    pub iterations: usize,
    /// Whether the relative deviance change fell below `tol`.
    pub converged: bool,
    /// Residual deviance of the fitted model (weighted).
    pub deviance: f64,
    /// Deviance of the intercept-only model (weighted).
    pub null_deviance: f64,
    /// Number of training samples.
    pub n_samples: usize,
    /// Sum of observation weights.
    pub total_weight: f64,
    /// Whether every observation weight was exactly 1.
    pub unit_weights: bool,
}

/// Result of logistic regression fitting.
#[derive(Debug)]
pub struct FitResult {
    model: LogisticModel,
    diagnostics: FitDiagnostics,
}

impl FitResult {
    pub(crate) fn new(model: LogisticModel, diagnostics: FitDiagnostics) -> Self {
        Self { model, diagnostics }
    }

    /// Borrow the fitted model.
    #[must_use]
    pub fn model(&self) -> &LogisticModel {
        &self.model
    }

    /// Consume the result and return the fitted model.
    #[must_use]
    pub fn into_model(self) -> LogisticModel {
        self.model
    }

    /// Return the IRLS diagnostics.
    #[must_use]
    pub fn diagnostics(&self) -> &FitDiagnostics {
        &self.diagnostics
    }

    /// Akaike information criterion: `deviance + 2 * (n_features + 1)`.
    ///
    /// `None` for a weighted fit, whose deviance is on the scale of the
    /// weights rather than a likelihood over `n_samples` observations.
    #[must_use]
    pub fn aic(&self) -> Option<f64> {
        self.diagnostics
            .unit_weights
            .then(|| self.diagnostics.deviance + 2.0 * (self.model.n_features() + 1) as f64)
    }
}

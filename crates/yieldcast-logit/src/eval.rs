//! Hold-out evaluation of a fitted model.

use tracing::{info, instrument};

use crate::confusion::BinaryConfusion;
use crate::error::LogitError;
use crate::metrics::Metrics;
use crate::model::{LogisticModel, Prediction};

/// Predictions, confusion matrix, and metrics for one evaluation set.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Per-sample predictions, in input order.
    pub predictions: Vec<Prediction>,
    /// Confusion matrix of thresholded predictions against truth.
    pub confusion: BinaryConfusion,
    /// Derived metrics, including ROC AUC.
    pub metrics: Metrics,
    /// Threshold used to label predictions.
    pub threshold: f64,
}

impl Evaluation {
    /// Score precomputed predictions against true labels.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`LogitError::EmptyDataset`] | Zero samples |
    /// | [`LogitError::LengthMismatch`] | Predictions and labels differ in length |
    /// | [`LogitError::InvalidLabel`] | A true label is not 0 or 1 |
    pub fn from_predictions(
        predictions: Vec<Prediction>,
        true_labels: &[usize],
        threshold: f64,
    ) -> Result<Self, LogitError> {
        let predicted: Vec<usize> = predictions.iter().map(|p| p.label).collect();
        let probabilities: Vec<f64> = predictions.iter().map(|p| p.probability).collect();
        let confusion = BinaryConfusion::from_labels(true_labels, &predicted)?;
        let metrics = Metrics::from_confusion(&confusion).with_auc(true_labels, &probabilities);
        Ok(Self {
            predictions,
            confusion,
            metrics,
            threshold,
        })
    }
}

/// Predict every row of `features` and score against `true_labels`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`LogitError::InvalidThreshold`] | `threshold` outside (0, 1) |
/// | [`LogitError::PredictionFeatureMismatch`] | A row has the wrong feature count |
/// | Errors from [`Evaluation::from_predictions`] | |
#[instrument(skip_all, fields(n_samples = features.len(), threshold))]
pub fn evaluate(
    model: &LogisticModel,
    features: &[Vec<f64>],
    true_labels: &[usize],
    threshold: f64,
) -> Result<Evaluation, LogitError> {
    let predictions = model.predict_batch(features, threshold)?;
    let evaluation = Evaluation::from_predictions(predictions, true_labels, threshold)?;
    info!(
        accuracy = evaluation.metrics.accuracy,
        sensitivity = evaluation.metrics.sensitivity,
        specificity = evaluation.metrics.specificity,
        "evaluation complete"
    );
    Ok(evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogisticConfig;

    fn fitted() -> LogisticModel {
        let features: Vec<Vec<f64>> = (0..40).map(|i| vec![i as f64 / 10.0]).collect();
        let labels: Vec<usize> = (0..40)
            .map(|i| usize::from(i >= 25 || i % 9 == 0))
            .collect();
        LogisticConfig::new()
            .fit(&features, &labels, &["x".to_string()])
            .unwrap()
            .into_model()
    }

    #[test]
    fn confusion_total_equals_test_size() {
        let model = fitted();
        let test: Vec<Vec<f64>> = (0..13).map(|i| vec![i as f64 * 0.3]).collect();
        let labels: Vec<usize> = (0..13).map(|i| usize::from(i > 8)).collect();
        let eval = evaluate(&model, &test, &labels, 0.5).unwrap();
        assert_eq!(eval.confusion.total(), test.len());
        assert_eq!(eval.predictions.len(), test.len());
        assert!(eval.metrics.auc.is_some());
    }

    #[test]
    fn label_mismatch_error() {
        let model = fitted();
        let err = evaluate(&model, &[vec![0.1], vec![0.2]], &[0], 0.5).unwrap_err();
        assert!(matches!(err, LogitError::LengthMismatch { .. }));
    }

    #[test]
    fn from_predictions_scores_labels() {
        let preds = vec![
            Prediction::from_probability(0.9, 0.5),
            Prediction::from_probability(0.2, 0.5),
            Prediction::from_probability(0.6, 0.5),
        ];
        let eval = Evaluation::from_predictions(preds, &[1, 0, 0], 0.5).unwrap();
        assert_eq!(eval.confusion.tp, 1);
        assert_eq!(eval.confusion.tn, 1);
        assert_eq!(eval.confusion.fp, 1);
        assert_eq!(eval.confusion.fn_, 0);
    }
}

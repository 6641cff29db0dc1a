//! Scalar classification metrics derived from a binary confusion matrix.

use std::fmt;

use crate::confusion::BinaryConfusion;

/// Classification metrics with enrolled (1) as the positive class.
///
/// Ratios with a zero denominator are `NaN` and rendered as `NA`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// (TP + TN) / N.
    pub accuracy: f64,
    /// Mean of sensitivity and specificity.
    pub balanced_accuracy: f64,
    /// TP / (TP + FN), a.k.a. recall.
    pub sensitivity: f64,
    /// TN / (TN + FP).
    pub specificity: f64,
    /// TP / (TP + FP), a.k.a. positive predictive value.
    pub precision: f64,
    /// TN / (TN + FN).
    pub npv: f64,
    /// Cohen's kappa.
    pub kappa: f64,
    /// Harmonic mean of precision and sensitivity.
    pub f1: f64,
    /// (TP + FN) / N.
    pub prevalence: f64,
    /// TP / N.
    pub detection_rate: f64,
    /// (TP + FP) / N.
    pub detection_prevalence: f64,
    /// Accuracy of always predicting the larger class.
    pub no_information_rate: f64,
    /// Area under the ROC curve, when probabilities were supplied.
    pub auc: Option<f64>,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        f64::NAN
    } else {
        num as f64 / den as f64
    }
}

impl Metrics {
    /// Compute all label-based metrics from a confusion matrix.
    #[must_use]
    pub fn from_confusion(cm: &BinaryConfusion) -> Self {
        let n = cm.total();
        let accuracy = ratio(cm.tp + cm.tn, n);
        let sensitivity = ratio(cm.tp, cm.actual_positive());
        let specificity = ratio(cm.tn, cm.actual_negative());
        let precision = ratio(cm.tp, cm.predicted_positive());
        let npv = ratio(cm.tn, cm.predicted_negative());

        let f1 = if precision.is_nan() || sensitivity.is_nan() {
            f64::NAN
        } else if precision + sensitivity == 0.0 {
            0.0
        } else {
            2.0 * precision * sensitivity / (precision + sensitivity)
        };

        let kappa = if n == 0 {
            f64::NAN
        } else {
            let n2 = (n * n) as f64;
            let expected = (cm.predicted_positive() * cm.actual_positive()
                + cm.predicted_negative() * cm.actual_negative()) as f64
                / n2;
            if (1.0 - expected).abs() < f64::EPSILON {
                f64::NAN
            } else {
                (accuracy - expected) / (1.0 - expected)
            }
        };

        Self {
            accuracy,
            balanced_accuracy: (sensitivity + specificity) / 2.0,
            sensitivity,
            specificity,
            precision,
            npv,
            kappa,
            f1,
            prevalence: ratio(cm.actual_positive(), n),
            detection_rate: ratio(cm.tp, n),
            detection_prevalence: ratio(cm.predicted_positive(), n),
            no_information_rate: ratio(cm.actual_positive().max(cm.actual_negative()), n),
            auc: None,
        }
    }

    /// Attach the ROC AUC computed from positive-class probabilities.
    #[must_use]
    pub fn with_auc(mut self, true_labels: &[usize], probabilities: &[f64]) -> Self {
        self.auc = Some(roc_auc(true_labels, probabilities));
        self
    }

    /// Return `(snake_case_name, value)` pairs, ROC AUC last when present.
    #[must_use]
    pub fn named_values(&self) -> Vec<(&'static str, f64)> {
        let mut values = vec![
            ("accuracy", self.accuracy),
            ("balanced_accuracy", self.balanced_accuracy),
            ("sensitivity", self.sensitivity),
            ("specificity", self.specificity),
            ("precision", self.precision),
            ("npv", self.npv),
            ("kappa", self.kappa),
            ("f1", self.f1),
            ("prevalence", self.prevalence),
            ("detection_rate", self.detection_rate),
            ("detection_prevalence", self.detection_prevalence),
            ("no_information_rate", self.no_information_rate),
        ];
        if let Some(auc) = self.auc {
            values.push(("auc", auc));
        }
        values
    }
}

/// ROC AUC via the Mann-Whitney U statistic; tied scores count one half.
///
/// Returns `NaN` when either class is absent.
#[must_use]
pub fn roc_auc(true_labels: &[usize], probabilities: &[f64]) -> f64 {
    let mut scored: Vec<(f64, usize)> = probabilities
        .iter()
        .copied()
        .zip(true_labels.iter().copied())
        .collect();
    scored.sort_by(|a, b| a.0.total_cmp(&b.0));

    let n_pos = scored.iter().filter(|&&(_, y)| y == 1).count();
    let n_neg = scored.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return f64::NAN;
    }

    // Sum of 1-based average ranks of the positives.
    let mut rank_sum = 0.0f64;
    let mut i = 0;
    while i < scored.len() {
        let mut j = i;
        while j + 1 < scored.len() && scored[j + 1].0 == scored[i].0 {
            j += 1;
        }
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        let positives = scored[i..=j].iter().filter(|&&(_, y)| y == 1).count();
        rank_sum += avg_rank * positives as f64;
        i = j + 1;
    }

    let n_pos_f = n_pos as f64;
    (rank_sum - n_pos_f * (n_pos_f + 1.0) / 2.0) / (n_pos_f * n_neg as f64)
}

/// Format a metric, rendering `NaN` as `NA`.
pub fn format_metric(value: f64) -> String {
    if value.is_nan() {
        "NA".to_string()
    } else {
        format!("{value:.4}")
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: [(&str, f64); 12] = [
            ("Accuracy", self.accuracy),
            ("No Information Rate", self.no_information_rate),
            ("Kappa", self.kappa),
            ("Sensitivity", self.sensitivity),
            ("Specificity", self.specificity),
            ("Pos Pred Value", self.precision),
            ("Neg Pred Value", self.npv),
            ("F1", self.f1),
            ("Prevalence", self.prevalence),
            ("Detection Rate", self.detection_rate),
            ("Detection Prevalence", self.detection_prevalence),
            ("Balanced Accuracy", self.balanced_accuracy),
        ];
        for (name, value) in rows {
            writeln!(f, "{name:>22} : {}", format_metric(value))?;
        }
        if let Some(auc) = self.auc {
            writeln!(f, "{:>22} : {}", "ROC AUC", format_metric(auc))?;
        }
        writeln!(f, "{:>22} : 1", "'Positive' Class")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn known_matrix_metrics() {
        // TP=20, FN=10, FP=5, TN=65  (N = 100)
        let cm = BinaryConfusion {
            tp: 20,
            fp: 5,
            tn: 65,
            fn_: 10,
        };
        let m = Metrics::from_confusion(&cm);
        assert!(close(m.accuracy, 0.85));
        assert!(close(m.sensitivity, 20.0 / 30.0));
        assert!(close(m.specificity, 65.0 / 70.0));
        assert!(close(m.precision, 0.8));
        assert!(close(m.npv, 65.0 / 75.0));
        assert!(close(m.balanced_accuracy, (20.0 / 30.0 + 65.0 / 70.0) / 2.0));
        assert!(close(m.prevalence, 0.3));
        assert!(close(m.detection_rate, 0.2));
        assert!(close(m.detection_prevalence, 0.25));
        assert!(close(m.no_information_rate, 0.7));

        let f1 = 2.0 * 0.8 * (2.0 / 3.0) / (0.8 + 2.0 / 3.0);
        assert!(close(m.f1, f1));

        // pe = (25*30 + 75*70) / 100^2 = 0.6
        let kappa = (0.85 - 0.6) / (1.0 - 0.6);
        assert!(close(m.kappa, kappa));
    }

    #[test]
    fn no_positive_predictions_gives_na_precision() {
        let cm = BinaryConfusion {
            tp: 0,
            fp: 0,
            tn: 7,
            fn_: 3,
        };
        let m = Metrics::from_confusion(&cm);
        assert!(m.precision.is_nan());
        assert!(m.f1.is_nan());
        assert!(close(m.sensitivity, 0.0));
        assert!(close(m.specificity, 1.0));
        assert!(close(m.kappa, 0.0));
        assert!(format!("{m}").contains("NA"));
    }

    #[test]
    fn auc_perfect_and_inverted() {
        let labels = [0, 0, 1, 1];
        assert!(close(roc_auc(&labels, &[0.1, 0.2, 0.8, 0.9]), 1.0));
        assert!(close(roc_auc(&labels, &[0.9, 0.8, 0.2, 0.1]), 0.0));
    }

    #[test]
    fn auc_ties_count_half() {
        let labels = [0, 1];
        assert!(close(roc_auc(&labels, &[0.5, 0.5]), 0.5));
        // pos {0.4, 0.6}, neg {0.4, 0.2}: pairs (0.4,0.4)=0.5, (0.4,0.2)=1, (0.6,*)=2
        let labels = [1, 1, 0, 0];
        assert!(close(roc_auc(&labels, &[0.4, 0.6, 0.4, 0.2]), 3.5 / 4.0));
    }

    #[test]
    fn auc_single_class_is_nan() {
        assert!(roc_auc(&[1, 1], &[0.3, 0.6]).is_nan());
    }

    #[test]
    fn named_values_include_auc_only_when_set() {
        let cm = BinaryConfusion {
            tp: 3,
            fp: 1,
            tn: 5,
            fn_: 1,
        };
        let plain = Metrics::from_confusion(&cm).named_values();
        assert_eq!(plain.len(), 12);
        assert_eq!(plain[0], ("accuracy", 0.8));
        let with_auc = Metrics::from_confusion(&cm)
            .with_auc(&[0, 1], &[0.1, 0.9])
            .named_values();
        assert_eq!(with_auc.last(), Some(&("auc", 1.0)));
    }

    #[test]
    fn display_lists_every_metric() {
        let cm = BinaryConfusion {
            tp: 1,
            fp: 1,
            tn: 1,
            fn_: 1,
        };
        let text = format!("{}", Metrics::from_confusion(&cm).with_auc(&[0, 1], &[0.2, 0.7]));
        for name in ["Accuracy", "Kappa", "Sensitivity", "Specificity", "Balanced Accuracy", "ROC AUC"] {
            assert!(text.contains(name), "missing {name}");
        }
    }
}

//! Accuracy regression tests for yieldcast-logit.
//!
//! These tests verify that changes to the IRLS solver do not degrade
//! coefficient recovery or hold-out discrimination on deterministic
//! synthetic data.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use yieldcast_logit::{LogisticConfig, evaluate};

// ---------------------------------------------------------------------------
// Helper: deterministic synthetic logistic dataset
// ---------------------------------------------------------------------------

/// Draw `n` samples from a known logistic model.
///
/// `eta = -2.0 + 1.5 * x0 - 1.0 * x1 + 0.0 * x2`, features uniform in [-2, 2].
fn make_logistic(n: usize, seed: u64) -> (Vec<Vec<f64>>, Vec<usize>, Vec<String>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut features = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    for _ in 0..n {
        let row: Vec<f64> = (0..3).map(|_| rng.gen_range(-2.0..2.0)).collect();
        let eta = -2.0 + 1.5 * row[0] - 1.0 * row[1];
        let p = 1.0 / (1.0 + (-eta).exp());
        labels.push(usize::from(rng.r#gen::<f64>() < p));
        features.push(row);
    }
    let names = vec!["x0".to_string(), "x1".to_string(), "x2".to_string()];
    (features, labels, names)
}

// ---------------------------------------------------------------------------
// a) coefficients_recovered
// ---------------------------------------------------------------------------

/// With 20k samples the MLE must land within 0.15 of the generating coefficients.
#[test]
fn coefficients_recovered() {
    let (features, labels, names) = make_logistic(20_000, 42);
    let result = LogisticConfig::new().fit(&features, &labels, &names).unwrap();
    let model = result.model();

    assert!(result.diagnostics().converged);
    assert!((model.intercept() - -2.0).abs() < 0.15, "intercept {}", model.intercept());
    let expected = [1.5, -1.0, 0.0];
    for (got, want) in model.coefficients().iter().zip(expected) {
        assert!((got - want).abs() < 0.15, "coefficient {got} vs {want}");
    }
}

// ---------------------------------------------------------------------------
// b) holdout_auc_above_threshold
// ---------------------------------------------------------------------------

/// Hold-out ROC AUC must exceed 0.80 on an independent sample.
#[test]
fn holdout_auc_above_threshold() {
    let (train_x, train_y, names) = make_logistic(3_000, 7);
    let (test_x, test_y, _) = make_logistic(1_000, 8);
    let model = LogisticConfig::new()
        .fit(&train_x, &train_y, &names)
        .unwrap()
        .into_model();

    let eval = evaluate(&model, &test_x, &test_y, 0.5).unwrap();
    let auc = eval.metrics.auc.unwrap();
    assert!(auc > 0.80, "auc {auc} <= 0.80");
    assert_eq!(eval.confusion.total(), test_x.len());
}

// ---------------------------------------------------------------------------
// c) class_weighting_raises_sensitivity
// ---------------------------------------------------------------------------

/// Inverse-frequency weights must not lower sensitivity on imbalanced data.
#[test]
fn class_weighting_raises_sensitivity() {
    let (train_x, train_y, names) = make_logistic(4_000, 11);
    let (test_x, test_y, _) = make_logistic(2_000, 12);

    let n_pos = train_y.iter().filter(|&&y| y == 1).count() as f64;
    let n_neg = train_y.len() as f64 - n_pos;
    let weights: Vec<f64> = train_y
        .iter()
        .map(|&y| if y == 1 { 1.0 / n_pos } else { 1.0 / n_neg })
        .collect();

    let config = LogisticConfig::new();
    let plain = config.fit(&train_x, &train_y, &names).unwrap().into_model();
    let weighted = config
        .fit_weighted(&train_x, &train_y, &weights, &names)
        .unwrap()
        .into_model();

    let plain_eval = evaluate(&plain, &test_x, &test_y, 0.5).unwrap();
    let weighted_eval = evaluate(&weighted, &test_x, &test_y, 0.5).unwrap();
    assert!(
        weighted_eval.metrics.sensitivity >= plain_eval.metrics.sensitivity,
        "weighted sensitivity {} < plain {}",
        weighted_eval.metrics.sensitivity,
        plain_eval.metrics.sensitivity
    );
}

// ---------------------------------------------------------------------------
// d) deterministic_fit
// ---------------------------------------------------------------------------

/// Fitting twice on identical data must give bit-identical coefficients.
#[test]
fn deterministic_fit() {
    let (features, labels, names) = make_logistic(2_000, 3);
    let config = LogisticConfig::new();
    let a = config.fit(&features, &labels, &names).unwrap().into_model();
    let b = config.fit(&features, &labels, &names).unwrap().into_model();
    assert_eq!(a.coefficients(), b.coefficients());
    assert_eq!(a.intercept().to_bits(), b.intercept().to_bits());
}

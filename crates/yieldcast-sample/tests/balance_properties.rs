//! Balance properties of the resampling branches.
//!
//! Runs the split and each resampler over deterministic imbalanced data and
//! checks the invariants the comparison pipeline relies on.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use yieldcast_sample::{
    ClassWeights, Origin, Smote, Standardizer, StratifiedSplit, Undersampler, class_counts,
};

// ---------------------------------------------------------------------------
// Helper: deterministic imbalanced dataset
// ---------------------------------------------------------------------------

/// 85/15 imbalanced two-feature data; positives are shifted by +1.5 on both axes.
fn make_imbalanced(n: usize, seed: u64) -> (Vec<Vec<f64>>, Vec<usize>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut features = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    for _ in 0..n {
        let label = usize::from(rng.r#gen::<f64>() < 0.15);
        let shift = if label == 1 { 1.5 } else { 0.0 };
        features.push(vec![
            rng.gen_range(-1.0..1.0) + shift,
            100.0 * (rng.gen_range(-1.0..1.0) + shift),
        ]);
        labels.push(label);
    }
    (features, labels)
}

fn take(features: &[Vec<f64>], labels: &[usize], idx: &[usize]) -> (Vec<Vec<f64>>, Vec<usize>) {
    (
        idx.iter().map(|&i| features[i].clone()).collect(),
        idx.iter().map(|&i| labels[i]).collect(),
    )
}

// ---------------------------------------------------------------------------
// a) split_reproducible
// ---------------------------------------------------------------------------

/// A fixed seed reproduces the exact same partition.
#[test]
fn split_reproducible() {
    let (_, labels) = make_imbalanced(500, 1);
    let a = StratifiedSplit::new(0.7).unwrap().with_seed(42).split(&labels).unwrap();
    let b = StratifiedSplit::new(0.7).unwrap().with_seed(42).split(&labels).unwrap();
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// b) split_stratified
// ---------------------------------------------------------------------------

/// Each class sends ceil(0.7 * n_c) rows to training.
#[test]
fn split_stratified() {
    let (_, labels) = make_imbalanced(500, 2);
    let counts = class_counts(&labels);
    let split = StratifiedSplit::new(0.7).unwrap().split(&labels).unwrap();
    let train_counts = class_counts(&split.train.iter().map(|&i| labels[i]).collect::<Vec<_>>());
    for class in 0..2 {
        let expected = (0.7 * counts[class] as f64 - 1e-9).ceil() as usize;
        assert_eq!(train_counts[class], expected, "class {class}");
    }
}

// ---------------------------------------------------------------------------
// c) undersample_balanced_subset
// ---------------------------------------------------------------------------

/// Undersampling balances the classes using only training rows.
#[test]
fn undersample_balanced_subset() {
    let (x, y) = make_imbalanced(500, 3);
    let split = StratifiedSplit::new(0.7).unwrap().split(&y).unwrap();
    let (x_train, y_train) = take(&x, &y, &split.train);

    let r = Undersampler::new().resample(&x_train, &y_train).unwrap();
    let counts = r.class_counts();
    assert_eq!(counts[0], counts[1]);
    assert_eq!(counts[1], class_counts(&y_train)[1]);
    for (row, origin) in r.features.iter().zip(&r.origins) {
        let Origin::Original(i) = *origin else {
            panic!("unexpected synthetic row");
        };
        assert_eq!(row, &x_train[i]);
    }
}

// ---------------------------------------------------------------------------
// d) smote_grows_minority_only
// ---------------------------------------------------------------------------

/// SMOTE after standardization grows the minority and leaves the majority untouched.
#[test]
fn smote_grows_minority_only() {
    let (x, y) = make_imbalanced(500, 4);
    let split = StratifiedSplit::new(0.7).unwrap().split(&y).unwrap();
    let (x_train, y_train) = take(&x, &y, &split.train);

    let scaler = Standardizer::fit(&x_train).unwrap();
    let z_train = scaler.transform(&x_train).unwrap();
    let before = class_counts(&y_train);

    let r = Smote::new(5).unwrap().resample(&z_train, &y_train).unwrap();
    let after = r.class_counts();
    assert_eq!(after[0], before[0]);
    assert!(after[1] > before[1]);
    assert_eq!(after[1], before[0]);
    assert_eq!(&r.features[..z_train.len()], &z_train[..]);
}

// ---------------------------------------------------------------------------
// e) standardizer_ignores_test_rows
// ---------------------------------------------------------------------------

/// Statistics come from training rows only; adding test rows changes nothing.
#[test]
fn standardizer_ignores_test_rows() {
    let (x, y) = make_imbalanced(300, 5);
    let split = StratifiedSplit::new(0.7).unwrap().split(&y).unwrap();
    let (x_train, _) = take(&x, &y, &split.train);
    let (x_test, _) = take(&x, &y, &split.test);

    let fitted = Standardizer::fit(&x_train).unwrap();
    let z_test = fitted.transform(&x_test).unwrap();
    for (z, raw) in z_test.iter().zip(&x_test) {
        for f in 0..2 {
            let expected = (raw[f] - fitted.means()[f]) / fitted.scales()[f];
            assert!((z[f] - expected).abs() < 1e-12);
        }
    }
    assert_ne!(fitted, Standardizer::fit(&x).unwrap());
}

// ---------------------------------------------------------------------------
// f) weights_equalize_class_mass
// ---------------------------------------------------------------------------

/// Inverse-frequency weights give both classes the same total mass.
#[test]
fn weights_equalize_class_mass() {
    let (_, y) = make_imbalanced(500, 6);
    let w = ClassWeights::inverse_frequency(&y).unwrap();
    let per_row = w.sample_weights(&y);
    let zero: f64 = per_row.iter().zip(&y).filter(|&(_, &l)| l == 0).map(|(w, _)| w).sum();
    let one: f64 = per_row.iter().zip(&y).filter(|&(_, &l)| l == 1).map(|(w, _)| w).sum();
    assert!((zero - one).abs() < 1e-9);
    assert!((zero - 1.0).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// g) toy_dataset
// ---------------------------------------------------------------------------

/// Ten records, seven negative and three positive.
#[test]
fn toy_dataset() {
    let y = vec![0, 1, 0, 0, 1, 0, 0, 0, 1, 0];
    let x: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();

    let r = Undersampler::new().resample(&x, &y).unwrap();
    assert_eq!(r.n_samples(), 6);

    let w = ClassWeights::inverse_frequency(&y).unwrap();
    for (weight, &label) in w.sample_weights(&y).iter().zip(&y) {
        let expected = if label == 0 { 1.0 / 7.0 } else { 1.0 / 3.0 };
        assert!((weight - expected).abs() < 1e-15);
    }
}

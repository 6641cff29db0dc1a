//! Iteratively reweighted least squares for binomial/logit regression.

use tracing::{debug, info, instrument, warn};

use crate::config::LogisticConfig;
use crate::error::LogitError;
use crate::linalg::cholesky_solve;
use crate::model::{LogisticModel, sigmoid};
use crate::result::{FitDiagnostics, FitResult};

/// Probabilities are kept inside `[EPS, 1 - EPS]` while iterating.
const EPS: f64 = 1e-10;

fn clamp_prob(p: f64) -> f64 {
    p.clamp(EPS, 1.0 - EPS)
}

/// Linear predictor for parameter layout `[intercept, coefficients..]`.
fn eta(beta: &[f64], row: &[f64]) -> f64 {
    beta[0] + beta[1..].iter().zip(row).map(|(b, x)| b * x).sum::<f64>()
}

/// Weighted binomial deviance of `mu` against `labels`.
fn deviance(labels: &[usize], weights: &[f64], mu: &[f64]) -> f64 {
    let ll: f64 = labels
        .iter()
        .zip(weights)
        .zip(mu)
        .map(|((&y, &w), &m)| {
            let m = clamp_prob(m);
            if y == 1 { w * m.ln() } else { w * (1.0 - m).ln() }
        })
        .sum();
    -2.0 * ll
}

/// Validate shapes and values; returns the number of feature columns.
fn validate(
    features: &[Vec<f64>],
    labels: &[usize],
    weights: &[f64],
    feature_names: &[String],
) -> Result<usize, LogitError> {
    if features.is_empty() {
        return Err(LogitError::EmptyDataset);
    }
    let n_samples = features.len();
    let n_features = features[0].len();

    if labels.len() != n_samples {
        return Err(LogitError::LengthMismatch {
            what: "labels",
            expected: n_samples,
            got: labels.len(),
        });
    }
    if weights.len() != n_samples {
        return Err(LogitError::LengthMismatch {
            what: "weights",
            expected: n_samples,
            got: weights.len(),
        });
    }
    if feature_names.len() != n_features {
        return Err(LogitError::LengthMismatch {
            what: "feature_names",
            expected: n_features,
            got: feature_names.len(),
        });
    }

    for (sample_index, row) in features.iter().enumerate() {
        if row.len() != n_features {
            return Err(LogitError::FeatureCountMismatch {
                expected: n_features,
                got: row.len(),
                sample_index,
            });
        }
        for (feature_index, &val) in row.iter().enumerate() {
            if !val.is_finite() {
                return Err(LogitError::NonFiniteValue {
                    sample_index,
                    feature_index,
                });
            }
        }
    }

    let mut class_weight = [0.0f64; 2];
    for (sample_index, (&label, &weight)) in labels.iter().zip(weights).enumerate() {
        if label > 1 {
            return Err(LogitError::InvalidLabel {
                sample_index,
                label,
            });
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(LogitError::InvalidWeight {
                sample_index,
                weight,
            });
        }
        class_weight[label] += weight;
    }

    match (class_weight[0] > 0.0, class_weight[1] > 0.0) {
        (true, true) => Ok(n_features),
        (false, false) => Err(LogitError::ZeroTotalWeight),
        (true, false) => Err(LogitError::SingleClass { class: 0 }),
        (false, true) => Err(LogitError::SingleClass { class: 1 }),
    }
}

/// Fit the model.
///
/// Parameter vector layout: `beta[0]` is the intercept, `beta[1..]` the
/// feature coefficients.
#[instrument(skip_all, fields(n_samples = features.len(), weighted = weights.is_some()))]
pub(crate) fn train(
    config: &LogisticConfig,
    features: &[Vec<f64>],
    labels: &[usize],
    weights: Option<&[f64]>,
    feature_names: &[String],
) -> Result<FitResult, LogitError> {
    let unit;
    let weights = match weights {
        Some(w) => w,
        None => {
            unit = vec![1.0f64; features.len()];
            &unit
        }
    };
    let n_features = validate(features, labels, weights, feature_names)?;
    let n_samples = features.len();
    let n_params = n_features + 1;

    let total_weight: f64 = weights.iter().sum();
    let unit_weights = weights.iter().all(|&w| w == 1.0);
    let positive_weight: f64 = labels
        .iter()
        .zip(weights)
        .filter(|&(&y, _)| y == 1)
        .map(|(_, &w)| w)
        .sum();
    let base_rate = clamp_prob(positive_weight / total_weight);

    let null_mu = vec![base_rate; n_samples];
    let null_deviance = deviance(labels, weights, &null_mu);

    // Start from the intercept-only solution.
    let mut beta = vec![0.0f64; n_params];
    beta[0] = (base_rate / (1.0 - base_rate)).ln();
    let mut dev_old = null_deviance;

    info!(
        n_samples,
        n_features,
        total_weight,
        base_rate,
        "fitting logistic regression"
    );

    let mut converged = false;
    let mut iterations = 0;
    let mut dev = dev_old;

    for iteration in 1..=config.max_iter {
        iterations = iteration;

        // Accumulate X^T W X and X^T W z with an implicit leading 1 column.
        let mut xtwx = vec![vec![0.0f64; n_params]; n_params];
        let mut xtwz = vec![0.0f64; n_params];

        for ((row, &y), &w) in features.iter().zip(labels).zip(weights) {
            if w == 0.0 {
                continue;
            }
            let linear = eta(&beta, row);
            let mu = clamp_prob(sigmoid(linear));
            let var = mu * (1.0 - mu);
            let working_weight = w * var;
            let z = linear + (y as f64 - mu) / var;

            for i in 0..n_params {
                let xi = if i == 0 { 1.0 } else { row[i - 1] };
                let wxi = working_weight * xi;
                xtwz[i] += wxi * z;
                for j in 0..=i {
                    let xj = if j == 0 { 1.0 } else { row[j - 1] };
                    xtwx[i][j] += wxi * xj;
                }
            }
        }

        for j in 1..n_params {
            xtwx[j][j] += config.l2;
        }

        beta = cholesky_solve(&xtwx, &xtwz)
            .map_err(|pivot| LogitError::SingularSystem { iteration, pivot })?;

        let mu: Vec<f64> = features.iter().map(|row| sigmoid(eta(&beta, row))).collect();
        dev = deviance(labels, weights, &mu);

        let change = (dev - dev_old).abs() / (dev.abs() + 0.1);
        debug!(iteration, deviance = dev, change, "irls step");

        if change < config.tol {
            converged = true;
            break;
        }
        dev_old = dev;
    }

    if !converged {
        warn!(
            iterations,
            deviance = dev,
            "IRLS did not converge; classes may be separable"
        );
    }

    let model = LogisticModel {
        intercept: beta[0],
        coefficients: beta[1..].to_vec(),
        feature_names: feature_names.to_vec(),
    };

    info!(iterations, converged, deviance = dev, null_deviance, "logistic regression fitted");

    Ok(FitResult::new(
        model,
        FitDiagnostics {
            iterations,
            converged,
            deviance: dev,
            null_deviance,
            n_samples,
            total_weight,
            unit_weights,
        },
    ))
}

//! Binary logistic regression: fit, predict, evaluate.
//!
//! Provides a hand-rolled logistic regression fitted by iteratively
//! reweighted least squares with optional observation weights, parallel
//! batch prediction via rayon, and a binary confusion matrix with the usual
//! imbalance-aware metrics (balanced accuracy, kappa, F1, ROC AUC).

mod config;
mod confusion;
mod error;
mod eval;
mod irls;
mod linalg;
mod metrics;
mod model;
mod result;

pub use config::LogisticConfig;
pub use confusion::BinaryConfusion;
pub use error::LogitError;
pub use eval::{Evaluation, evaluate};
pub use metrics::{Metrics, format_metric, roc_auc};
pub use model::{DEFAULT_THRESHOLD, LogisticModel, Prediction};
pub use result::{FitDiagnostics, FitResult};

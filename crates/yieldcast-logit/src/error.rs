/// Errors from logistic regression fitting, prediction, and evaluation.
#[derive(Debug, thiserror::Error)]
pub enum LogitError {
    /// Returned when max_iter is zero.
    #[error("max_iter must be at least 1, got {max_iter}")]
    InvalidMaxIter {
        /// The invalid max_iter value provided.
        max_iter: usize,
    },

    /// Returned when the convergence tolerance is not a positive finite number.
    #[error("tol must be positive and finite, got {tol}")]
    InvalidTolerance {
        /// The invalid tolerance value provided.
        tol: f64,
    },

    /// Returned when the ridge penalty is negative or non-finite.
    #[error("l2 penalty must be non-negative and finite, got {l2}")]
    InvalidPenalty {
        /// The invalid penalty value provided.
        l2: f64,
    },

    /// Returned when the classification threshold is outside (0.0, 1.0).
    #[error("threshold must be in (0.0, 1.0), got {threshold}")]
    InvalidThreshold {
        /// The invalid threshold value provided.
        threshold: f64,
    },

    /// Returned when the training dataset has zero samples.
    #[error("training dataset has zero samples")]
    EmptyDataset,

    /// Returned when the number of labels (or weights) does not match the number of rows.
    #[error("{what} has {got} entries, expected {expected}")]
    LengthMismatch {
        /// Which input was mis-sized.
        what: &'static str,
        /// The expected length (number of feature rows).
        expected: usize,
        /// The actual length.
        got: usize,
    },

    /// Returned when a sample has a different number of features than expected.
    #[error("sample {sample_index} has {got} features, expected {expected}")]
    FeatureCountMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the sample.
        got: usize,
        /// The zero-based index of the offending sample.
        sample_index: usize,
    },

    /// Returned when a sample has a different number of features at prediction time.
    #[error("prediction input has {got} features, expected {expected}")]
    PredictionFeatureMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the prediction input.
        got: usize,
    },

    /// Returned when a training value is NaN or infinite.
    #[error("non-finite value at sample {sample_index}, feature {feature_index}")]
    NonFiniteValue {
        /// The zero-based index of the offending sample.
        sample_index: usize,
        /// The zero-based index of the offending feature column.
        feature_index: usize,
    },

    /// Returned when a label is not 0 or 1.
    #[error("label at sample {sample_index} is {label}, expected 0 or 1")]
    InvalidLabel {
        /// The zero-based index of the offending sample.
        sample_index: usize,
        /// The label value found.
        label: usize,
    },

    /// Returned when an observation weight is negative or non-finite.
    #[error("weight at sample {sample_index} is {weight}, expected a finite non-negative value")]
    InvalidWeight {
        /// The zero-based index of the offending sample.
        sample_index: usize,
        /// The weight value found.
        weight: f64,
    },

    /// Returned when all observation weights are zero.
    #[error("total observation weight is zero")]
    ZeroTotalWeight,

    /// Returned when the training labels contain a single class.
    #[error("training labels contain only class {class}")]
    SingleClass {
        /// The only class present.
        class: usize,
    },

    /// Returned when the IRLS normal equations are not positive definite.
    #[error("normal equations are singular at iteration {iteration} (pivot {pivot})")]
    SingularSystem {
        /// The IRLS iteration at which the solve failed.
        iteration: usize,
        /// The zero-based pivot where Cholesky factorization broke down.
        pivot: usize,
    },
}

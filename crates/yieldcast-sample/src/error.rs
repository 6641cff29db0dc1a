/// Errors from splitting, scaling, and resampling.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    /// Returned when the train fraction is not in (0.0, 1.0).
    #[error("train_fraction must be in (0.0, 1.0), got {fraction}")]
    InvalidTrainFraction {
        /// The invalid fraction provided.
        fraction: f64,
    },

    /// Returned when the SMOTE neighbor count is zero.
    #[error("k_neighbors must be at least 1, got {k}")]
    InvalidNeighborCount {
        /// The invalid neighbor count provided.
        k: usize,
    },

    /// Returned when the SMOTE over-ratio is not in (0.0, MAX_OVER_RATIO].
    #[error("over_ratio must be in (0.0, 100.0], got {ratio}")]
    InvalidOverRatio {
        /// The invalid ratio provided.
        ratio: f64,
    },

    /// Returned when the input has zero samples.
    #[error("dataset has zero samples")]
    EmptyDataset,

    /// Returned when the number of labels does not match the number of feature rows.
    #[error("got {got} labels for {expected} feature rows")]
    LengthMismatch {
        /// Number of feature rows.
        expected: usize,
        /// Number of labels.
        got: usize,
    },

    /// Returned when a row has a different number of features than the first row.
    #[error("sample {sample_index} has {got} features, expected {expected}")]
    FeatureCountMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the sample.
        got: usize,
        /// The zero-based index of the offending sample.
        sample_index: usize,
    },

    /// Returned when a feature value is NaN or infinite.
    #[error("non-finite value at sample {sample_index}, feature {feature_index}")]
    NonFiniteValue {
        /// The zero-based index of the offending sample.
        sample_index: usize,
        /// The zero-based index of the offending feature column.
        feature_index: usize,
    },

    /// Returned when resampling is asked to balance a single class.
    #[error("labels contain only class {class}; resampling needs at least two classes")]
    SingleClass {
        /// The only class present.
        class: usize,
    },

    /// Returned when a split leaves the train or test partition empty.
    #[error("stratified split left the {partition} partition empty")]
    EmptyPartition {
        /// `"train"` or `"test"`.
        partition: &'static str,
    },

    /// Returned when the minority class is too small to find neighbors.
    #[error("minority class {class} has {count} samples; SMOTE needs at least 2")]
    TooFewMinority {
        /// The minority class label.
        class: usize,
        /// Its sample count.
        count: usize,
    },
}

//! Class-imbalance tooling: stratified splitting, random undersampling,
//! SMOTE oversampling, column standardization, and inverse-frequency
//! class weights.
//!
//! Every stochastic step is driven by its own seeded `ChaCha8Rng`, so a
//! fixed seed reproduces the same partitions and resampled sets on any
//! thread count.

mod error;
mod resampled;
mod scale;
mod smote;
mod split;
mod undersample;
mod weights;

pub use error::SampleError;
pub use resampled::{Origin, Resampled, class_counts};
pub use scale::Standardizer;
pub use smote::{MAX_OVER_RATIO, Smote};
pub use split::{SplitIndices, StratifiedSplit};
pub use undersample::Undersampler;
pub use weights::ClassWeights;

//! Compact encoder–decoder trained on the assumed-normal prefix of a run.
//! Input: [n, feature_dim] standardized f64 matrix. Output: per-row reconstruction error.

mod autoencoder;
mod scaler;

pub use autoencoder::{Autoencoder, TrainingSummary};
pub use scaler::StandardScaler;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("training slice is empty: {windows} windows at train_fraction {fraction}")]
    EmptyTrainingSet { windows: usize, fraction: f64 },

    #[error("no feature columns to model across {windows} windows")]
    NoFeatures { windows: usize },

    #[error("feature dimension mismatch: model expects {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("invalid model parameter: {0}")]
    InvalidParameter(String),
}

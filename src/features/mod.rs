//! Per-user running statistics and feature matrix extraction.

mod property;
mod running;
mod extract;
mod matrix;

pub use property::PropertyDescription;
pub use running::RunningUserFeatures;
pub use extract::{BaselineExtractor, FeatureExtract};
pub use matrix::{normalize_columns, user_feature_matrix};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("failure percentage requested before any login attempt was recorded")]
    NoLoginAttempts,
    #[error("extractor produced {got} values, declared dim is {expected}")]
    WrongWidth { expected: usize, got: usize },
    #[error("feature matrix shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

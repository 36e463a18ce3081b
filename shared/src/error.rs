//! Error type for series handling and model fitting

use thiserror::Error;

/// Failures raised while preparing a series or running the regression chain
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    #[error("Series has no observations")]
    EmptySeries,

    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Non-finite value in {0}")]
    NonFinite(String),

    #[error("Matrix is not positive definite")]
    SingularMatrix,
}

/// Result alias for forecast operations
pub type ForecastResult<T> = Result<T, ForecastError>;

//! Error types for the demand-forecast library.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur during forecasting operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Bad column name, unknown aggregation method, unknown model type or an
    /// invalid configuration value.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Operation invoked out of lifecycle order (e.g. predict before fit).
    #[error("state error: {0}")]
    State(String),

    /// Expected derived columns or bounds are missing or misaligned.
    #[error("schema error: {0}")]
    Schema(String),

    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    Timestamp(String),

    /// Missing values detected when not allowed.
    #[error("missing values detected in column '{0}'")]
    MissingValues(String),

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    Computation(String),

    /// The external fitting routine rejected the input or failed.
    #[error("solver error: {0}")]
    Solver(String),
}

impl ForecastError {
    /// The error raised whenever a model is used before `fit`.
    pub fn not_fitted(model: &str) -> Self {
        ForecastError::State(format!("model '{}' not fitted", model))
    }
}

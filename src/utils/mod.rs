//! Utility functions for forecasting models.

pub mod metrics;
pub mod ols;
pub mod stats;

pub use metrics::{
    bias, compare_models, evaluate_predictions, interval_coverage, mae, mape, mse, r_squared,
    rmse, smape, AccuracyMetrics, ModelMetrics,
};
pub use ols::{least_squares, LeastSquaresFit};
pub use stats::z_score;

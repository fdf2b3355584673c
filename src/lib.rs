//! # demand-forecast
//!
//! Multi-model demand forecasting.
//!
//! Combines an exponential smoothing model, a seasonal decomposition model and a
//! recursive feature-based regression model behind one [`ForecastModel`] trait.
//! A [`ForecastManager`] fits and predicts them side by side, builds mean or
//! median ensembles and lays out model comparisons; the [`utils::metrics`]
//! module scores predictions against actuals.
//!
//! [`ForecastModel`]: models::ForecastModel
//! [`ForecastManager`]: manager::ForecastManager

#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod data;
pub mod error;
pub mod manager;
pub mod models;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{DayAnchor, Frequency, PredictionRecord, PredictionSet, TimeSeries};
    pub use crate::data::{sample_demand, DemandTable, SampleConfig};
    pub use crate::error::{ForecastError, Result};
    pub use crate::manager::{EnsembleMethod, EnsembleResult, ForecastManager};
    pub use crate::models::{
        create_model, DecompositionModel, ForecastModel, RegressionModel, StatisticalModel,
    };
    pub use crate::utils::{evaluate_predictions, AccuracyMetrics};
}

//! Core data structures for demand forecasting.

mod forecast;
mod frequency;
mod time_series;

pub use forecast::{ConfidenceInterval, PredictionRecord, PredictionSet};
pub use frequency::{DayAnchor, Frequency};
pub use time_series::TimeSeries;

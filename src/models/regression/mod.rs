//! Feature-engineered regression with recursive multi-step forecasting.

pub mod features;
mod forest;
mod model;
mod regressor;

pub use forest::ForestRegressor;
pub use model::{RegressionConfig, RegressionModel};
pub use regressor::{LinearRegressor, Regressor, RegressorKind, DEFAULT_RIDGE_ALPHA};

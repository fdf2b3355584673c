//! Forecasting models.

mod decomposition;
pub mod regression;
mod solver;
mod statistical;
mod traits;

pub use decomposition::{DecompositionConfig, DecompositionModel};
pub use regression::{RegressionConfig, RegressionModel, RegressorKind};
pub use statistical::{StatisticalConfig, StatisticalModel};
pub use traits::{BoxedModel, ForecastModel, ModelInfo, ModelKind};

use crate::error::Result;

/// Create an unfitted model with default settings from a type string.
///
/// Accepts `"regression"`, `"statistical"`, `"decomposition"` and their aliases
/// (see [`ModelKind`]).
///
/// # Example
/// ```
/// use demand_forecast::models::{create_model, ForecastModel, ModelKind};
///
/// let model = create_model("ets", "baseline").unwrap();
/// assert_eq!(model.model_type(), ModelKind::Statistical);
/// assert!(create_model("lstm", "deep").is_err());
/// ```
pub fn create_model(kind: &str, name: impl Into<String>) -> Result<BoxedModel> {
    Ok(kind.parse::<ModelKind>()?.create(name))
}

impl ModelKind {
    /// Default-configured model of this kind.
    pub fn create(&self, name: impl Into<String>) -> BoxedModel {
        match self {
            ModelKind::Regression => Box::new(RegressionModel::new(name)),
            ModelKind::Statistical => Box::new(StatisticalModel::new(name)),
            ModelKind::Decomposition => Box::new(DecompositionModel::new(name)),
        }
    }
}

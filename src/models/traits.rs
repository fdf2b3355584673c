//! ForecastModel trait defining the common interface for all models.

use crate::core::{ConfidenceInterval, PredictionSet, TimeSeries};
use crate::data::DemandTable;
use crate::error::{ForecastError, Result};
use std::fmt;
use std::str::FromStr;

/// Family a model belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Recursive feature-based regression.
    Regression,
    /// Exponential smoothing (ETS).
    Statistical,
    /// Trend plus seasonality decomposition (MSTL).
    Decomposition,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Regression => "regression",
            ModelKind::Statistical => "statistical",
            ModelKind::Decomposition => "decomposition",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regression" | "ml" | "ml_regression" => Ok(ModelKind::Regression),
            "statistical" | "ets" | "arima" => Ok(ModelKind::Statistical),
            "decomposition" | "mstl" | "prophet" => Ok(ModelKind::Decomposition),
            other => Err(ForecastError::Configuration(format!(
                "unknown model type: {}",
                other
            ))),
        }
    }
}

/// Descriptive snapshot of a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub name: String,
    pub is_fitted: bool,
    pub model_type: ModelKind,
}

/// Common interface for all forecasting models.
///
/// A model is created unfitted, trained with [`fit`](ForecastModel::fit) (re-fitting
/// replaces prior state) and may then [`predict`](ForecastModel::predict) any number
/// of times without being mutated.
///
/// This trait is object-safe and can be used with `Box<dyn ForecastModel>`.
pub trait ForecastModel {
    /// Unique name within a manager.
    fn name(&self) -> &str;

    fn model_type(&self) -> ModelKind;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool;

    /// Fit the model to an ordered historical series.
    fn fit_series(&mut self, series: &TimeSeries) -> Result<()>;

    /// Fit on `target` indexed by `date`, after sorting ascending by date.
    ///
    /// Missing columns fail with [`ForecastError::Configuration`].
    fn fit(&mut self, data: &DemandTable, target: &str, date: &str) -> Result<()> {
        let series = data.series(target, date)?;
        self.fit_series(&series)
    }

    /// Forecast `periods` consecutive periods after the last training date.
    ///
    /// Fails with [`ForecastError::State`] before `fit`.
    fn predict(&self, periods: usize) -> Result<PredictionSet>;

    /// Bounds of a prediction set, one entry per date.
    fn get_confidence_intervals(
        &self,
        predictions: &PredictionSet,
    ) -> Result<Vec<ConfidenceInterval>> {
        predictions.confidence_intervals()
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            name: self.name().to_string(),
            is_fitted: self.is_fitted(),
            model_type: self.model_type(),
        }
    }
}

/// Type alias for boxed model trait objects.
///
/// # Example
///
/// ```
/// use demand_forecast::models::{BoxedModel, ForecastModel, RegressionModel};
///
/// let model: BoxedModel = Box::new(RegressionModel::new("rf"));
/// assert_eq!(model.name(), "rf");
/// assert!(!model.is_fitted());
/// ```
pub type BoxedModel = Box<dyn ForecastModel>;

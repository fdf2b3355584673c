//! Registry and orchestration of forecasting models.

use super::comparison::ModelComparison;
use super::ensemble::{combine, EnsembleMethod, EnsembleResult};
use crate::core::PredictionSet;
use crate::data::DemandTable;
use crate::error::{ForecastError, Result};
use crate::models::{BoxedModel, ModelInfo};
use tracing::{info, warn};

/// Outcome of [`ForecastManager::fit_all`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitReport {
    /// Models that fitted, in registration order.
    pub fitted: Vec<String>,
    /// Models whose fit failed, with the error.
    pub failed: Vec<(String, ForecastError)>,
}

impl FitReport {
    pub fn all_fitted(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Snapshot of the manager state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerSummary {
    pub total_models: usize,
    pub fitted_models: usize,
    pub models_with_predictions: usize,
    pub model_names: Vec<String>,
}

/// Owns a set of named models and their latest predictions.
///
/// Models are fitted and predicted independently: one model failing is logged
/// and never stops the others.
///
/// # Example
/// ```
/// use demand_forecast::data::{sample_demand, SampleConfig};
/// use demand_forecast::manager::ForecastManager;
/// use demand_forecast::models::RegressionModel;
///
/// let data = sample_demand(&SampleConfig::default()).unwrap();
///
/// let mut manager = ForecastManager::new();
/// manager.add_model(Box::new(RegressionModel::new("forest")));
/// manager.fit_all(&data, "demand", "date");
/// manager.predict_all(6);
///
/// let ensemble = manager.get_ensemble_predictions("mean").unwrap();
/// assert_eq!(ensemble.len(), 6);
/// ```
#[derive(Default)]
pub struct ForecastManager {
    models: Vec<BoxedModel>,
    predictions: Vec<PredictionSet>,
    ensemble: Option<EnsembleResult>,
}

impl ForecastManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model under its name, replacing any model of the same name in place.
    pub fn add_model(&mut self, model: BoxedModel) {
        match self.models.iter().position(|m| m.name() == model.name()) {
            Some(i) => self.models[i] = model,
            None => self.models.push(model),
        }
    }

    /// Remove a model and its predictions. Returns the model if it was registered.
    pub fn remove_model(&mut self, name: &str) -> Option<BoxedModel> {
        self.predictions.retain(|p| p.model() != name);
        let i = self.models.iter().position(|m| m.name() == name)?;
        Some(self.models.remove(i))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn model_names(&self) -> Vec<String> {
        self.models.iter().map(|m| m.name().to_string()).collect()
    }

    pub fn model(&self, name: &str) -> Option<&BoxedModel> {
        self.models.iter().find(|m| m.name() == name)
    }

    pub fn model_info(&self) -> Vec<ModelInfo> {
        self.models.iter().map(|m| m.model_info()).collect()
    }

    /// Fit every registered model on `target` indexed by `date`.
    pub fn fit_all(&mut self, data: &DemandTable, target: &str, date: &str) -> FitReport {
        let mut report = FitReport::default();
        for model in &mut self.models {
            info!(model = model.name(), "fitting model");
            match model.fit(data, target, date) {
                Ok(()) => {
                    info!(model = model.name(), "model fitted");
                    report.fitted.push(model.name().to_string());
                }
                Err(e) => {
                    warn!(model = model.name(), error = %e, "failed to fit model");
                    report.failed.push((model.name().to_string(), e));
                }
            }
        }
        report
    }

    /// Forecast `periods` ahead with every fitted model.
    ///
    /// Previous predictions are discarded first. Unfitted models are skipped.
    pub fn predict_all(&mut self, periods: usize) -> &[PredictionSet] {
        self.predictions.clear();
        for model in &self.models {
            if !model.is_fitted() {
                warn!(model = model.name(), "skipping model: not fitted");
                continue;
            }
            info!(model = model.name(), periods, "generating predictions");
            match model.predict(periods) {
                Ok(set) => self.predictions.push(set),
                Err(e) => warn!(model = model.name(), error = %e, "failed to predict"),
            }
        }
        &self.predictions
    }

    /// Latest predictions, in registration order.
    pub fn predictions(&self) -> &[PredictionSet] {
        &self.predictions
    }

    pub fn prediction(&self, name: &str) -> Option<&PredictionSet> {
        self.predictions.iter().find(|p| p.model() == name)
    }

    /// Combine the latest predictions with `"mean"` or `"median"`.
    ///
    /// The result is kept as [`last_ensemble`](Self::last_ensemble); a failed call
    /// leaves the previous one in place.
    pub fn get_ensemble_predictions(&mut self, method: &str) -> Result<&EnsembleResult> {
        let method: EnsembleMethod = method.parse()?;
        let sets: Vec<&PredictionSet> = self.predictions.iter().collect();
        let result = combine(method, &sets)?;
        info!(%method, models = sets.len(), dates = result.len(), "built ensemble");
        Ok(self.ensemble.insert(result))
    }

    pub fn last_ensemble(&self) -> Option<&EnsembleResult> {
        self.ensemble.as_ref()
    }

    /// Side-by-side predictions keyed by the first model's dates.
    pub fn get_model_comparison(&self) -> Result<ModelComparison> {
        let sets: Vec<&PredictionSet> = self.predictions.iter().collect();
        ModelComparison::from_sets(&sets)
    }

    pub fn get_summary(&self) -> ManagerSummary {
        ManagerSummary {
            total_models: self.models.len(),
            fitted_models: self.models.iter().filter(|m| m.is_fitted()).count(),
            models_with_predictions: self.predictions.len(),
            model_names: self.model_names(),
        }
    }
}

//! Additive trend/seasonality decomposition model backed by `augurs` MSTL.

use super::solver::{check_level, SolverFit};
use crate::core::{PredictionSet, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ModelKind};
use augurs::ets::trend::AutoETSTrendModel;
use augurs::ets::AutoETS;
use augurs::mstl::MSTLModel;
use std::fmt;
use tracing::debug;

/// Settings for [`DecompositionModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct DecompositionConfig {
    /// Seasonal periods to extract, in observations.
    pub periods: Vec<usize>,
    /// Two-sided interval level in (0, 1).
    pub level: f64,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            periods: vec![12],
            level: 0.95,
        }
    }
}

impl DecompositionConfig {
    pub fn with_periods(mut self, periods: Vec<usize>) -> Self {
        self.periods = periods;
        self
    }

    pub fn with_level(mut self, level: f64) -> Self {
        self.level = level;
        self
    }

    fn build(&self) -> Result<MSTLModel<AutoETSTrendModel>> {
        check_level(self.level)?;
        if self.periods.is_empty() || self.periods.iter().any(|&p| p < 2) {
            return Err(ForecastError::Configuration(format!(
                "seasonal periods must be non-empty and at least 2, got {:?}",
                self.periods
            )));
        }
        let trend = AutoETS::non_seasonal().into_trend_model();
        Ok(MSTLModel::new(self.periods.clone(), trend))
    }

    /// Two full cycles of the longest period.
    fn min_observations(&self) -> usize {
        2 * self.periods.iter().copied().max().unwrap_or(0)
    }
}

/// Seasonal-trend decomposition with an ETS forecast of the trend.
pub struct DecompositionModel {
    name: String,
    config: DecompositionConfig,
    fitted: Option<SolverFit<MSTLModel<AutoETSTrendModel>>>,
}

impl DecompositionModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, DecompositionConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: DecompositionConfig) -> Self {
        Self {
            name: name.into(),
            config,
            fitted: None,
        }
    }

    pub fn config(&self) -> &DecompositionConfig {
        &self.config
    }
}

impl fmt::Debug for DecompositionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecompositionModel")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("fitted", &self.fitted.is_some())
            .finish()
    }
}

impl ForecastModel for DecompositionModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn model_type(&self) -> ModelKind {
        ModelKind::Decomposition
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn fit_series(&mut self, series: &TimeSeries) -> Result<()> {
        let mstl = self.config.build()?;
        let fit = SolverFit::fit(mstl, series, self.config.min_observations())?;
        debug!(
            model = %self.name,
            observations = series.len(),
            periods = ?self.config.periods,
            frequency = %fit.frequency(),
            "fitted MSTL model"
        );
        self.fitted = Some(fit);
        Ok(())
    }

    fn predict(&self, periods: usize) -> Result<PredictionSet> {
        self.fitted
            .as_ref()
            .ok_or_else(|| ForecastError::not_fitted(&self.name))?
            .predict(&self.name, periods, self.config.level)
    }
}

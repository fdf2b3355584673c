//! Exponential smoothing model backed by `augurs` AutoETS.

use super::solver::{check_level, SolverFit};
use crate::core::{PredictionSet, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ModelKind};
use augurs::ets::AutoETS;
use std::fmt;
use tracing::debug;

/// Settings for [`StatisticalModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticalConfig {
    /// Seasonal period; 1 means non-seasonal.
    pub season_length: usize,
    /// Three-letter ETS spec (error, trend, season), `Z` meaning auto-select.
    pub spec: String,
    /// Two-sided interval level in (0, 1).
    pub level: f64,
}

impl Default for StatisticalConfig {
    fn default() -> Self {
        Self {
            season_length: 1,
            spec: "ZZN".to_string(),
            level: 0.95,
        }
    }
}

impl StatisticalConfig {
    /// Seasonal search with the given period.
    pub fn seasonal(season_length: usize) -> Self {
        Self {
            season_length,
            spec: "ZZZ".to_string(),
            ..Self::default()
        }
    }

    pub fn with_spec(mut self, spec: impl Into<String>) -> Self {
        self.spec = spec.into();
        self
    }

    pub fn with_level(mut self, level: f64) -> Self {
        self.level = level;
        self
    }

    fn build(&self) -> Result<AutoETS> {
        check_level(self.level)?;
        if self.season_length == 0 {
            return Err(ForecastError::Configuration(
                "season length must be at least 1".to_string(),
            ));
        }
        AutoETS::new(self.season_length, self.spec.as_str()).map_err(|e| {
            ForecastError::Configuration(format!("invalid ETS spec '{}': {}", self.spec, e))
        })
    }
}

/// Automatic ETS model selection over the configured spec.
///
/// # Example
/// ```
/// use demand_forecast::models::{ForecastModel, StatisticalModel};
///
/// let model = StatisticalModel::new("ets");
/// assert!(!model.is_fitted());
/// assert!(model.predict(3).is_err());
/// ```
pub struct StatisticalModel {
    name: String,
    config: StatisticalConfig,
    fitted: Option<SolverFit<AutoETS>>,
}

impl StatisticalModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, StatisticalConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: StatisticalConfig) -> Self {
        Self {
            name: name.into(),
            config,
            fitted: None,
        }
    }

    pub fn config(&self) -> &StatisticalConfig {
        &self.config
    }
}

impl fmt::Debug for StatisticalModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatisticalModel")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("fitted", &self.fitted.is_some())
            .finish()
    }
}

impl ForecastModel for StatisticalModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn model_type(&self) -> ModelKind {
        ModelKind::Statistical
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn fit_series(&mut self, series: &TimeSeries) -> Result<()> {
        let ets = self.config.build()?;
        // A seasonal search needs two full cycles.
        let needed = if self.config.season_length > 1 {
            2 * self.config.season_length
        } else {
            0
        };
        let fit = SolverFit::fit(ets, series, needed)?;
        debug!(
            model = %self.name,
            observations = series.len(),
            spec = %self.config.spec,
            frequency = %fit.frequency(),
            "fitted ETS model"
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

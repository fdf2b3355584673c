//! Recursive feature-based regression model.

use super::features::{feature_row, training_rows, LagWindow, NUM_FEATURES, WINDOW};
use super::regressor::{Regressor, RegressorKind};
use crate::core::{DayAnchor, Frequency, PredictionSet, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ModelKind};
use crate::utils::stats::{population_std_dev, z_score};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Settings for [`RegressionModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionConfig {
    pub regressor: RegressorKind,
    /// Normal multiplier applied to the interval half-width.
    pub z: f64,
    /// Fraction of the recent standard deviation used as the standard error.
    pub interval_scale: f64,
    /// Cadence of the future dates; inferred from the training dates when unset.
    pub frequency: Option<Frequency>,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            regressor: RegressorKind::default(),
            z: 1.96,
            interval_scale: 0.5,
            frequency: None,
        }
    }
}

impl RegressionConfig {
    pub fn with_regressor(mut self, regressor: RegressorKind) -> Self {
        self.regressor = regressor;
        self
    }

    /// Set `z` from a two-sided confidence level in (0, 1).
    pub fn with_interval_level(mut self, level: f64) -> Result<Self> {
        self.z = z_score(level)?;
        Ok(self)
    }

    pub fn with_interval_scale(mut self, scale: f64) -> Self {
        self.interval_scale = scale;
        self
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.z.is_finite() || self.z < 0.0 {
            return Err(ForecastError::Configuration(format!(
                "interval multiplier must be a finite non-negative number, got {}",
                self.z
            )));
        }
        if !self.interval_scale.is_finite() || self.interval_scale < 0.0 {
            return Err(ForecastError::Configuration(format!(
                "interval scale must be a finite non-negative number, got {}",
                self.interval_scale
            )));
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Fitted {
    regressor: Box<dyn Regressor>,
    /// Last `WINDOW` training values, oldest first.
    window: LagWindow,
    last_date: DateTime<Utc>,
    frequency: Frequency,
    day_anchor: DayAnchor,
    /// Population standard deviation of the last `WINDOW` training values.
    sigma: f64,
}

/// Forecasts by regressing each period on calendar, lag and rolling features.
///
/// Multi-step forecasts are recursive: every prediction is pushed into the lag
/// window and feeds the features of the following step. Bounds are a constant
/// `± z · scale · σ` band around each prediction, so they do not widen with the
/// horizon.
///
/// # Example
/// ```
/// use demand_forecast::data::{sample_demand, SampleConfig};
/// use demand_forecast::models::{ForecastModel, RegressionModel};
///
/// let data = sample_demand(&SampleConfig::default()).unwrap();
/// let mut model = RegressionModel::new("regression");
/// model.fit(&data, "demand", "date").unwrap();
///
/// let forecast = model.predict(6).unwrap();
/// assert_eq!(forecast.horizon(), 6);
/// assert!(forecast.has_intervals());
/// ```
#[derive(Debug)]
pub struct RegressionModel {
    name: String,
    config: RegressionConfig,
    fitted: Option<Fitted>,
}

impl RegressionModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, RegressionConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: RegressionConfig) -> Self {
        Self {
            name: name.into(),
            config,
            fitted: None,
        }
    }

    pub fn config(&self) -> &RegressionConfig {
        &self.config
    }

    /// Half-width of the prediction bounds, once fitted.
    pub fn interval_half_width(&self) -> Option<f64> {
        self.fitted
            .as_ref()
            .map(|f| self.config.z * self.config.interval_scale * f.sigma)
    }
}

impl ForecastModel for RegressionModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn model_type(&self) -> ModelKind {
        ModelKind::Regression
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn fit_series(&mut self, series: &TimeSeries) -> Result<()> {
        self.config.validate()?;

        let n = series.len();
        if n < WINDOW + 1 {
            return Err(ForecastError::InsufficientData {
                needed: WINDOW + 1,
                got: n,
            });
        }
        if series.has_missing_values() {
            return Err(ForecastError::MissingValues(
                series.label().unwrap_or("target").to_string(),
            ));
        }

        let values = series.values();
        let (rows, targets) = training_rows(series.timestamps(), values);
        let mut regressor = self.config.regressor.build()?;
        regressor.fit(&rows, &targets)?;

        let recent = &values[n - WINDOW..];
        let last_date = series
            .last_timestamp()
            .ok_or(ForecastError::EmptyData)?;
        let frequency = self.config.frequency.unwrap_or_else(|| series.frequency());

        debug!(
            model = %self.name,
            rows = rows.len(),
            features = NUM_FEATURES,
            regressor = %self.config.regressor,
            %frequency,
            "fitted regression model"
        );

        self.fitted = Some(Fitted {
            regressor,
            window: LagWindow::from_history(values),
            last_date,
            frequency,
            day_anchor: series.day_anchor(),
            sigma: population_std_dev(recent),
        });
        Ok(())
    }

    fn predict(&self, periods: usize) -> Result<PredictionSet> {
        let fitted = self
            .fitted
            .as_ref()
            .ok_or_else(|| ForecastError::not_fitted(&self.name))?;

        let dates = fitted
            .frequency
            .future_dates_anchored(fitted.last_date, periods, fitted.day_anchor)?;
        let mut window = fitted.window.clone();
        let mut point = Vec::with_capacity(periods);

        for &date in &dates {
            let row = feature_row(date, &window).ok_or_else(|| {
                ForecastError::Computation("lag window is not full".to_string())
            })?;
            let prediction = fitted.regressor.predict_row(&row)?;
            window.push(prediction);
            point.push(prediction);
        }

        let half_width = self.config.z * self.config.interval_scale * fitted.sigma;
        let lower = point.iter().map(|p| p - half_width).collect();
        let upper = point.iter().map(|p| p + half_width).collect();
        PredictionSet::with_intervals(&self.name, dates, point, lower, upper)
    }
}

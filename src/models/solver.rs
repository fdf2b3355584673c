//! Shared plumbing for models fitted by `augurs`.

use crate::core::{DayAnchor, Frequency, PredictionSet, TimeSeries};
use crate::error::{ForecastError, Result};
use augurs::forecaster::Forecaster;
use augurs::{Fit, Predict};
use chrono::{DateTime, Utc};

/// Minimum observations handed to the solver.
pub(crate) const MIN_OBSERVATIONS: usize = 3;

pub(crate) fn check_level(level: f64) -> Result<()> {
    if level > 0.0 && level < 1.0 {
        Ok(())
    } else {
        Err(ForecastError::Configuration(format!(
            "interval level must be in (0, 1), got {}",
            level
        )))
    }
}

/// A fitted `augurs` forecaster plus the calendar needed to date its output.
pub(crate) struct SolverFit<M>
where
    M: Fit,
    M::Fitted: Predict,
{
    forecaster: Forecaster<M>,
    last_date: DateTime<Utc>,
    frequency: Frequency,
    day_anchor: DayAnchor,
}

impl<M> SolverFit<M>
where
    M: Fit,
    M::Fitted: Predict,
{
    /// Fit `model` on the series values.
    pub(crate) fn fit(model: M, series: &TimeSeries, needed: usize) -> Result<Self> {
        let needed = needed.max(MIN_OBSERVATIONS);
        if series.len() < needed {
            return Err(ForecastError::InsufficientData {
                needed,
                got: series.len(),
            });
        }
        if series.has_missing_values() {
            return Err(ForecastError::MissingValues(
                series.label().unwrap_or("target").to_string(),
            ));
        }
        let last_date = series.last_timestamp().ok_or(ForecastError::EmptyData)?;

        let mut forecaster = Forecaster::new(model);
        forecaster
            .fit(series.values())
            .map_err(|e| ForecastError::Solver(e.to_string()))?;

        Ok(Self {
            forecaster,
            last_date,
            frequency: series.frequency(),
            day_anchor: series.day_anchor(),
        })
    }

    pub(crate) fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Forecast `periods` steps and date them after the last training date.
    ///
    /// The set carries bounds whenever the solver reports intervals.
    pub(crate) fn predict(&self, name: &str, periods: usize, level: f64) -> Result<PredictionSet> {
        let dates = self
            .frequency
            .future_dates_anchored(self.last_date, periods, self.day_anchor)?;
        if periods == 0 {
            return PredictionSet::new(name, dates, Vec::new());
        }

        let forecast = self
            .forecaster
            .predict(periods, level)
            .map_err(|e| ForecastError::Solver(e.to_string()))?;

        if forecast.point.len() != periods {
            return Err(ForecastError::Solver(format!(
                "expected {} forecast values, got {}",
                periods,
                forecast.point.len()
            )));
        }

        match forecast.intervals {
            Some(intervals) => {
                PredictionSet::with_intervals(name, dates, forecast.point, intervals.lower, intervals.upper)
            }
            None => PredictionSet::new(name, dates, forecast.point),
        }
    }
}

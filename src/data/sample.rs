//! Synthetic monthly demand for demos and tests.

use crate::core::{DayAnchor, Frequency};
use crate::data::table::{DemandTable, CLIENT_COLUMN, PRODUCT_COLUMN};
use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;

const BASE_DEMAND: f64 = 1000.0;

/// Shape of the generated series.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleConfig {
    /// Number of monthly observations.
    pub periods: usize,
    /// Increase per period.
    pub trend: f64,
    /// Amplitude of the yearly sine cycle.
    pub seasonality_amplitude: f64,
    /// Standard deviation of the Gaussian noise.
    pub noise_level: f64,
    /// Any day in the first month; dates are month ends.
    pub start: NaiveDate,
    pub seed: u64,
    pub product_id: String,
    pub client_id: String,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            periods: 36,
            trend: 10.0,
            seasonality_amplitude: 50.0,
            noise_level: 10.0,
            start: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or_default(),
            seed: 42,
            product_id: "PROD_001".to_string(),
            client_id: "CLIENT_001".to_string(),
        }
    }
}

impl SampleConfig {
    pub fn with_periods(mut self, periods: usize) -> Self {
        self.periods = periods;
        self
    }

    pub fn with_trend(mut self, trend: f64) -> Self {
        self.trend = trend;
        self
    }

    pub fn with_seasonality(mut self, amplitude: f64) -> Self {
        self.seasonality_amplitude = amplitude;
        self
    }

    pub fn with_noise(mut self, noise_level: f64) -> Self {
        self.noise_level = noise_level;
        self
    }

    pub fn with_start(mut self, start: NaiveDate) -> Self {
        self.start = start;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_ids(mut self, product_id: impl Into<String>, client_id: impl Into<String>) -> Self {
        self.product_id = product_id.into();
        self.client_id = client_id.into();
        self
    }
}

/// Generate `base + trend·t + amplitude·sin(2πt/12) + noise`, clamped at zero.
///
/// The same config always yields the same table. Columns: `date`, `demand`,
/// `product_id`, `client_id`.
pub fn sample_demand(config: &SampleConfig) -> Result<DemandTable> {
    if !config.noise_level.is_finite() || config.noise_level < 0.0 {
        return Err(ForecastError::Configuration(format!(
            "noise level must be a finite non-negative number, got {}",
            config.noise_level
        )));
    }

    let first_of_month = config.start.with_day(1).ok_or_else(|| {
        ForecastError::Timestamp(format!("invalid start date {}", config.start))
    })?;
    let anchor = first_of_month
        .pred_opt()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ForecastError::Timestamp(format!("invalid start date {}", config.start)))?;
    // Anchored on the previous month end, so every generated date is a month end.
    let dates = Frequency::Monthly.future_dates_anchored(
        Utc.from_utc_datetime(&anchor),
        config.periods,
        DayAnchor::MonthEnd,
    )?;

    let noise = Normal::new(0.0, config.noise_level)
        .map_err(|e| ForecastError::Configuration(e.to_string()))?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let demand: Vec<f64> = (0..config.periods)
        .map(|t| {
            let t = t as f64;
            let value = BASE_DEMAND
                + config.trend * t
                + config.seasonality_amplitude * (2.0 * PI * t / 12.0).sin()
                + noise.sample(&mut rng);
            value.max(0.0)
        })
        .collect();

    DemandTable::new()
        .with_dates("date", dates)?
        .with_numeric("demand", demand)?
        .with_labels(
            PRODUCT_COLUMN,
            std::iter::repeat(config.product_id.as_str()).take(config.periods),
        )?
        .with_labels(
            CLIENT_COLUMN,
            std::iter::repeat(config.client_id.as_str()).take(config.periods),
        )
}

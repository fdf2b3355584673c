//! TimeSeries data structure for representing historical demand.

use crate::core::{DayAnchor, Frequency};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};

/// An ordered univariate series of date/value pairs.
///
/// Timestamps are strictly increasing; construction fails otherwise.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    label: Option<String>,
    frequency: Option<Frequency>,
}

impl TimeSeries {
    /// Create a series from already sorted observations.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if values.len() != timestamps.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }

        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(ForecastError::Timestamp(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }

        Ok(Self {
            timestamps,
            values,
            label: None,
            frequency: None,
        })
    }

    /// Create a series from observations in any order, sorting ascending by date.
    ///
    /// Duplicate dates are rejected.
    pub fn from_unsorted(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if values.len() != timestamps.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }

        let mut pairs: Vec<(DateTime<Utc>, f64)> = timestamps.into_iter().zip(values).collect();
        pairs.sort_by_key(|(t, _)| *t);

        if let Some(w) = pairs.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(ForecastError::Timestamp(format!(
                "duplicate date {} in series",
                w[0].0
            )));
        }

        let (timestamps, values) = pairs.into_iter().unzip();
        Self::new(timestamps, values)
    }

    /// Attach a label (usually the source column name).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Fix the cadence instead of inferring it from the timestamps.
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Get timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Get values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Last observed date, if any.
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    /// Explicit cadence if set, otherwise inferred from the timestamps (monthly
    /// when inference fails).
    pub fn frequency(&self) -> Frequency {
        self.frequency
            .unwrap_or_else(|| Frequency::infer_or_default(&self.timestamps))
    }

    /// Day-of-month rule for stepping past the last date: month ends only when
    /// every observation falls on one.
    pub fn day_anchor(&self) -> DayAnchor {
        DayAnchor::infer(&self.timestamps)
    }

    /// Check if series has missing values (NaN or Inf).
    pub fn has_missing_values(&self) -> bool {
        self.values.iter().any(|v| !v.is_finite())
    }
}

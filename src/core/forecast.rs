//! Prediction sets produced by the forecasting models.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};

/// One forecast period: date, point estimate and optional bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionRecord {
    pub date: DateTime<Utc>,
    pub prediction: f64,
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
}

impl PredictionRecord {
    /// True when both bounds are present and bracket the point estimate.
    pub fn is_bracketed(&self) -> bool {
        match (self.lower_bound, self.upper_bound) {
            (Some(lo), Some(up)) => lo <= self.prediction && self.prediction <= up,
            _ => false,
        }
    }
}

/// Lower/upper bounds for one forecast date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInterval {
    pub date: DateTime<Utc>,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// A model's ordered predictions over the forecast horizon.
///
/// Stored column-wise; the bounds are optional so callers can tell a
/// point-only set apart from one carrying intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionSet {
    model: String,
    dates: Vec<DateTime<Utc>>,
    point: Vec<f64>,
    lower: Option<Vec<f64>>,
    upper: Option<Vec<f64>>,
}

impl PredictionSet {
    /// Create a point-only prediction set.
    pub fn new(model: impl Into<String>, dates: Vec<DateTime<Utc>>, point: Vec<f64>) -> Result<Self> {
        if point.len() != dates.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: dates.len(),
                got: point.len(),
            });
        }
        Ok(Self {
            model: model.into(),
            dates,
            point,
            lower: None,
            upper: None,
        })
    }

    /// Create a prediction set with lower and upper bounds.
    pub fn with_intervals(
        model: impl Into<String>,
        dates: Vec<DateTime<Utc>>,
        point: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
    ) -> Result<Self> {
        for len in [point.len(), lower.len(), upper.len()] {
            if len != dates.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: dates.len(),
                    got: len,
                });
            }
        }
        Ok(Self {
            model: model.into(),
            dates,
            point,
            lower: Some(lower),
            upper: Some(upper),
        })
    }

    /// Name of the model that produced the set.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the forecast horizon (number of periods).
    pub fn horizon(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[DateTime<Utc>] {
        &self.dates
    }

    /// Point estimates.
    pub fn point(&self) -> &[f64] {
        &self.point
    }

    pub fn lower(&self) -> Option<&[f64]> {
        self.lower.as_deref()
    }

    pub fn upper(&self) -> Option<&[f64]> {
        self.upper.as_deref()
    }

    /// Check if both bounds are available.
    pub fn has_intervals(&self) -> bool {
        self.lower.is_some() && self.upper.is_some()
    }

    /// Record at position `index`, if within the horizon.
    pub fn record(&self, index: usize) -> Option<PredictionRecord> {
        Some(PredictionRecord {
            date: *self.dates.get(index)?,
            prediction: self.point[index],
            lower_bound: self.lower.as_ref().map(|l| l[index]),
            upper_bound: self.upper.as_ref().map(|u| u[index]),
        })
    }

    /// All records in date order.
    pub fn records(&self) -> Vec<PredictionRecord> {
        (0..self.horizon()).filter_map(|i| self.record(i)).collect()
    }

    /// Bounds per date.
    ///
    /// Fails with [`ForecastError::Schema`] when the set carries no bounds.
    pub fn confidence_intervals(&self) -> Result<Vec<ConfidenceInterval>> {
        let (lower, upper) = self.bounds()?;
        Ok(self
            .dates
            .iter()
            .zip(lower.iter().zip(upper.iter()))
            .map(|(&date, (&lower_bound, &upper_bound))| ConfidenceInterval {
                date,
                lower_bound,
                upper_bound,
            })
            .collect())
    }

    /// Lower and upper bounds, or a schema error naming the model.
    pub fn bounds(&self) -> Result<(&[f64], &[f64])> {
        match (self.lower.as_deref(), self.upper.as_deref()) {
            (Some(lower), Some(upper)) => Ok((lower, upper)),
            _ => Err(ForecastError::Schema(format!(
                "predictions of '{}' must contain lower_bound and upper_bound",
                self.model
            ))),
        }
    }

    /// Keep only the first `periods` records.
    pub fn truncated(&self, periods: usize) -> PredictionSet {
        let n = periods.min(self.horizon());
        PredictionSet {
            model: self.model.clone(),
            dates: self.dates[..n].to_vec(),
            point: self.point[..n].to_vec(),
            lower: self.lower.as_ref().map(|l| l[..n].to_vec()),
            upper: self.upper.as_ref().map(|u| u[..n].to_vec()),
        }
    }
}

//! Cross-model aggregation of prediction sets.

use crate::core::{PredictionRecord, PredictionSet};
use crate::error::{ForecastError, Result};
use crate::utils::stats::{mean, median};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// How per-model predictions are combined at each date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnsembleMethod {
    /// Average of points, lowers and uppers.
    #[default]
    Mean,
    /// Median point with the widest envelope (min of lowers, max of uppers).
    Median,
}

impl FromStr for EnsembleMethod {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mean" => Ok(EnsembleMethod::Mean),
            "median" => Ok(EnsembleMethod::Median),
            other => Err(ForecastError::Configuration(format!(
                "unknown aggregation method: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for EnsembleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnsembleMethod::Mean => f.write_str("mean"),
            EnsembleMethod::Median => f.write_str("median"),
        }
    }
}

/// Combined prediction per date.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleResult {
    method: EnsembleMethod,
    models: Vec<String>,
    records: Vec<PredictionRecord>,
}

impl EnsembleResult {
    pub fn method(&self) -> EnsembleMethod {
        self.method
    }

    /// Names of the contributing models.
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// One record per shared date, in date order of the first set.
    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dates(&self) -> Vec<DateTime<Utc>> {
        self.records.iter().map(|r| r.date).collect()
    }

    pub fn point(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.prediction).collect()
    }
}

/// Combine `sets` on the dates they all share.
///
/// Every set must carry bounds ([`ForecastError::Schema`] otherwise); an empty
/// input is a [`ForecastError::State`] error.
pub fn combine(method: EnsembleMethod, sets: &[&PredictionSet]) -> Result<EnsembleResult> {
    let first = sets.first().ok_or_else(|| {
        ForecastError::State("no predictions available, run predict_all first".to_string())
    })?;

    let mut columns = Vec::with_capacity(sets.len());
    for set in sets {
        let (lower, upper) = set.bounds()?;
        let index: HashMap<DateTime<Utc>, usize> = set
            .dates()
            .iter()
            .enumerate()
            .map(|(i, &d)| (d, i))
            .collect();
        columns.push((index, set.point(), lower, upper));
    }

    let mut records = Vec::with_capacity(first.horizon());
    for &date in first.dates() {
        // Inner join: skip dates missing from any set.
        let rows: Option<Vec<(f64, f64, f64)>> = columns
            .iter()
            .map(|(index, point, lower, upper)| {
                index.get(&date).map(|&i| (point[i], lower[i], upper[i]))
            })
            .collect();
        let Some(rows) = rows else { continue };

        let points: Vec<f64> = rows.iter().map(|r| r.0).collect();
        let lowers = rows.iter().map(|r| r.1);
        let uppers = rows.iter().map(|r| r.2);

        let (prediction, lower, upper) = match method {
            EnsembleMethod::Mean => (
                mean(&points),
                mean(&lowers.collect::<Vec<_>>()),
                mean(&uppers.collect::<Vec<_>>()),
            ),
            EnsembleMethod::Median => (
                median(&points),
                lowers.fold(f64::INFINITY, f64::min),
                uppers.fold(f64::NEG_INFINITY, f64::max),
            ),
        };

        records.push(PredictionRecord {
            date,
            prediction,
            lower_bound: Some(lower),
            upper_bound: Some(upper),
        });
    }

    Ok(EnsembleResult {
        method,
        models: sets.iter().map(|s| s.model().to_string()).collect(),
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn months(range: std::ops::RangeInclusive<u32>) -> Vec<DateTime<Utc>> {
        range
            .map(|m| Utc.with_ymd_and_hms(2025, m, 1, 0, 0, 0).unwrap())
            .collect()
    }

    fn set(name: &str, point: &[f64], spread: f64) -> PredictionSet {
        PredictionSet::with_intervals(
            name,
            months(1..=point.len() as u32),
            point.to_vec(),
            point.iter().map(|p| p - spread).collect(),
            point.iter().map(|p| p + spread).collect(),
        )
        .unwrap()
    }

    #[test]
    fn method_parsing() {
        assert_eq!("mean".parse::<EnsembleMethod>().unwrap(), EnsembleMethod::Mean);
        assert_eq!("median".parse::<EnsembleMethod>().unwrap(), EnsembleMethod::Median);
        assert!(matches!(
            "weighted".parse::<EnsembleMethod>(),
            Err(ForecastError::Configuration(_))
        ));
        assert_eq!(EnsembleMethod::Median.to_string(), "median");
    }

    #[test]
    fn mean_averages_everything() {
        let a = set("a", &[10.0, 20.0], 1.0);
        let b = set("b", &[20.0, 40.0], 3.0);
        let result = combine(EnsembleMethod::Mean, &[&a, &b]).unwrap();

        assert_eq!(result.models(), &["a".to_string(), "b".to_string()]);
        let r = result.records()[1];
        assert_relative_eq!(r.prediction, 30.0);
        assert_relative_eq!(r.lower_bound.unwrap(), 28.0);
        assert_relative_eq!(r.upper_bound.unwrap(), 32.0);
    }

    #[test]
    fn median_takes_envelope() {
        let a = set("a", &[10.0], 1.0);
        let b = set("b", &[12.0], 5.0);
        let c = set("c", &[100.0], 0.5);
        let result = combine(EnsembleMethod::Median, &[&a, &b, &c]).unwrap();

        let r = result.records()[0];
        assert_relative_eq!(r.prediction, 12.0);
        assert_relative_eq!(r.lower_bound.unwrap(), 7.0);
        assert_relative_eq!(r.upper_bound.unwrap(), 100.5);
    }

    #[test]
    fn joins_on_shared_dates() {
        let long = set("long", &[1.0, 2.0, 3.0], 0.1);
        let short = set("short", &[5.0, 6.0], 0.1);
        let result = combine(EnsembleMethod::Mean, &[&long, &short]).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.dates(), months(1..=2));
        assert_eq!(result.point(), vec![3.0, 4.0]);
    }

    #[test]
    fn requires_bounds_and_input() {
        let bare = PredictionSet::new("bare", months(1..=2), vec![1.0, 2.0]).unwrap();
        let full = set("full", &[1.0, 2.0], 1.0);

        assert!(matches!(
            combine(EnsembleMethod::Mean, &[&full, &bare]),
            Err(ForecastError::Schema(_))
        ));
        assert!(matches!(
            combine(EnsembleMethod::Median, &[]),
            Err(ForecastError::State(_))
        ));
    }
}

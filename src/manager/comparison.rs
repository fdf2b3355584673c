//! Side-by-side view of several models' predictions.

use crate::core::PredictionSet;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};

/// One model's columns in a [`ModelComparison`].
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonEntry {
    pub model: String,
    pub prediction: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// Wide table keyed by date: `<model>_prediction`, `<model>_lower` and
/// `<model>_upper` per model, in registration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelComparison {
    dates: Vec<DateTime<Utc>>,
    entries: Vec<ComparisonEntry>,
}

impl ModelComparison {
    /// Build from sets that must all share the first set's dates.
    pub fn from_sets(sets: &[&PredictionSet]) -> Result<Self> {
        let first = sets.first().ok_or_else(|| {
            ForecastError::State("no predictions available, run predict_all first".to_string())
        })?;
        let dates = first.dates().to_vec();

        let entries = sets
            .iter()
            .map(|set| {
                if set.dates() != dates.as_slice() {
                    return Err(ForecastError::Schema(format!(
                        "dates of '{}' do not align with '{}'",
                        set.model(),
                        first.model()
                    )));
                }
                let (lower, upper) = set.bounds()?;
                Ok(ComparisonEntry {
                    model: set.model().to_string(),
                    prediction: set.point().to_vec(),
                    lower: lower.to_vec(),
                    upper: upper.to_vec(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { dates, entries })
    }

    pub fn dates(&self) -> &[DateTime<Utc>] {
        &self.dates
    }

    pub fn entries(&self) -> &[ComparisonEntry] {
        &self.entries
    }

    pub fn num_rows(&self) -> usize {
        self.dates.len()
    }

    /// Column names after `date`, in table order.
    pub fn column_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|e| {
                [
                    format!("{}_prediction", e.model),
                    format!("{}_lower", e.model),
                    format!("{}_upper", e.model),
                ]
            })
            .collect()
    }

    /// Look up a column by its wide-table name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.entries.iter().find_map(|e| {
            let suffix = name.strip_prefix(e.model.as_str())?.strip_prefix('_')?;
            match suffix {
                "prediction" => Some(e.prediction.as_slice()),
                "lower" => Some(e.lower.as_slice()),
                "upper" => Some(e.upper.as_slice()),
                _ => None,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn set(name: &str, start_month: u32, point: &[f64]) -> PredictionSet {
        let dates = (0..point.len() as u32)
            .map(|i| Utc.with_ymd_and_hms(2025, start_month + i, 1, 0, 0, 0).unwrap())
            .collect();
        PredictionSet::with_intervals(
            name,
            dates,
            point.to_vec(),
            point.iter().map(|p| p - 1.0).collect(),
            point.iter().map(|p| p + 1.0).collect(),
        )
        .unwrap()
    }

    #[test]
    fn builds_wide_columns() {
        let a = set("a", 1, &[1.0, 2.0]);
        let b = set("b_model", 1, &[3.0, 4.0]);
        let cmp = ModelComparison::from_sets(&[&a, &b]).unwrap();

        assert_eq!(cmp.num_rows(), 2);
        assert_eq!(
            cmp.column_names(),
            vec![
                "a_prediction",
                "a_lower",
                "a_upper",
                "b_model_prediction",
                "b_model_lower",
                "b_model_upper"
            ]
        );
        assert_eq!(cmp.column("b_model_upper"), Some(&[4.0, 5.0][..]));
        assert_eq!(cmp.column("a_prediction"), Some(&[1.0, 2.0][..]));
        assert_eq!(cmp.column("c_prediction"), None);
    }

    #[test]
    fn misaligned_dates_fail() {
        let a = set("a", 1, &[1.0, 2.0]);
        let shifted = set("shifted", 2, &[1.0, 2.0]);
        let short = set("short", 1, &[1.0]);

        assert!(matches!(
            ModelComparison::from_sets(&[&a, &shifted]),
            Err(ForecastError::Schema(_))
        ));
        assert!(matches!(
            ModelComparison::from_sets(&[&a, &short]),
            Err(ForecastError::Schema(_))
        ));
    }

    #[test]
    fn requires_bounds() {
        let a = set("a", 1, &[1.0]);
        let bare = PredictionSet::new("bare", a.dates().to_vec(), vec![1.0]).unwrap();
        assert!(matches!(
            ModelComparison::from_sets(&[&a, &bare]),
            Err(ForecastError::Schema(_))
        ));
    }
}

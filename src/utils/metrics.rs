//! Accuracy metrics for forecast evaluation.
//!
//! All functions are stateless and compare an `actual` slice against a
//! `predicted` slice of the same length.

use crate::error::{ForecastError, Result};

/// Accuracy metrics for evaluating forecast performance.
#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error over non-zero actuals (None if all actuals are zero)
    pub mape: Option<f64>,
    /// Symmetric Mean Absolute Percentage Error
    pub smape: f64,
    /// R-squared (coefficient of determination)
    pub r_squared: f64,
    /// Mean of `predicted - actual`; positive means overestimation
    pub bias: f64,
}

/// Metrics for one named model, as produced by [`compare_models`].
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMetrics {
    pub model: String,
    pub metrics: AccuracyMetrics,
}

fn check_pair(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }
    Ok(())
}

/// Mean Absolute Error.
pub fn mae(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;
    Ok(actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64)
}

/// Mean Squared Error.
pub fn mse(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;
    Ok(actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64)
}

/// Root Mean Squared Error.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    mse(actual, predicted).map(f64::sqrt)
}

/// Mean Absolute Percentage Error, in percent.
///
/// Observations with a zero actual are skipped; `None` if every actual is zero.
pub fn mape(actual: &[f64], predicted: &[f64]) -> Result<Option<f64>> {
    check_pair(actual, predicted)?;
    let terms: Vec<f64> = actual
        .iter()
        .zip(predicted.iter())
        .filter(|(a, _)| **a != 0.0)
        .map(|(a, p)| ((a - p) / a).abs())
        .collect();
    if terms.is_empty() {
        return Ok(None);
    }
    Ok(Some(100.0 * terms.iter().sum::<f64>() / terms.len() as f64))
}

/// Symmetric Mean Absolute Percentage Error, in percent.
///
/// Uses `(|a| + |p|) / 2` as denominator and skips observations where it is zero.
pub fn smape(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;
    let terms: Vec<f64> = actual
        .iter()
        .zip(predicted.iter())
        .filter_map(|(a, p)| {
            let denom = (a.abs() + p.abs()) / 2.0;
            (denom != 0.0).then(|| (a - p).abs() / denom)
        })
        .collect();
    if terms.is_empty() {
        return Ok(0.0);
    }
    Ok(100.0 * terms.iter().sum::<f64>() / terms.len() as f64)
}

/// Coefficient of determination. Zero when the actual series is constant.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;
    let n = actual.len() as f64;
    let mean_actual = actual.iter().sum::<f64>() / n;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean_actual).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    if ss_tot == 0.0 {
        return Ok(0.0);
    }
    Ok(1.0 - ss_res / ss_tot)
}

/// Mean of `predicted - actual`.
pub fn bias(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;
    Ok(predicted
        .iter()
        .zip(actual.iter())
        .map(|(p, a)| p - a)
        .sum::<f64>()
        / actual.len() as f64)
}

/// Percentage (0-100) of actual values falling inside `[lower, upper]`.
pub fn interval_coverage(actual: &[f64], lower: &[f64], upper: &[f64]) -> Result<f64> {
    check_pair(actual, lower)?;
    check_pair(actual, upper)?;
    let inside = actual
        .iter()
        .zip(lower.iter().zip(upper.iter()))
        .filter(|(&a, (&lo, &up))| a >= lo && a <= up)
        .count();
    Ok(100.0 * inside as f64 / actual.len() as f64)
}

/// Calculate all accuracy metrics between actual and predicted values.
pub fn evaluate_predictions(actual: &[f64], predicted: &[f64]) -> Result<AccuracyMetrics> {
    let mse = mse(actual, predicted)?;
    Ok(AccuracyMetrics {
        mae: mae(actual, predicted)?,
        mse,
        rmse: mse.sqrt(),
        mape: mape(actual, predicted)?,
        smape: smape(actual, predicted)?,
        r_squared: r_squared(actual, predicted)?,
        bias: bias(actual, predicted)?,
    })
}

/// Evaluate several models against the same actuals, preserving input order.
pub fn compare_models<S: AsRef<str>, P: AsRef<[f64]>>(
    actual: &[f64],
    predictions: &[(S, P)],
) -> Result<Vec<ModelMetrics>> {
    predictions
        .iter()
        .map(|(name, predicted)| {
            Ok(ModelMetrics {
                model: name.as_ref().to_string(),
                metrics: evaluate_predictions(actual, predicted.as_ref())?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perfect_prediction() {
        let actual = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let metrics = evaluate_predictions(&actual, &actual).unwrap();

        assert_relative_eq!(metrics.mae, 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.mse, 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.rmse, 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.mape.unwrap(), 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.smape, 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.r_squared, 1.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.bias, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn known_values() {
        let actual = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let predicted = vec![1.5, 2.5, 2.5, 4.5, 4.5];

        let metrics = evaluate_predictions(&actual, &predicted).unwrap();

        assert_relative_eq!(metrics.mae, 0.5, epsilon = 1e-10);
        assert_relative_eq!(metrics.mse, 0.25, epsilon = 1e-10);
        assert_relative_eq!(metrics.rmse, 0.5, epsilon = 1e-10);
        // +0.5 three times, -0.5 twice
        assert_relative_eq!(metrics.bias, 0.1, epsilon = 1e-10);
    }

    #[test]
    fn mape_skips_zero_actuals() {
        let actual = vec![0.0, 10.0, 20.0];
        let predicted = vec![5.0, 11.0, 18.0];
        // (0.1 + 0.1) / 2 = 10%
        assert_relative_eq!(mape(&actual, &predicted).unwrap().unwrap(), 10.0, epsilon = 1e-10);

        assert_eq!(mape(&[0.0, 0.0], &[1.0, 2.0]).unwrap(), None);
    }

    #[test]
    fn smape_skips_zero_denominators() {
        let actual = vec![0.0, 100.0];
        let predicted = vec![0.0, 50.0];
        // Only the second pair counts: 50 / 75
        assert_relative_eq!(
            smape(&actual, &predicted).unwrap(),
            100.0 * 50.0 / 75.0,
            epsilon = 1e-10
        );
        assert_relative_eq!(smape(&[0.0], &[0.0]).unwrap(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn r_squared_edge_cases() {
        assert_relative_eq!(r_squared(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]).unwrap(), 0.0);
        let poor = r_squared(&[1.0, 2.0, 3.0, 4.0, 5.0], &[5.0, 4.0, 3.0, 2.0, 1.0]).unwrap();
        assert!(poor < 0.0);
    }

    #[test]
    fn coverage_counts_inclusive_bounds() {
        let actual = vec![1.0, 5.0, 10.0, 20.0];
        let lower = vec![0.0, 5.0, 11.0, 15.0];
        let upper = vec![2.0, 6.0, 12.0, 20.0];
        assert_relative_eq!(
            interval_coverage(&actual, &lower, &upper).unwrap(),
            75.0,
            epsilon = 1e-10
        );
    }

    #[test]
    fn input_validation() {
        assert!(matches!(mae(&[], &[]), Err(ForecastError::EmptyData)));
        assert!(matches!(
            rmse(&[1.0, 2.0, 3.0], &[1.0, 2.0]),
            Err(ForecastError::DimensionMismatch { expected: 3, got: 2 })
        ));
        assert!(interval_coverage(&[1.0], &[0.0, 0.0], &[2.0]).is_err());
    }

    #[test]
    fn compare_models_keeps_order() {
        let actual = vec![10.0, 20.0, 30.0];
        let rows = compare_models(
            &actual,
            &[
                ("exact", vec![10.0, 20.0, 30.0]),
                ("high", vec![12.0, 22.0, 32.0]),
            ],
        )
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].model, "exact");
        assert_relative_eq!(rows[0].metrics.mae, 0.0, epsilon = 1e-10);
        assert_eq!(rows[1].model, "high");
        assert_relative_eq!(rows[1].metrics.bias, 2.0, epsilon = 1e-10);

        let mismatched = compare_models(&actual, &[("short", vec![1.0])]);
        assert!(mismatched.is_err());
    }
}

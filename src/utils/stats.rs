//! Statistical utility functions.

use crate::error::{ForecastError, Result};
use statrs::distribution::{ContinuousCDF, Normal};

/// Two-sided standard normal multiplier for a confidence level.
///
/// # Example
/// ```
/// use demand_forecast::utils::stats::z_score;
///
/// // 95% confidence level -> z ≈ 1.96
/// let z = z_score(0.95).unwrap();
/// assert!((z - 1.96).abs() < 0.001);
/// ```
pub fn z_score(level: f64) -> Result<f64> {
    if !(level > 0.0 && level < 1.0) {
        return Err(ForecastError::Configuration(format!(
            "confidence level must be in (0, 1), got {}",
            level
        )));
    }
    let normal =
        Normal::new(0.0, 1.0).map_err(|e| ForecastError::Computation(e.to_string()))?;
    Ok(normal.inverse_cdf(0.5 + level / 2.0))
}

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (n denominator).
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    (sum_sq / values.len() as f64).sqrt()
}

/// Calculate the median of a slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn z_score_known_values() {
        assert_relative_eq!(z_score(0.95).unwrap(), 1.959964, epsilon = 1e-5);
        assert_relative_eq!(z_score(0.99).unwrap(), 2.575829, epsilon = 1e-5);
        assert_relative_eq!(z_score(0.80).unwrap(), 1.281552, epsilon = 1e-5);
    }

    #[test]
    fn z_score_rejects_invalid_levels() {
        for level in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                z_score(level),
                Err(ForecastError::Configuration(_))
            ));
        }
    }

    #[test]
    fn mean_calculates_correctly() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert_relative_eq!(mean(&[10.0]), 10.0, epsilon = 1e-10);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn population_std_dev_uses_n() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(population_std_dev(&values), 2.0, epsilon = 1e-10);
        assert!(population_std_dev(&[]).is_nan());
    }

    #[test]
    fn median_calculates_correctly() {
        assert_relative_eq!(median(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert_relative_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5, epsilon = 1e-10);
        assert_relative_eq!(median(&[5.0, 1.0, 3.0, 2.0, 4.0]), 3.0, epsilon = 1e-10);
        assert!(median(&[]).is_nan());
    }
}

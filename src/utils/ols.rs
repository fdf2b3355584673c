//! Least-squares regression on a dense design matrix.
//!
//! Used by the regression model to estimate its coefficients. An optional ridge
//! penalty is applied to the slope coefficients (never the intercept).

use crate::error::{ForecastError, Result};

/// Fitted linear model: `y = intercept + row · coefficients`.
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquaresFit {
    /// Regression coefficients (one per column).
    pub coefficients: Vec<f64>,
    /// Intercept term.
    pub intercept: f64,
}

impl LeastSquaresFit {
    /// Predict a single observation.
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: row.len(),
            });
        }
        Ok(self.intercept
            + row
                .iter()
                .zip(self.coefficients.iter())
                .map(|(x, b)| x * b)
                .sum::<f64>())
    }

    /// Get the number of regressors.
    pub fn num_regressors(&self) -> usize {
        self.coefficients.len()
    }
}

/// Fit `y = intercept + X @ coefficients` by penalised least squares.
///
/// `rows` holds one observation per entry, all of the same width. `penalty` is
/// the ridge strength added to the slope part of `X'X`; zero gives ordinary
/// least squares (a tiny diagonal term is always added for stability).
///
/// Uses Cholesky decomposition to solve the normal equations.
pub fn least_squares(rows: &[Vec<f64>], y: &[f64], penalty: f64) -> Result<LeastSquaresFit> {
    let n = y.len();

    if n == 0 {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }
    if rows.len() != n {
        return Err(ForecastError::DimensionMismatch {
            expected: n,
            got: rows.len(),
        });
    }
    if !penalty.is_finite() || penalty < 0.0 {
        return Err(ForecastError::Configuration(format!(
            "ridge penalty must be a finite non-negative number, got {}",
            penalty
        )));
    }

    let k = rows[0].len();
    if let Some(bad) = rows.iter().find(|r| r.len() != k) {
        return Err(ForecastError::DimensionMismatch {
            expected: k,
            got: bad.len(),
        });
    }

    // Design matrix has k+1 columns: [1, x1, x2, ...]
    let num_params = k + 1;
    let mut xtx = vec![vec![0.0; num_params]; num_params];
    let mut xty = vec![0.0; num_params];

    for (row, &y_obs) in rows.iter().zip(y.iter()) {
        xtx[0][0] += 1.0;
        xty[0] += y_obs;
        for i in 0..k {
            let xi = row[i];
            xtx[0][i + 1] += xi;
            xtx[i + 1][0] += xi;
            xty[i + 1] += xi * y_obs;
            for j in 0..k {
                xtx[i + 1][j + 1] += xi * row[j];
            }
        }
    }

    for i in 0..num_params {
        xtx[i][i] += 1e-8;
        if i > 0 {
            xtx[i][i] += penalty;
        }
    }

    let beta = solve_symmetric(&xtx, &xty).ok_or_else(|| {
        ForecastError::Computation(
            "least squares failed: normal equations not positive definite".into(),
        )
    })?;

    Ok(LeastSquaresFit {
        intercept: beta[0],
        coefficients: beta[1..].to_vec(),
    })
}

/// Solve symmetric positive definite system using Cholesky decomposition.
///
/// Solves A @ x = b where A is symmetric positive definite.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // Cholesky decomposition A = L @ L'
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= 0.0 || sum.is_nan() {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // Forward substitution: L @ y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Backward substitution: L' @ x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}

//! Regressors used by the recursive regression model.

use super::forest::{ForestRegressor, DEFAULT_SEED, DEFAULT_TREES};
use crate::error::{ForecastError, Result};
use crate::utils::{least_squares, LeastSquaresFit};
use std::fmt;
use std::str::FromStr;

/// Default ridge strength on standardized features.
pub const DEFAULT_RIDGE_ALPHA: f64 = 1.0;

/// A supervised regressor over fixed-width feature rows.
pub trait Regressor: fmt::Debug {
    /// Train on `rows` (one observation each) against `targets`.
    fn fit(&mut self, rows: &[Vec<f64>], targets: &[f64]) -> Result<()>;

    /// Predict one row. Fails if the regressor is not fitted.
    fn predict_row(&self, row: &[f64]) -> Result<f64>;

    fn is_fitted(&self) -> bool;
}

/// Which regressor a [`RegressionModel`](super::RegressionModel) trains.
///
/// Defaults to a seeded random forest of 100 trees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegressorKind {
    /// Bagged regression trees.
    RandomForest { n_trees: usize, seed: u64 },
    /// Ordinary least squares.
    LinearRegression,
    /// Least squares with an L2 penalty on the standardized slopes.
    Ridge { alpha: f64 },
}

impl Default for RegressorKind {
    fn default() -> Self {
        RegressorKind::RandomForest {
            n_trees: DEFAULT_TREES,
            seed: DEFAULT_SEED,
        }
    }
}

impl RegressorKind {
    pub fn build(&self) -> Result<Box<dyn Regressor>> {
        match *self {
            RegressorKind::RandomForest { n_trees, seed } => {
                Ok(Box::new(ForestRegressor::new(n_trees, seed)?))
            }
            RegressorKind::LinearRegression => Ok(Box::new(LinearRegressor::new(0.0)?)),
            RegressorKind::Ridge { alpha } => Ok(Box::new(LinearRegressor::new(alpha)?)),
        }
    }
}

impl fmt::Display for RegressorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegressorKind::RandomForest { n_trees, seed } => {
                write!(f, "random_forest(n_trees={}, seed={})", n_trees, seed)
            }
            RegressorKind::LinearRegression => f.write_str("linear_regression"),
            RegressorKind::Ridge { alpha } => write!(f, "ridge(alpha={})", alpha),
        }
    }
}

impl FromStr for RegressorKind {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random_forest" | "forest" | "rf" => Ok(RegressorKind::default()),
            "linear_regression" | "linear" | "ols" => Ok(RegressorKind::LinearRegression),
            "ridge" => Ok(RegressorKind::Ridge {
                alpha: DEFAULT_RIDGE_ALPHA,
            }),
            other => Err(ForecastError::Configuration(format!(
                "unknown regressor type: {}",
                other
            ))),
        }
    }
}

/// Per-column centering and scaling learned from the training rows.
#[derive(Debug, Clone, PartialEq)]
struct Standardizer {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl Standardizer {
    fn fit(rows: &[Vec<f64>]) -> Self {
        let width = rows.first().map_or(0, Vec::len);
        let n = rows.len() as f64;
        let mut means = vec![0.0; width];
        let mut scales = vec![1.0; width];

        for j in 0..width {
            let mean = rows.iter().map(|r| r[j]).sum::<f64>() / n;
            let var = rows.iter().map(|r| (r[j] - mean).powi(2)).sum::<f64>() / n;
            means[j] = mean;
            // Constant columns stay unscaled.
            if var.sqrt() > 1e-12 {
                scales[j] = var.sqrt();
            }
        }
        Self { means, scales }
    }

    fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(self.scales.iter()))
            .map(|(x, (m, s))| (x - m) / s)
            .collect()
    }
}

/// Least-squares regressor on standardized features.
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    penalty: f64,
    state: Option<(Standardizer, LeastSquaresFit)>,
}

impl LinearRegressor {
    /// `penalty = 0` is ordinary least squares.
    pub fn new(penalty: f64) -> Result<Self> {
        if !penalty.is_finite() || penalty < 0.0 {
            return Err(ForecastError::Configuration(format!(
                "ridge alpha must be a finite non-negative number, got {}",
                penalty
            )));
        }
        Ok(Self {
            penalty,
            state: None,
        })
    }

    pub fn penalty(&self) -> f64 {
        self.penalty
    }
}

impl Regressor for LinearRegressor {
    fn fit(&mut self, rows: &[Vec<f64>], targets: &[f64]) -> Result<()> {
        if rows.is_empty() {
            return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
        }
        if let Some(bad) = rows.iter().flatten().find(|v| !v.is_finite()) {
            return Err(ForecastError::Computation(format!(
                "non-finite feature value {}",
                bad
            )));
        }
        let scaler = Standardizer::fit(rows);
        let scaled: Vec<Vec<f64>> = rows.iter().map(|r| scaler.transform(r)).collect();
        let fit = least_squares(&scaled, targets, self.penalty)?;
        self.state = Some((scaler, fit));
        Ok(())
    }

    fn predict_row(&self, row: &[f64]) -> Result<f64> {
        let (scaler, fit) = self
            .state
            .as_ref()
            .ok_or_else(|| ForecastError::State("regressor not fitted".to_string()))?;
        fit.predict_row(&scaler.transform(row))
    }

    fn is_fitted(&self) -> bool {
        self.state.is_some()
    }
}

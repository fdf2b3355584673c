//! Random forest regressor backed by `smartcore`.

use super::regressor::Regressor;
use crate::error::{ForecastError, Result};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fmt;

/// Trees grown by the default forest.
pub const DEFAULT_TREES: usize = 100;

/// Seed of the default forest.
pub const DEFAULT_SEED: u64 = 42;

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Bagged regression trees with a fixed seed.
///
/// Bootstrap sampling and feature subsets are drawn from `seed`, so two forests
/// with the same settings fitted on the same rows predict identically.
pub struct ForestRegressor {
    n_trees: usize,
    seed: u64,
    forest: Option<Forest>,
}

impl ForestRegressor {
    pub fn new(n_trees: usize, seed: u64) -> Result<Self> {
        if n_trees == 0 {
            return Err(ForecastError::Configuration(
                "random forest needs at least one tree".to_string(),
            ));
        }
        Ok(Self {
            n_trees,
            seed,
            forest: None,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl fmt::Debug for ForestRegressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForestRegressor")
            .field("n_trees", &self.n_trees)
            .field("seed", &self.seed)
            .field("fitted", &self.forest.is_some())
            .finish()
    }
}

impl Regressor for ForestRegressor {
    fn fit(&mut self, rows: &[Vec<f64>], targets: &[f64]) -> Result<()> {
        if rows.is_empty() {
            return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
        }
        if rows.len() != targets.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: rows.len(),
                got: targets.len(),
            });
        }
        if let Some(bad) = rows.iter().flatten().chain(targets).find(|v| !v.is_finite()) {
            return Err(ForecastError::Computation(format!(
                "non-finite training value {}",
                bad
            )));
        }

        let x = DenseMatrix::from_2d_vec(&rows.to_vec());
        let y = targets.to_vec();
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(self.n_trees)
            .with_seed(self.seed);
        let forest = RandomForestRegressor::fit(&x, &y, params)
            .map_err(|e| ForecastError::Computation(format!("random forest fit: {}", e)))?;

        self.forest = Some(forest);
        Ok(())
    }

    fn predict_row(&self, row: &[f64]) -> Result<f64> {
        let forest = self
            .forest
            .as_ref()
            .ok_or_else(|| ForecastError::State("regressor not fitted".to_string()))?;
        let x = DenseMatrix::from_2d_vec(&vec![row.to_vec()]);
        let out = forest
            .predict(&x)
            .map_err(|e| ForecastError::Computation(format!("random forest predict: {}", e)))?;
        out.first().copied().ok_or_else(|| {
            ForecastError::Computation("random forest returned no prediction".to_string())
        })
    }

    fn is_fitted(&self) -> bool {
        self.forest.is_some()
    }
}

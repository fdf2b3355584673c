//! Multi-model orchestration: fitting, prediction, ensembles and comparison.

mod comparison;
mod ensemble;
#[allow(clippy::module_inception)]
mod manager;

pub use comparison::{ComparisonEntry, ModelComparison};
pub use ensemble::{combine, EnsembleMethod, EnsembleResult};
pub use manager::{FitReport, ForecastManager, ManagerSummary};

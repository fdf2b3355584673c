//! Demand data tables and synthetic sample generation.

mod sample;
mod table;

pub use sample::{sample_demand, SampleConfig};
pub use table::{Column, DemandTable, CLIENT_COLUMN, PRODUCT_COLUMN};

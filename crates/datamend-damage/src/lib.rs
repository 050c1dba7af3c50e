//! Synthetic defect injection for Datamend.
//!
//! This crate consumes a clean dataset directory plus a damage plan and
//! produces a `_damaged` copy with seeded, reproducible defects: blanked
//! cells, duplicated rows, and format corruption.

pub mod corrupt;
pub mod engine;
pub mod errors;
pub mod model;
pub mod plan;

pub use engine::{DamageEngine, DamageResult};
pub use errors::DamageError;
pub use model::{DamageOptions, DamageReport, TableDamageReport};
pub use plan::{DamagePlan, DamageRates, PLAN_VERSION};

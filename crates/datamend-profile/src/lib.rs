//! Schema builder for Datamend.
//!
//! Scans a dataset directory of CSV tables and derives the JSON schema
//! artifacts: per-table statistics under `schema/tables/` and the
//! cross-table column catalog under `schema/columns/`.

pub mod builder;
pub mod errors;
pub mod model;
pub mod stats;

pub use builder::{ProfileResult, SchemaBuilder};
pub use errors::ProfileError;
pub use model::{ProfileOptions, ProfileReport, SkippedFile, TableSummary};

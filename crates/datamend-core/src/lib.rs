//! Core contracts and helpers for Datamend.
//!
//! This crate defines the canonical schema types, dataset I/O, and value
//! typing helpers shared across the pipeline stages and the CLI.

pub mod catalog;
pub mod dataset;
pub mod error;
pub mod schema;
pub mod validation;
pub mod values;

pub use catalog::{ColumnCatalog, ColumnOverlap};
pub use dataset::{Table, list_tables, read_table, write_table};
pub use error::{Error, Result};
pub use schema::{
    ColumnKind, ColumnProfile, DateStats, LengthStats, NumericStats, TableSchema, ValueCount,
    convention_primary_key,
};
pub use validation::validate_table_schema;

/// Current schema contract version for `schema/tables/*.json` artifacts.
pub const SCHEMA_VERSION: &str = "0.1";

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Per-table schema document written to `schema/tables/<table>.json`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TableSchema {
    /// Contract version for this schema format.
    pub schema_version: String,
    /// Table name (CSV file stem).
    pub table_name: String,
    /// Number of data rows observed.
    pub record_count: u64,
    /// Convention primary key (`<table>_id`) when such a column exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    /// Per-column statistics, keyed by column name.
    pub columns: BTreeMap<String, ColumnProfile>,
}

/// Statistics captured for one column during profiling.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ColumnProfile {
    pub total_values: u64,
    pub non_empty_values: u64,
    /// Percentage of non-empty values, rounded to 2 decimals.
    pub non_empty_percentage: f64,
    pub unique_values: u64,
    pub unique_values_percentage: f64,
    /// Values equal to `null`/`none` (case-insensitive) or empty.
    pub null_like_count: u64,
    /// Values consisting only of whitespace (but not empty).
    pub whitespace_only_count: u64,
    /// Top observed values, ordered by count descending then value ascending.
    pub most_common_values: Vec<ValueCount>,
    /// First distinct non-empty values, in first-seen order.
    pub sample_values: Vec<String>,
    pub length_stats: LengthStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_stats: Option<NumericStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_stats: Option<DateStats>,
    /// Inferred value kind for consistency scoring.
    pub kind: ColumnKind,
    /// Format rule derived from the inferred kind, when one applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub foreign_key: bool,
}

/// A value and how often it was observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValueCount {
    pub value: String,
    pub count: u64,
}

/// Length statistics over non-empty values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LengthStats {
    pub min: u64,
    pub max: u64,
    pub average: f64,
}

/// Numeric statistics over parseable values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NumericStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

/// Date statistics over parseable values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DateStats {
    /// Earliest observed date, ISO formatted.
    pub min_date: String,
    /// Latest observed date, ISO formatted.
    pub max_date: String,
    pub distinct_years: u64,
}

/// Inferred kind of a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Date,
    Text,
}

/// Convention primary-key column name for a table.
pub fn convention_primary_key(table: &str) -> String {
    format!("{}_id", table.to_lowercase())
}

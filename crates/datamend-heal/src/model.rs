use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Imputation strategy for numeric columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationStrategy {
    #[default]
    Mean,
    Median,
}

/// Options for the healing engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealOptions {
    /// Output directory override; defaults to `<dataset>_healed` with the
    /// `_damaged` suffix stripped when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
    #[serde(default)]
    pub numeric_imputation: ImputationStrategy,
}

/// Report for a healing run, written into the healed directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealReport {
    pub run_id: String,
    pub tables: Vec<TableHealReport>,
    pub cells_normalized_total: u64,
    pub cells_dropped_total: u64,
    pub cells_imputed_total: u64,
    pub duplicate_rows_removed_total: u64,
}

/// Per-table repair counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableHealReport {
    pub table: String,
    pub rows_in: u64,
    pub rows_out: u64,
    /// Cells rewritten into the expected format.
    pub cells_normalized: u64,
    /// Cells blanked because no normalization applied.
    pub cells_dropped: u64,
    /// Empty cells filled from column statistics.
    pub cells_imputed: u64,
    /// Empty cells with no usable statistic to impute from.
    pub cells_unimputable: u64,
    pub duplicate_rows_removed: u64,
}

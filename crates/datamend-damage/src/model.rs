use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options for the damage engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DamageOptions {
    /// Output directory override; defaults to `<dataset>_damaged`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
}

/// Report for a damage run, written into the damaged directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageReport {
    pub run_id: String,
    pub seed: u64,
    pub plan_hash: String,
    pub tables: Vec<TableDamageReport>,
    pub cells_blanked_total: u64,
    pub cells_corrupted_total: u64,
    pub rows_duplicated_total: u64,
}

/// Per-table defect counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDamageReport {
    pub table: String,
    pub rows_in: u64,
    pub rows_out: u64,
    pub cells_blanked: u64,
    pub cells_corrupted: u64,
    pub rows_duplicated: u64,
}

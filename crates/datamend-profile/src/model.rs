use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options for the schema builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileOptions {
    /// Directory where schema artifacts are written.
    pub schema_dir: PathBuf,
    /// How many top values to record per column.
    pub top_values: usize,
    /// How many distinct sample values to record per column.
    pub sample_values: usize,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            schema_dir: PathBuf::from("schema"),
            top_values: 5,
            sample_values: 10,
        }
    }
}

/// Report for a profiling run, written next to the schema artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileReport {
    pub run_id: String,
    pub dataset_dir: PathBuf,
    pub tables: Vec<TableSummary>,
    pub columns_cataloged: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFile>,
}

/// Summary of one profiled table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSummary {
    pub table: String,
    pub record_count: u64,
    pub columns: u64,
}

/// A file the builder could not read and skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

use serde::{Deserialize, Serialize};

/// Metrics contract version for quality evaluation.
pub const METRICS_VERSION: &str = "0.1";

/// Machine-readable metrics for one dataset evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub metrics_version: String,
    pub run_id: String,
    /// Dataset directory that was scored.
    pub dataset: String,
    /// Variant label (`original`, `damaged`, `healed`, ...).
    pub variant: String,
    pub schema_version: String,
    pub tables: Vec<TableQuality>,
    pub aggregate: AggregateQuality,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<WarningItem>,
    pub performance: PerformanceMetrics,
}

/// Scores for one table. All dimensions are percentages in [0, 100].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableQuality {
    pub table: String,
    pub rows_found: u64,
    /// Non-empty cells over total cells.
    pub completeness: f64,
    /// Type-conforming cells over non-empty cells in typed columns.
    pub consistency: f64,
    /// Distinct rows over total rows.
    pub uniqueness: f64,
    /// Regex-conforming cells over non-empty cells in regex columns.
    pub validity: f64,
    /// Mean of the four dimensions.
    pub score: f64,
    /// Distinct primary-key values over rows, when a convention key exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key_uniqueness: Option<f64>,
}

/// Unweighted means across all scored tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateQuality {
    pub tables_scored: u64,
    pub completeness: f64,
    pub consistency: f64,
    pub uniqueness: f64,
    pub validity: f64,
    pub score: f64,
}

/// Structured warning entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarningItem {
    pub code: String,
    pub path: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Phase timings for the evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub load_ms: u128,
    pub score_ms: u128,
    pub total_ms: u128,
}

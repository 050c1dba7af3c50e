use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::metrics::QualityMetrics;

/// Options for dataset evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateOptions {
    /// Variant label recorded in the metrics (`original`, `damaged`, ...).
    pub variant: String,
    /// Output directory; defaults to `quality/<variant>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
}

impl Default for EvaluateOptions {
    fn default() -> Self {
        Self {
            variant: "original".to_string(),
            out_dir: None,
        }
    }
}

/// Result of a dataset evaluation.
#[derive(Debug, Clone)]
pub struct EvaluationResult {
    pub out_dir: PathBuf,
    pub metrics_path: PathBuf,
    pub report_path: PathBuf,
    pub metrics: QualityMetrics,
    pub report: String,
}

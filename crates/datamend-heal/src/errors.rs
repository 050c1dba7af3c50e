use thiserror::Error;

/// Errors emitted by the healing engine.
#[derive(Debug, Error)]
pub enum HealError {
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    #[error("core error: {0}")]
    Core(#[from] datamend_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

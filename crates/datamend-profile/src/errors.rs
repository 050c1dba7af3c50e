use thiserror::Error;

/// Errors emitted by the schema builder.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("core error: {0}")]
    Core(#[from] datamend_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

use thiserror::Error;

/// Errors emitted by the damage injector.
#[derive(Debug, Error)]
pub enum DamageError {
    #[error("invalid plan: {0}")]
    InvalidPlan(String),
    #[error("core error: {0}")]
    Core(#[from] datamend_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

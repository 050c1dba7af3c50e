use thiserror::Error;

/// Core error type shared across Datamend crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem failure while reading or writing artifacts.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// CSV parse or serialization failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// The schema violates internal invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// The dataset directory or its files are unusable.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
}

/// Convenience alias for results returned by Datamend crates.
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for the CLI.

use feedscope_core::{ConfigError, FeedscopeError, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Feedscope(#[from] FeedscopeError),
    #[error("Failed to read report {source_name}: {reason}")]
    Report { source_name: String, reason: String },
    #[error("{0}")]
    Usage(String),
    #[error("Failed to initialise logging: {0}")]
    Telemetry(String),
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        Self::Feedscope(err.into())
    }
}

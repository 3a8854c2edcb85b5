//! Error types for feedscope operations
//!
//! Pointer resolution and cache lookups are total and never produce these
//! errors. They exist for the fallible edges: the storage backends (whose
//! failures the cache absorbs), the document fetch and configuration loading.

use thiserror::Error;

/// Storage backend errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Storage quota exceeded writing {key}: {needed} bytes over a limit of {limit}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    #[error("Storage backend error: {reason}")]
    Backend { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Document fetch errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Document at {url} is not valid JSON: {reason}")]
    InvalidJson { url: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or FEEDSCOPE_CONFIG)")]
    MissingConfigPath,

    #[error("Failed to read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to parse config: {reason}")]
    Parse { reason: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all feedscope errors.
#[derive(Debug, Clone, Error)]
pub enum FeedscopeError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for feedscope operations.
pub type FeedscopeResult<T> = Result<T, FeedscopeError>;

// =============================================================================
// TESTS
// =============================================================================

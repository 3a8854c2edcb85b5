//! Configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

/// Default cache entry lifetime (10 minutes).
pub const DEFAULT_CACHE_TTL_MS: u64 = 600_000;

/// Default namespace for cache keys in the backing store.
pub const DEFAULT_CACHE_PREFIX: &str = "feedscope:gbfs-cache:";

/// Document cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Maximum entry age in milliseconds.
    pub ttl_ms: u64,
    /// Prefix prepended to every source URL to form the store key.
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_CACHE_TTL_MS,
            key_prefix: DEFAULT_CACHE_PREFIX.to_string(),
        }
    }
}

impl CacheConfig {
    /// Create from environment variables with fallback to defaults.
    ///
    /// Environment variables:
    /// - `FEEDSCOPE_CACHE_TTL_MS`: Entry lifetime in milliseconds (default: 600000)
    /// - `FEEDSCOPE_CACHE_PREFIX`: Store key namespace (default: "feedscope:gbfs-cache:")
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            ttl_ms: std::env::var("FEEDSCOPE_CACHE_TTL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.ttl_ms),
            key_prefix: std::env::var("FEEDSCOPE_CACHE_PREFIX")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.key_prefix),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// Namespaced store key for a source URL.
    pub fn key_for(&self, url: &str) -> String {
        format!("{}{}", self.key_prefix, url)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ttl_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cache.ttl_ms".to_string(),
                value: self.ttl_ms.to_string(),
                reason: "must be > 0".to_string(),
            });
        }
        if i64::try_from(self.ttl_ms).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "cache.ttl_ms".to_string(),
                value: self.ttl_ms.to_string(),
                reason: "must fit in a signed 64-bit millisecond count".to_string(),
            });
        }
        if self.key_prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "cache.key_prefix".to_string(),
                value: String::new(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Bounds for rendered error excerpts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExcerptConfig {
    /// Maximum number of lines in an excerpt.
    pub max_lines: usize,
    /// Lines longer than this are clipped.
    pub max_line_chars: usize,
}

impl Default for ExcerptConfig {
    fn default() -> Self {
        Self {
            max_lines: 40,
            max_line_chars: 160,
        }
    }
}

impl ExcerptConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_lines == 0 {
            return Err(ConfigError::InvalidValue {
                field: "excerpt.max_lines".to_string(),
                value: "0".to_string(),
                reason: "must be > 0".to_string(),
            });
        }
        if self.max_line_chars < 8 {
            return Err(ConfigError::InvalidValue {
                field: "excerpt.max_line_chars".to_string(),
                value: self.max_line_chars.to_string(),
                reason: "must be >= 8".to_string(),
            });
        }
        Ok(())
    }
}

/// Document fetch settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    pub request_timeout_ms: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 15_000,
            user_agent: concat!("feedscope/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fetch.request_timeout_ms".to_string(),
                value: "0".to_string(),
                reason: "must be > 0".to_string(),
            });
        }
        Ok(())
    }
}

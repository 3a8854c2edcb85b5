//! Configuration loading for the feedscope binary.
//!
//! Every section is optional in the TOML file and falls back to its
//! defaults; unknown fields are rejected.

use feedscope_core::{CacheConfig, ConfigError, ExcerptConfig, FetchConfig};
use feedscope_storage::MAX_MAP_SIZE_MB;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "FEEDSCOPE_CONFIG";

/// Directory under the platform cache dir used when `store.path` is unset.
pub const STORE_DIR_NAME: &str = "feedscope";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedscopeConfig {
    pub cache: CacheConfig,
    pub excerpt: ExcerptConfig,
    pub fetch: FetchConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local; nothing survives between runs.
    Memory,
    #[default]
    Lmdb,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// LMDB environment directory. Defaults to `feedscope` under the
    /// platform cache directory.
    pub path: Option<PathBuf>,
    pub max_size_mb: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Lmdb,
            path: None,
            max_size_mb: 64,
        }
    }
}

impl StoreConfig {
    /// Where the LMDB environment lives: the configured path, else the
    /// platform cache directory.
    pub fn resolved_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        default_store_path().ok_or_else(|| ConfigError::InvalidValue {
            field: "store.path".to_string(),
            value: String::new(),
            reason: "no platform cache directory; set store.path".to_string(),
        })
    }
}

pub fn default_store_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(STORE_DIR_NAME))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, overridden by `RUST_LOG`.
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl FeedscopeConfig {
    /// Load from `path`, then `FEEDSCOPE_CONFIG`, else from the environment
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if path.is_some_and(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::MissingConfigPath);
        }
        let path = path.map(Path::to_path_buf).or_else(config_path_from_env);
        let config = match path {
            Some(path) => Self::from_path(&path)?,
            None => Self::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults, with the cache section read from `FEEDSCOPE_CACHE_*`.
    pub fn from_env() -> Self {
        Self {
            cache: CacheConfig::from_env(),
            ..Self::default()
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cache.validate()?;
        self.excerpt.validate()?;
        self.fetch.validate()?;
        if self.store.backend == StoreBackend::Lmdb {
            if self.store.path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    field: "store.path".to_string(),
                    value: String::new(),
                    reason: "must not be empty".to_string(),
                });
            }
            if self.store.max_size_mb == 0 || self.store.max_size_mb > MAX_MAP_SIZE_MB {
                return Err(ConfigError::InvalidValue {
                    field: "store.max_size_mb".to_string(),
                    value: self.store.max_size_mb.to_string(),
                    reason: format!("must be in 1..={}", MAX_MAP_SIZE_MB),
                });
            }
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "logging.filter".to_string(),
                value: String::new(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_PATH_ENV)
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

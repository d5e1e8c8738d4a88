//! Application configuration with layered loading.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//!
//! 1. **Compiled defaults**: Hardcoded in struct `Default` implementations
//! 2. **Config file**: TOML file specified by `HOPPER_CONFIG` env var
//! 3. **Environment variables**: `HOPPER__*` env vars override specific fields
//!
//! # Configuration Sections
//!
//! - [`SourcesConfig`]: where difficulty and bulk pool stats are fetched from
//! - [`CacheConfig`]: TTLs and the per-fetch timeout
//! - [`AccountsConfig`]: location of the account file
//! - [`LoggingConfig`]: Log level and format
//!
//! # Example
//!
//! ```toml
//! [sources]
//! difficulty_url = "http://blockexplorer.com/q/getdifficulty"
//! stats_url = "http://localhost:8000/pool_stats.json"
//!
//! [cache]
//! stats_ttl_seconds = 60
//!
//! [accounts]
//! path = "/etc/hopper/pools.conf"
//! ```

use crate::cache::CacheConfig;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// HTTP endpoints for the external data the utility model reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Plain-text endpoint returning the current network difficulty.
    #[serde(default = "default_difficulty_url")]
    pub difficulty_url: String,

    /// JSON endpoint returning `rates` and `recent_blocks` for every pool.
    #[serde(default = "default_stats_url")]
    pub stats_url: String,
}

fn default_difficulty_url() -> String {
    "http://blockexplorer.com/q/getdifficulty".to_string()
}

fn default_stats_url() -> String {
    "http://localhost:8000/pool_stats.json".to_string()
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self { difficulty_url: default_difficulty_url(), stats_url: default_stats_url() }
    }
}

/// Account file settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountsConfig {
    /// Path of the whitespace-separated account file. Defaults to `pools.conf`.
    #[serde(default = "default_accounts_path")]
    pub path: PathBuf,
}

fn default_accounts_path() -> PathBuf {
    PathBuf::from("pools.conf")
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self { path: default_accounts_path() }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (`trace`, `debug`, `info`, `warn`, `error`) or a full filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: `"pretty"` or `"json"`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), format: default_log_format() }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub accounts: AccountsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads configuration from a TOML file with environment variable overrides.
    ///
    /// A missing file is not an error; defaults apply. Use `__` as a separator for nested
    /// fields (e.g., `HOPPER__CACHE__STATS_TTL_SECONDS=60`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be parsed or a value has the wrong type.
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_builder = Config::builder()
            .set_default("sources.difficulty_url", default_difficulty_url())?
            .set_default("sources.stats_url", default_stats_url())?
            .set_default("cache.difficulty_ttl_seconds", 3600)?
            .set_default("cache.stats_ttl_seconds", 120)?
            .set_default("cache.fetch_timeout_seconds", 10)?
            .set_default("accounts.path", "pools.conf")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name(&config_path.as_ref().to_string_lossy()).required(false))
            .add_source(Environment::with_prefix("HOPPER").separator("__"))
            .build()?;

        config_builder.try_deserialize()
    }

    /// Loads configuration from `config/config.toml` with fallback to defaults.
    ///
    /// The config file path can be overridden using the `HOPPER_CONFIG` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration cannot be loaded or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("HOPPER_CONFIG").unwrap_or_else(|_| "config/config.toml".to_string());
        Self::from_file(&config_path)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a descriptive error string if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        let urls = [
            ("difficulty_url", &self.sources.difficulty_url),
            ("stats_url", &self.sources.stats_url),
        ];
        for (name, url) in urls {
            if url.is_empty() {
                return Err(format!("Empty URL for sources.{name}"));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!("Invalid URL for sources.{name}: {url}"));
            }
        }

        if self.cache.difficulty_ttl_seconds == 0 {
            return Err("Difficulty TTL must be greater than 0".to_string());
        }

        if self.cache.stats_ttl_seconds == 0 {
            return Err("Stats TTL must be greater than 0".to_string());
        }

        if self.cache.fetch_timeout_seconds == 0 {
            return Err("Fetch timeout must be greater than 0".to_string());
        }

        if self.accounts.path.as_os_str().is_empty() {
            return Err("Account file path must not be empty".to_string());
        }

        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err("Logging format must be 'json' or 'pretty'".to_string());
        }

        Ok(())
    }
}

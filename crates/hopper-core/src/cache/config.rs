use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Expiry and timeout settings for the external data cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a fetched difficulty stays fresh (default: 3600)
    #[serde(default = "default_difficulty_ttl_seconds")]
    pub difficulty_ttl_seconds: u64,

    /// Seconds a bulk stats snapshot stays fresh (default: 120)
    #[serde(default = "default_stats_ttl_seconds")]
    pub stats_ttl_seconds: u64,

    /// Upper bound for a single fetch, including retries (default: 10)
    #[serde(default = "default_fetch_timeout_seconds")]
    pub fetch_timeout_seconds: u64,
}

fn default_difficulty_ttl_seconds() -> u64 {
    3600
}
fn default_stats_ttl_seconds() -> u64 {
    120
}
fn default_fetch_timeout_seconds() -> u64 {
    10
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { difficulty_ttl_seconds: 3600, stats_ttl_seconds: 120, fetch_timeout_seconds: 10 }
    }
}

impl CacheConfig {
    #[must_use]
    pub fn difficulty_ttl(&self) -> Duration {
        Duration::from_secs(self.difficulty_ttl_seconds)
    }

    #[must_use]
    pub fn stats_ttl(&self) -> Duration {
        Duration::from_secs(self.stats_ttl_seconds)
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }
}

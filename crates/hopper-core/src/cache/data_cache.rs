//! Owner of the difficulty and bulk pool-stats snapshots.
//!
//! One `DataCache` holds exactly one difficulty cell and one bulk-stats cell. Pool stats are
//! refreshed in bulk: scoring several pools inside one TTL window costs a single fetch, no
//! matter how many pools ask.

use std::sync::Arc;

use crate::{
    cache::{CacheConfig, RefreshSlot},
    clock::{Clock, SystemClock},
    source::StatsSource,
    stats::{PoolStats, StatsSnapshot},
};

/// TTL-bounded cache of the external facts the utility model reads.
///
/// Both cells start empty (difficulty `0.0`, no pool stats) and are fetched lazily on first
/// use. Fetch failures are logged and swallowed; readers always get the last good value.
pub struct DataCache {
    source: Arc<dyn StatsSource>,
    clock: Arc<dyn Clock>,
    difficulty: RefreshSlot<f64>,
    stats: RefreshSlot<StatsSnapshot>,
}

impl DataCache {
    /// Creates a cache reading the wall clock.
    #[must_use]
    pub fn new(config: &CacheConfig, source: Arc<dyn StatsSource>) -> Self {
        Self::with_clock(config, source, Arc::new(SystemClock))
    }

    /// Creates a cache with an explicit time source.
    #[must_use]
    pub fn with_clock(
        config: &CacheConfig,
        source: Arc<dyn StatsSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            clock,
            difficulty: RefreshSlot::new(
                "difficulty",
                config.difficulty_ttl(),
                config.fetch_timeout(),
                0.0,
            ),
            stats: RefreshSlot::new(
                "pool_stats",
                config.stats_ttl(),
                config.fetch_timeout(),
                StatsSnapshot::default(),
            ),
        }
    }

    /// Current unix time according to the cache's clock.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Returns the network difficulty, refreshing it if older than its TTL.
    ///
    /// Returns `0.0` if no fetch has ever succeeded.
    pub async fn get_difficulty(&self) -> f64 {
        let source = Arc::clone(&self.source);
        *self.difficulty.get(self.now(), || async move { source.fetch_difficulty().await }).await
    }

    /// Returns the latest stats for `pool`, refreshing the bulk snapshot if it is stale.
    ///
    /// Pools missing from the last successful payload get empty stats.
    pub async fn get_stats(&self, pool: &str) -> PoolStats {
        self.snapshot().await.get(pool)
    }

    /// Returns the whole bulk snapshot, refreshing it if stale.
    pub async fn snapshot(&self) -> Arc<StatsSnapshot> {
        let source = Arc::clone(&self.source);
        self.stats.get(self.now(), || async move { source.fetch_pool_stats().await }).await
    }

    /// Last cached difficulty, without triggering a refresh.
    #[must_use]
    pub fn cached_difficulty(&self) -> f64 {
        *self.difficulty.peek()
    }

    /// Unix time of the last successful stats fetch.
    #[must_use]
    pub fn stats_fetched_at(&self) -> Option<f64> {
        self.stats.fetched_at()
    }

    /// Unix time of the last successful difficulty fetch.
    #[must_use]
    pub fn difficulty_fetched_at(&self) -> Option<f64> {
        self.difficulty.fetched_at()
    }
}

//! Dynamic per-pool statistics as delivered by the bulk stats source.

use std::collections::HashMap;

/// One recently completed round together with the caller's share of its reward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundShare {
    /// Unix timestamp (seconds) at which the round ended.
    pub timestamp: f64,
    /// Estimated fraction of the round's reward attributable to the caller.
    pub probability: f64,
}

/// Snapshot of a single pool's live statistics.
///
/// `rounds` is always sorted by timestamp ascending so that scoring is reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolStats {
    /// Observed aggregate hash rate in work units per second.
    pub rate: f64,
    pub rounds: Vec<RoundShare>,
}

impl PoolStats {
    /// Builds stats, sorting the round history by timestamp.
    #[must_use]
    pub fn new(rate: f64, mut rounds: Vec<RoundShare>) -> Self {
        rounds.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        Self { rate, rounds }
    }

    /// Observed rate with negative or non-finite values treated as zero.
    #[must_use]
    pub fn sanitized_rate(&self) -> f64 {
        if self.rate.is_finite() && self.rate > 0.0 {
            self.rate
        } else {
            0.0
        }
    }
}

/// Statistics for every pool covered by one bulk fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSnapshot {
    pools: HashMap<String, PoolStats>,
}

impl StatsSnapshot {
    #[must_use]
    pub fn new(pools: HashMap<String, PoolStats>) -> Self {
        Self { pools }
    }

    /// Returns the stats for `pool`, or empty stats if the last payload did not mention it.
    #[must_use]
    pub fn get(&self, pool: &str) -> PoolStats {
        self.pools.get(pool).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

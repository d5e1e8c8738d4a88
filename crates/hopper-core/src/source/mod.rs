//! External statistics sources.
//!
//! The ranking engine consumes two facts from the outside world: the global network
//! difficulty and a bulk mapping of per-pool statistics. [`StatsSource`] is the seam between
//! the cache and whatever provides those facts; [`HttpStatsSource`] is the production
//! implementation, tests substitute their own.

pub mod errors;
pub mod http_client;
pub mod payload;

pub use errors::FetchError;
pub use http_client::{HttpClient, HttpClientConfig};

use async_trait::async_trait;

use crate::stats::StatsSnapshot;

/// Provider of difficulty and bulk pool statistics.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Fetches the current global difficulty.
    async fn fetch_difficulty(&self) -> Result<f64, FetchError>;

    /// Fetches statistics for every pool the source knows about in one call.
    async fn fetch_pool_stats(&self) -> Result<StatsSnapshot, FetchError>;
}

/// [`StatsSource`] backed by two HTTP endpoints.
pub struct HttpStatsSource {
    client: HttpClient,
    difficulty_url: String,
    stats_url: String,
}

impl HttpStatsSource {
    #[must_use]
    pub fn new(client: HttpClient, difficulty_url: String, stats_url: String) -> Self {
        Self { client, difficulty_url, stats_url }
    }
}

#[async_trait]
impl StatsSource for HttpStatsSource {
    async fn fetch_difficulty(&self) -> Result<f64, FetchError> {
        let body = self.client.get_text(&self.difficulty_url).await?;
        payload::parse_difficulty(&body)
    }

    async fn fetch_pool_stats(&self) -> Result<StatsSnapshot, FetchError> {
        let body = self.client.get_text(&self.stats_url).await?;
        payload::parse_bulk_stats(&body)
    }
}

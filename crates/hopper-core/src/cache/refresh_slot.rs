//! Time-bounded value with single-flight refresh.
//!
//! A [`RefreshSlot`] holds the last successfully fetched value and the time it was fetched.
//! Reads are lock-free through `ArcSwap`. When a read finds the value older than the TTL it
//! tries to refresh it, and at most one refresh runs at a time:
//!
//! ```text
//!  get(now)
//!     │
//!     ▼
//!  stale? ── no ──► current value
//!     │ yes
//!     ▼
//!  remember attempt counter, wait for refresh lock
//!     │
//!     ▼
//!  counter moved or value fresh? ── yes ──► current value (joined someone else's refresh)
//!     │ no
//!     ▼
//!  fetch under timeout ── ok ──► store value, fetched_at = now
//!     │ error / timeout
//!     ▼
//!  keep old value, fetched_at unchanged (next call retries)
//! ```
//!
//! Callers that queue behind an in-flight refresh share its outcome instead of issuing a
//! fetch of their own, even when that refresh failed.

use arc_swap::ArcSwap;
use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::source::FetchError;

struct Timed<T> {
    value: Arc<T>,
    /// Unix seconds of the last successful fetch (`None` = never fetched)
    fetched_at: Option<f64>,
}

/// TTL-bounded cache cell that coalesces concurrent refreshes.
pub struct RefreshSlot<T> {
    name: &'static str,
    ttl: Duration,
    fetch_timeout: Duration,
    current: ArcSwap<Timed<T>>,
    refresh_lock: Mutex<()>,
    /// Completed refresh attempts, successful or not
    attempts: AtomicU64,
}

impl<T: Send + Sync> RefreshSlot<T> {
    /// Creates a slot holding `initial` that is considered stale until the first fetch succeeds.
    #[must_use]
    pub fn new(name: &'static str, ttl: Duration, fetch_timeout: Duration, initial: T) -> Self {
        Self {
            name,
            ttl,
            fetch_timeout,
            current: ArcSwap::from_pointee(Timed { value: Arc::new(initial), fetched_at: None }),
            refresh_lock: Mutex::new(()),
            attempts: AtomicU64::new(0),
        }
    }

    /// Returns the cached value without refreshing.
    #[must_use]
    pub fn peek(&self) -> Arc<T> {
        Arc::clone(&self.current.load().value)
    }

    /// Unix seconds of the last successful fetch.
    #[must_use]
    pub fn fetched_at(&self) -> Option<f64> {
        self.current.load().fetched_at
    }

    /// Number of refresh attempts that have completed.
    #[must_use]
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Acquire)
    }

    /// Returns `true` if the value has never been fetched or is older than the TTL at `now`.
    #[must_use]
    pub fn is_stale(&self, now: f64) -> bool {
        match self.fetched_at() {
            None => true,
            Some(fetched_at) => now - fetched_at > self.ttl.as_secs_f64(),
        }
    }

    /// Returns the cached value, refreshing it first if it is stale at `now`.
    ///
    /// Never fails: a fetch error or timeout leaves the previous value in place.
    pub async fn get<F, Fut>(&self, now: f64, fetch: F) -> Arc<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        // Snapshot before the staleness check so a refresh finishing in between is still seen.
        let seen_attempts = self.attempts.load(Ordering::Acquire);
        if !self.is_stale(now) {
            return self.peek();
        }

        let _guard = self.refresh_lock.lock().await;

        if self.attempts.load(Ordering::Acquire) != seen_attempts || !self.is_stale(now) {
            return self.peek();
        }

        match tokio::time::timeout(self.fetch_timeout, fetch()).await {
            Ok(Ok(value)) => {
                let timed = Timed { value: Arc::new(value), fetched_at: Some(now) };
                self.current.store(Arc::new(timed));
                debug!(cache = self.name, ttl_secs = self.ttl.as_secs(), "cache refreshed");
            }
            Ok(Err(e)) => {
                warn!(cache = self.name, error = %e, "refresh failed, keeping previous value");
            }
            Err(_) => {
                warn!(
                    cache = self.name,
                    timeout_ms = u64::try_from(self.fetch_timeout.as_millis()).unwrap_or(u64::MAX),
                    "refresh timed out, keeping previous value"
                );
            }
        }

        self.attempts.fetch_add(1, Ordering::Release);
        self.peek()
    }
}

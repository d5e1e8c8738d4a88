//! # Hopper Core
//!
//! Ranking engine that decides which mining pool a client should work for right now.
//!
//! This crate provides:
//!
//! - **[`pools`]**: the static pool catalog, the caller's account file, and the
//!   [`PoolSelector`](pools::PoolSelector) that ranks configured pools and flattens them into
//!   an ordered endpoint list.
//!
//! - **[`scoring`]**: the utility model. Flat pools score by fee alone; proportional pools are
//!   scored from their recent round history with an adaptive quadrature of the marginal share
//!   value.
//!
//! - **[`cache`]**: TTL-bounded, single-flight caching of the network difficulty and the bulk
//!   pool statistics. Failed fetches keep the last good value.
//!
//! - **[`source`]**: the [`StatsSource`](source::StatsSource) seam and its HTTP implementation.
//!
//! - **[`config`]**: layered application configuration.
//!
//! ## Ranking Flow
//!
//! ```text
//! PoolSelector::rank()
//!       │
//!       ▼
//! ┌──────────────┐   stale?   ┌───────────────┐
//! │  DataCache   │ ─────────► │  StatsSource  │ (one fetch per TTL window)
//! └──────┬───────┘            └───────────────┘
//!        │ difficulty + snapshot
//!        ▼
//! ┌───────────────────────┐
//! │ ScoringVariant::score │ per configured pool
//! └──────┬────────────────┘
//!        │
//!        ▼
//! sort by (utility, priority) desc ──► flatten_endpoints()
//! ```

pub mod cache;
pub mod clock;
pub mod config;
pub mod pools;
pub mod scoring;
pub mod source;
pub mod stats;

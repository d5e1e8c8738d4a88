//! Time-bounded caching of external statistics.
//!
//! - `config`: TTL and timeout settings
//! - `data_cache`: [`DataCache`], the owner of the difficulty and bulk-stats snapshots
//! - `refresh_slot`: [`RefreshSlot`], the TTL cell with single-flight refresh both caches use

pub mod config;
pub mod data_cache;
pub mod refresh_slot;

pub use config::CacheConfig;
pub use data_cache::DataCache;
pub use refresh_slot::RefreshSlot;

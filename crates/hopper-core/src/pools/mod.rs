//! Configured pools and their ranking.
//!
//! - `catalog`: static descriptors for every supported pool
//! - `accounts`: the caller's account file
//! - `selector`: [`PoolSelector`], which scores configured pools and orders their endpoints

pub mod accounts;
pub mod catalog;
pub mod selector;

pub use accounts::{load_accounts_file, parse_accounts, Account, AccountsError};
pub use catalog::{lookup, PoolDescriptor, ScoringVariant, CATALOG};
pub use selector::{flatten_endpoints, ConfiguredPool, EndpointEntry, PoolSelector, RankedPool};

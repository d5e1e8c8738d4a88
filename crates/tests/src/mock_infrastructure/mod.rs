//! Mock Infrastructure for Testing the Hopper Ranking Engine
//!
//! Stands up the two external HTTP sources without real network access.
//!
//! ## Components
//!
//! - `StatsMockBuilder`: wraps mockito to serve the difficulty and bulk-stats endpoints
//! - Test helpers for payloads, account files and pre-wired caches
//!
//! ## Usage
//!
//! ```ignore
//! use tests::mock_infrastructure::{StatsMockBuilder, stats_payload};
//!
//! let mut mock = StatsMockBuilder::new().await;
//! mock.mock_difficulty("1000", 1);
//! mock.mock_stats(&stats_payload(&[("mtred", 0.0, &[(now - 100.0, 1.0)])]), 1);
//! ```

pub mod stats_mock;

pub use stats_mock::StatsMockBuilder;
pub use test_helpers::*;

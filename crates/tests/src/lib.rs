//! Integration Tests for the Hopper Ranking Engine
//!
//! This crate contains various test modules:
//!
//! - `source_tests`: HTTP sources against a mock server (parsing, retries, error mapping)
//! - `cache_tests`: TTL expiry, stale-on-failure and refresh coalescing over real HTTP
//! - `ranking_tests`: account file to flattened endpoint list, end to end
//! - `mock_infrastructure`: Reusable mock server and fixtures
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --package tests
//! ```


#[cfg(test)]
mod cache_tests;

#[cfg(test)]
mod ranking_tests;

/// Mock infrastructure for testing
pub mod mock_infrastructure;

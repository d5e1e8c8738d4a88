//! Mock server for the difficulty and bulk-stats sources.

use mockito::{Mock, Server, ServerGuard};
use serde_json::Value;

const DIFFICULTY_PATH: &str = "/q/getdifficulty";
const STATS_PATH: &str = "/pool_stats.json";

/// Builder for the two HTTP endpoints the data cache reads.
///
/// Every mock is created with an expected hit count; [`assert_all`](Self::assert_all)
/// verifies them.
pub struct StatsMockBuilder {
    server: ServerGuard,
    mocks: Vec<Mock>,
}

impl StatsMockBuilder {
    /// Creates a new builder with a fresh mockito server.
    pub async fn new() -> Self {
        Self { server: Server::new_async().await, mocks: Vec::new() }
    }

    #[must_use]
    pub fn difficulty_url(&self) -> String {
        format!("{}{DIFFICULTY_PATH}", self.server.url())
    }

    #[must_use]
    pub fn stats_url(&self) -> String {
        format!("{}{STATS_PATH}", self.server.url())
    }

    /// Serves `body` as the plain-text difficulty, expecting exactly `hits` requests.
    pub fn mock_difficulty(&mut self, body: &str, hits: usize) -> &mut Self {
        let mock = self
            .server
            .mock("GET", DIFFICULTY_PATH)
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body(body)
            .expect(hits)
            .create();

        self.mocks.push(mock);
        self
    }

    /// Serves `payload` as the bulk stats JSON, expecting exactly `hits` requests.
    pub fn mock_stats(&mut self, payload: &Value, hits: usize) -> &mut Self {
        let mock = self
            .server
            .mock("GET", STATS_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(payload.to_string())
            .expect(hits)
            .create();

        self.mocks.push(mock);
        self
    }

    /// Serves the raw `body` on the stats path, for malformed payloads.
    pub fn mock_stats_body(&mut self, body: &str, hits: usize) -> &mut Self {
        let mock = self
            .server
            .mock("GET", STATS_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create();

        self.mocks.push(mock);
        self
    }

    /// Fails the difficulty endpoint with `status`, expecting exactly `hits` requests.
    pub fn fail_difficulty(&mut self, status: usize, hits: usize) -> &mut Self {
        self.mock_failure(DIFFICULTY_PATH, status, hits)
    }

    /// Fails the stats endpoint with `status`, expecting exactly `hits` requests.
    pub fn fail_stats(&mut self, status: usize, hits: usize) -> &mut Self {
        self.mock_failure(STATS_PATH, status, hits)
    }

    fn mock_failure(&mut self, path: &str, status: usize, hits: usize) -> &mut Self {
        let mock = self
            .server
            .mock("GET", path)
            .with_status(status)
            .with_body("upstream unavailable")
            .expect(hits)
            .create();

        self.mocks.push(mock);
        self
    }

    /// Asserts every registered mock saw its expected number of hits.
    pub fn assert_all(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }

    /// Verifies and then removes every mock, so new ones can take over the same paths.
    pub fn assert_and_reset(&mut self) {
        self.assert_all();
        self.mocks.clear();
        self.server.reset();
    }
}

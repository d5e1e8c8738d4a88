use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::source::FetchError;

/// Configuration for HTTP client timeouts and retry behavior.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// TCP connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Upper bound for a single request attempt in milliseconds
    pub request_timeout_ms: u64,
    /// Retries after the first attempt for connection errors and 5xx responses
    pub max_retries: u32,
    /// Base backoff in milliseconds, doubled per retry
    pub retry_backoff_ms: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 5_000,
            request_timeout_ms: 10_000,
            max_retries: 2,
            retry_backoff_ms: 100,
        }
    }
}

/// HTTP client used for the difficulty and bulk-stats endpoints.
///
/// Every request is bounded by the configured timeout, so a stalled endpoint degrades to a
/// [`FetchError::Timeout`] instead of blocking the caller.
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Creates a new HTTP client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to build.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Sanitizes network errors so endpoint internals do not leak into logs.
    fn sanitize_network_error(error: &reqwest::Error) -> String {
        if error.is_connect() {
            "connection refused or unreachable".to_string()
        } else if error.is_timeout() {
            "connection timed out".to_string()
        } else if error.is_request() {
            "request failed".to_string()
        } else if error.is_body() {
            "response body error".to_string()
        } else if error.is_decode() {
            "response decode error".to_string()
        } else if error.is_redirect() {
            "too many redirects".to_string()
        } else {
            "network error".to_string()
        }
    }

    /// Creates a new HTTP client with the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to build.
    pub fn with_config(config: HttpClientConfig) -> Result<Self, FetchError> {
        let client = ClientBuilder::new()
            .pool_idle_timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::limited(3))
            .user_agent(concat!("hopper/", env!("CARGO_PKG_VERSION")))
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "failed to build http client");
                FetchError::ConnectionFailed(format!("HTTP client build failed: {e}"))
            })?;

        Ok(Self { client, config })
    }

    /// Sends an HTTP GET request and returns the response body as text.
    ///
    /// Connection errors and 5xx responses are retried up to `max_retries` times.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Timeout`] if the request times out
    /// - [`FetchError::HttpError`] for non-success HTTP status codes
    /// - [`FetchError::ConnectionFailed`] for network-related failures
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let mut retries = 0;

        loop {
            let result = self.client.get(url).send().await;

            match result {
                Ok(response) => {
                    if response.status().is_success() {
                        tracing::trace!(url = url, "http request completed");
                        return response.text().await.map_err(FetchError::Network);
                    } else if response.status().is_server_error() &&
                        retries < self.config.max_retries
                    {
                        retries += 1;
                        self.backoff(retries).await;
                        continue;
                    }

                    let status = response.status().as_u16();
                    let raw_text = response.text().await.unwrap_or_default();
                    let sanitized_text = if raw_text.len() > 256 {
                        let cut =
                            (0..=256).rev().find(|i| raw_text.is_char_boundary(*i)).unwrap_or(0);
                        format!("{}... (truncated)", &raw_text[..cut])
                    } else {
                        raw_text
                    };
                    tracing::trace!(url = url, status = status, "http request failed");
                    return Err(FetchError::HttpError(status, sanitized_text));
                }
                Err(e) if e.is_timeout() => {
                    tracing::trace!(url = url, "http request timed out");
                    return Err(FetchError::Timeout);
                }
                Err(_e) if retries < self.config.max_retries => {
                    retries += 1;
                    self.backoff(retries).await;
                }
                Err(e) => {
                    tracing::trace!(url = url, "http request error");
                    return Err(FetchError::ConnectionFailed(Self::sanitize_network_error(&e)));
                }
            }
        }
    }

    async fn backoff(&self, attempt: u32) {
        tokio::time::sleep(self.backoff_delay(attempt)).await;
    }

    /// `retry_backoff_ms · 2^attempt`, saturating instead of overflowing.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(self.config.retry_backoff_ms.saturating_mul(factor))
    }
}

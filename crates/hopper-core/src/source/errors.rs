use thiserror::Error;

/// Errors that can occur when fetching difficulty or pool statistics.
///
/// Every variant is recovered locally by the cache, which keeps serving its previous
/// snapshot. They are never surfaced to callers of the ranking API.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FetchError {
    /// Fetch exceeded the configured timeout duration.
    #[error("Request timeout")]
    Timeout,

    /// Failed to establish a connection to the stats endpoint.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP-level error occurred (non-2xx status code).
    ///
    /// First field is the HTTP status code, second is the (truncated) response body.
    #[error("HTTP error: {0}")]
    HttpError(u16, String),

    /// Network-level error from the underlying HTTP client.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body could not be parsed or held out-of-range values.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    /// Returns `true` if retrying the same request later may succeed.
    ///
    /// Malformed payloads and 4xx responses are not expected to fix themselves within a
    /// retry loop, so only they are classified as permanent.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::ConnectionFailed(_) | Self::Network(_) => true,
            Self::HttpError(status, _) => *status >= 500 || *status == 429,
            Self::InvalidResponse(_) => false,
        }
    }
}

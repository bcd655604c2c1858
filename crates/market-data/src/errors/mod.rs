//! Error types for the market data crate.
//!
//! The `Display` text of every variant is meant to be shown to end users as
//! the reason a metric could not be fetched, so messages stay short and
//! self-contained.

use thiserror::Error;

/// Maximum number of response body bytes echoed back in an HTTP status error.
pub const MAX_ERROR_BODY_LEN: usize = 200;

/// Errors that can occur while fetching a ranked list from a provider.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The request could not be built (bad URL, invalid header value).
    #[error("Failed to create request: {0}")]
    InvalidRequest(String),

    /// The request to the provider timed out.
    #[error("Request timed out after {timeout_secs}s: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
        /// The per-request timeout that elapsed
        timeout_secs: u64,
    },

    /// Transport-level failure (DNS, connection refused, TLS).
    #[error("Failed to fetch data: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("API returned status {status}: {body}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Leading part of the response body
        body: String,
    },

    /// The provider rejected our credential (HTTP 401).
    #[error("Unauthorized: {provider} rejected the API key")]
    Unauthorized {
        /// The provider that rejected the request
        provider: String,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The response body could not be read.
    #[error("Failed to read response: {0}")]
    ReadBody(String),

    /// The response body was not the JSON shape we expect.
    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The provider returned an empty list.
    #[error("No data returned from API")]
    NoData,
}

impl MarketDataError {
    /// Builds an [`MarketDataError::HttpStatus`] keeping at most
    /// [`MAX_ERROR_BODY_LEN`] bytes of the body, cut on a char boundary.
    pub fn http_status(status: u16, body: &str) -> Self {
        let mut end = body.len().min(MAX_ERROR_BODY_LEN);
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        Self::HttpStatus {
            status,
            body: body[..end].to_string(),
        }
    }

    /// Whether the failure came from the request deadline rather than the provider.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

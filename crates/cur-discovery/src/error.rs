//! Discovery error types.

use thiserror::Error;

/// Errors from one query against a scholarly index.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// HTTP transport error (DNS, TLS, connect, read timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The index returned a non-success status or an error document.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The index returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The response body did not match the expected feed or JSON shape.
    #[error("parse error: {0}")]
    Parse(String),
}

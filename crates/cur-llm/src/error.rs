//! Language model error types.

use thiserror::Error;

/// Errors that can occur when calling a language model.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The model returned no content, or refused.
    #[error("empty response: {0}")]
    EmptyResponse(String),

    /// The content was not valid JSON or did not deserialize.
    #[error("parse error: {0}")]
    Parse(String),

    /// The content parsed but violated the requested schema.
    #[error("schema violation: {}", errors.join("; "))]
    SchemaViolation { errors: Vec<String> },

    /// No API key is configured.
    #[error("language model is not configured (no API key)")]
    NotConfigured,
}

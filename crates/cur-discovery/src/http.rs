//! Shared HTTP response helpers for index clients.

use crate::error::DiscoveryError;

/// Check an HTTP response for 429 and non-success statuses.
pub async fn check_response(
    resp: reqwest::Response,
) -> Result<reqwest::Response, DiscoveryError> {
    if resp.status() == 429 {
        return Err(DiscoveryError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        return Err(DiscoveryError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}

/// Build the shared HTTP client for index requests.
pub fn build_client(timeout: std::time::Duration) -> Result<reqwest::Client, DiscoveryError> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("curator/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()?)
}

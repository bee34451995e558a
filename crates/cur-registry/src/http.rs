//! Shared HTTP response helpers for registry clients.
//!
//! Centralizes status-code checks (404 → [`RegistryError::NotFound`], 429
//! rate limiting with `Retry-After` parsing, non-success →
//! [`RegistryError::Api`]) so the per-ecosystem modules stay focused on
//! request construction and response mapping.

use crate::error::RegistryError;

/// Check an HTTP response for `package` against common error conditions.
pub async fn check_response(
    resp: reqwest::Response,
    package: &str,
) -> Result<reqwest::Response, RegistryError> {
    if resp.status() == 404 {
        return Err(RegistryError::NotFound {
            package: package.to_string(),
        });
    }
    if resp.status() == 429 {
        let retry_after = parse_retry_after(&resp);
        return Err(RegistryError::RateLimited {
            retry_after_secs: retry_after,
        });
    }
    if !resp.status().is_success() {
        return Err(RegistryError::Api {
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

/// Parse a response body, mapping failures to [`RegistryError::Parse`].
pub fn parse_json<T: serde::de::DeserializeOwned>(
    body: &str,
    registry: &str,
) -> Result<T, RegistryError> {
    serde_json::from_str(body)
        .map_err(|e| RegistryError::Parse(format!("unexpected {registry} response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mock_response(status: u16) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body("")
                .unwrap(),
        )
    }

    fn mock_response_with_retry_after(status: u16, value: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .header("Retry-After", value)
                .body("")
                .unwrap(),
        )
    }

    #[test]
    fn parse_retry_after_from_header() {
        let resp = mock_response_with_retry_after(429, "120");
        assert_eq!(parse_retry_after(&resp), 120);
    }

    #[test]
    fn parse_retry_after_non_numeric() {
        let resp = mock_response_with_retry_after(429, "Wed, 21 Oct 2026 07:28:00 GMT");
        assert_eq!(parse_retry_after(&resp), 60);
    }

    #[tokio::test]
    async fn check_response_not_found_names_package() {
        let err = check_response(mock_response(404), "left-pad")
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { package } if package == "left-pad"));
    }

    #[tokio::test]
    async fn check_response_rate_limited_default() {
        let err = check_response(mock_response(429), "x").await.unwrap_err();
        assert!(matches!(
            err,
            RegistryError::RateLimited {
                retry_after_secs: 60
            }
        ));
    }

    #[tokio::test]
    async fn check_response_api_error() {
        let err = check_response(mock_response(502), "x").await.unwrap_err();
        assert!(matches!(err, RegistryError::Api { status: 502, .. }));
    }

    #[tokio::test]
    async fn check_response_success() {
        assert!(check_response(mock_response(200), "x").await.is_ok());
    }
}

//! Network probing of external links.

use async_trait::async_trait;
use cur_config::LinksConfig;
use cur_core::enums::LinkErrorKind;
use reqwest::StatusCode;

/// Result of probing one URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub http_status: Option<u16>,
    /// `None` when the URL resolved to a success status.
    pub error_kind: Option<LinkErrorKind>,
}

impl ProbeOutcome {
    #[must_use]
    pub const fn ok(status: u16) -> Self {
        Self {
            http_status: Some(status),
            error_kind: None,
        }
    }

    #[must_use]
    pub const fn bad_status(status: u16) -> Self {
        Self {
            http_status: Some(status),
            error_kind: Some(LinkErrorKind::BadStatus),
        }
    }

    #[must_use]
    pub const fn failed(kind: LinkErrorKind) -> Self {
        Self {
            http_status: None,
            error_kind: Some(kind),
        }
    }

    /// Classify a final HTTP status.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        if status >= 200 && status < 400 {
            Self::ok(status)
        } else {
            Self::bad_status(status)
        }
    }
}

/// Something that can tell whether a URL resolves.
#[async_trait]
pub trait LinkProber: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeOutcome;
}

/// `HEAD` prober with a single `GET` fallback for servers that reject `HEAD`.
pub struct HttpProber {
    http: reqwest::Client,
}

impl HttpProber {
    /// # Errors
    ///
    /// Returns the `reqwest` error if the HTTP client cannot be built.
    pub fn new(config: &LinksConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("curator/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl LinkProber for HttpProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        let head = match self.http.head(url).send().await {
            Ok(resp) => resp.status(),
            Err(error) => return classify_error(url, &error),
        };

        if !needs_get_fallback(head) {
            return ProbeOutcome::from_status(head.as_u16());
        }

        tracing::debug!(%url, status = head.as_u16(), "HEAD rejected, retrying with GET");
        match self.http.get(url).send().await {
            Ok(resp) => ProbeOutcome::from_status(resp.status().as_u16()),
            Err(error) => classify_error(url, &error),
        }
    }
}

fn needs_get_fallback(status: StatusCode) -> bool {
    status == StatusCode::METHOD_NOT_ALLOWED || status == StatusCode::NOT_IMPLEMENTED
}

fn classify_error(url: &str, error: &reqwest::Error) -> ProbeOutcome {
    tracing::debug!(%url, %error, "link probe failed");
    if error.is_timeout() {
        ProbeOutcome::failed(LinkErrorKind::Timeout)
    } else {
        ProbeOutcome::failed(LinkErrorKind::NetworkFailure)
    }
}

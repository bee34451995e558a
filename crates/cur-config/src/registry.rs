//! Package index endpoints used by the dependency freshness check.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const fn default_timeout_secs() -> u64 {
    10
}

fn default_pypi_url() -> String {
    "https://pypi.org".to_string()
}

fn default_crates_url() -> String {
    "https://crates.io".to_string()
}

fn default_npm_url() -> String {
    "https://registry.npmjs.org".to_string()
}

fn default_github_url() -> String {
    "https://api.github.com".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryConfig {
    /// Per-lookup timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_pypi_url")]
    pub pypi_url: String,

    #[serde(default = "default_crates_url")]
    pub crates_url: String,

    #[serde(default = "default_npm_url")]
    pub npm_url: String,

    #[serde(default = "default_github_url")]
    pub github_url: String,

    /// Optional token for the GitHub releases API (raises the rate limit).
    #[serde(default)]
    pub github_token: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            pypi_url: default_pypi_url(),
            crates_url: default_crates_url(),
            npm_url: default_npm_url(),
            github_url: default_github_url(),
            github_token: String::new(),
        }
    }
}

impl RegistryConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

//! Link integrity checking configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const fn default_enabled() -> bool {
    true
}

const fn default_timeout_secs() -> u64 {
    5
}

const fn default_check_internal() -> bool {
    true
}

fn default_skip_prefixes() -> Vec<String> {
    vec![
        "http://localhost".to_string(),
        "https://localhost".to_string(),
        "http://127.0.0.1".to_string(),
    ]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinksConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Per-probe timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Verify relative links against the filesystem.
    #[serde(default = "default_check_internal")]
    pub check_internal: bool,

    /// External URLs starting with any of these are never probed.
    #[serde(default = "default_skip_prefixes")]
    pub skip_prefixes: Vec<String>,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            timeout_secs: default_timeout_secs(),
            check_internal: default_check_internal(),
            skip_prefixes: default_skip_prefixes(),
        }
    }
}

impl LinksConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn is_skipped(&self, url: &str) -> bool {
        self.skip_prefixes.iter().any(|p| url.starts_with(p.as_str()))
    }
}

//! Per-subsystem concurrency limits.

use serde::{Deserialize, Serialize};

const fn default_discovery_concurrency() -> usize {
    3
}

const fn default_scoring_concurrency() -> usize {
    4
}

const fn default_registry_concurrency() -> usize {
    4
}

const fn default_link_concurrency() -> usize {
    5
}

/// Maximum in-flight calls per subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct LimitsConfig {
    #[serde(default = "default_discovery_concurrency")]
    pub discovery_concurrency: usize,

    #[serde(default = "default_scoring_concurrency")]
    pub scoring_concurrency: usize,

    #[serde(default = "default_registry_concurrency")]
    pub registry_concurrency: usize,

    #[serde(default = "default_link_concurrency")]
    pub link_concurrency: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            discovery_concurrency: default_discovery_concurrency(),
            scoring_concurrency: default_scoring_concurrency(),
            registry_concurrency: default_registry_concurrency(),
            link_concurrency: default_link_concurrency(),
        }
    }
}

impl LimitsConfig {
    /// Same limit for every subsystem (the `--concurrency` override).
    #[must_use]
    pub const fn uniform(limit: usize) -> Self {
        Self {
            discovery_concurrency: limit,
            scoring_concurrency: limit,
            registry_concurrency: limit,
            link_concurrency: limit,
        }
    }

    pub(crate) fn fields(&self) -> [(&'static str, usize); 4] {
        [
            ("limits.discovery_concurrency", self.discovery_concurrency),
            ("limits.scoring_concurrency", self.scoring_concurrency),
            ("limits.registry_concurrency", self.registry_concurrency),
            ("limits.link_concurrency", self.link_concurrency),
        ]
    }
}

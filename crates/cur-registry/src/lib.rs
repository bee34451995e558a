//! # cur-registry
//!
//! Package index clients for Curator's dependency freshness check.
//!
//! Each tracked dependency names its ecosystem; [`RegistryClient`] dispatches
//! to the matching index:
//! - `PyPI` (Python)
//! - crates.io (Rust)
//! - npm (JavaScript/TypeScript)
//! - GitHub releases (`owner/repo`)

pub mod crates_io;
pub mod freshness;
pub mod github;
pub mod npm;
pub mod pypi;

mod error;
mod http;

pub use error::RegistryError;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cur_config::RegistryConfig;
use cur_core::entities::{DependencyRecord, DependencySpec};
use cur_core::enums::Ecosystem;
use serde::{Deserialize, Serialize};

// ── Types ──────────────────────────────────────────────────────────

/// The newest release an index reports for a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestRelease {
    pub version: String,
    pub release_date: Option<DateTime<Utc>>,
}

impl LatestRelease {
    /// Combine with the tracked baseline into a report record.
    #[must_use]
    pub fn into_record(self, spec: &DependencySpec) -> DependencyRecord {
        DependencyRecord {
            package_name: spec.name.clone(),
            ecosystem: spec.ecosystem,
            freshness: freshness::compare(&spec.baseline, &self.version),
            tracked_baseline_version: spec.baseline.clone(),
            latest_observed_version: self.version,
            release_date: self.release_date,
        }
    }
}

/// A source of "latest release" facts for tracked dependencies.
#[async_trait]
pub trait PackageIndex: Send + Sync {
    async fn latest(&self, spec: &DependencySpec) -> Result<LatestRelease, RegistryError>;
}

// ── Client ─────────────────────────────────────────────────────────

/// HTTP client for the supported package indexes.
pub struct RegistryClient {
    http: reqwest::Client,
    endpoints: RegistryConfig,
}

impl RegistryClient {
    /// Create a registry client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("curator/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;
        let mut endpoints = config.clone();
        for url in [
            &mut endpoints.pypi_url,
            &mut endpoints.crates_url,
            &mut endpoints.npm_url,
            &mut endpoints.github_url,
        ] {
            *url = url.trim_end_matches('/').to_string();
        }
        Ok(Self { http, endpoints })
    }
}

#[async_trait]
impl PackageIndex for RegistryClient {
    async fn latest(&self, spec: &DependencySpec) -> Result<LatestRelease, RegistryError> {
        tracing::debug!(package = %spec.name, ecosystem = %spec.ecosystem, "looking up latest release");
        match spec.ecosystem {
            Ecosystem::Pypi => self.latest_pypi(&spec.name).await,
            Ecosystem::Crates => self.latest_crates_io(&spec.name).await,
            Ecosystem::Npm => self.latest_npm(&spec.name).await,
            Ecosystem::Github => self.latest_github(&spec.name).await,
        }
    }
}

//! The external collaborators a run talks to.

use std::sync::Arc;

use cur_config::CuratorConfig;
use cur_discovery::{DiscoveryError, ScholarlyIndex, build_indexes};
use cur_links::{HttpProber, LinkProber};
use cur_llm::{LanguageModel, LlmError, OpenAiClient};
use cur_registry::{PackageIndex, RegistryClient, RegistryError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to build discovery clients: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("failed to build registry client: {0}")]
    Registry(#[from] RegistryError),

    #[error("failed to build language model client: {0}")]
    Llm(#[from] LlmError),

    #[error("failed to build link prober: {0}")]
    Prober(#[from] reqwest::Error),
}

/// Trait objects for every external interface; tests substitute fakes.
#[derive(Clone)]
pub struct Services {
    pub indexes: Vec<Arc<dyn ScholarlyIndex>>,
    /// `None` when no API key is configured; scoring and suggestions then fail.
    pub model: Option<Arc<dyn LanguageModel>>,
    pub packages: Arc<dyn PackageIndex>,
    pub prober: Arc<dyn LinkProber>,
}

impl Services {
    /// HTTP-backed clients for a real run.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if any HTTP client cannot be constructed.
    pub fn from_config(config: &CuratorConfig) -> Result<Self, ServiceError> {
        let model: Option<Arc<dyn LanguageModel>> = if config.llm.is_configured() {
            Some(Arc::new(OpenAiClient::from_config(&config.llm)?))
        } else {
            tracing::warn!("no language model API key configured; scoring and suggestions will be skipped");
            None
        };

        Ok(Self {
            indexes: build_indexes(&config.discovery)?,
            model,
            packages: Arc::new(RegistryClient::new(&config.registry)?),
            prober: Arc::new(HttpProber::new(&config.links)?),
        })
    }
}

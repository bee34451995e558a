//! # cur-config
//!
//! Layered configuration loading for Curator using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CURATOR_*` prefix, `__` as separator)
//! 2. An explicit file passed with `--config`
//! 3. Project-level `.curator/config.toml`
//! 4. User-level `~/.config/curator/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CURATOR_GENERAL__TOP_K` -> `general.top_k`,
//! `CURATOR_LLM__API_KEY` -> `llm.api_key`, etc. `OPENAI_API_KEY` is used
//! when no key is configured.
//!
//! # Usage
//!
//! ```no_run
//! use cur_config::CuratorConfig;
//!
//! let config = CuratorConfig::load_with_dotenv(None).expect("config");
//! if !config.llm.is_configured() {
//!     eprintln!("scoring and suggestions will be skipped");
//! }
//! ```

mod corpus;
mod discovery;
mod error;
mod general;
mod limits;
mod links;
mod llm;
mod registry;

pub use corpus::{CorpusConfig, SectionConfig};
pub use discovery::{DiscoveryConfig, PromptEntry, ScholarlySource};
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use limits::LimitsConfig;
pub use links::LinksConfig;
pub use llm::{LlmConfig, OPENAI_API_KEY_ENV};
pub use registry::RegistryConfig;

use cur_core::entities::DependencySpec;
use cur_core::enums::Ecosystem;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Env var prefix for every configuration key.
pub const ENV_PREFIX: &str = "CURATOR_";

const REDACTED: &str = "<redacted>";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CuratorConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
    /// Tracked dependency baseline (`[[dependencies]]`).
    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,
}

impl CuratorConfig {
    /// Load configuration from all sources (TOML files + environment variables),
    /// apply the `OPENAI_API_KEY` fallback, and validate.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed and
    /// [`ConfigError::InvalidValue`] if validation fails.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        // `Toml::file` silently skips a missing file; an explicit one must exist.
        if let Some(path) = explicit.filter(|p| !p.is_file()) {
            return Err(ConfigError::invalid(
                "--config",
                format!("{} does not exist", path.display()),
            ));
        }
        let mut config: Self = Self::figment(explicit).extract()?;
        config.llm.apply_env_fallback();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load(explicit)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".curator/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Path to the user-global config file.
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("curator").join("config.toml"))
    }

    /// Reject values that would make a run meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.top_k == 0 {
            return Err(ConfigError::invalid("general.top_k", "must be at least 1"));
        }
        if !(0.0..=10.0).contains(&self.general.min_relevance) {
            return Err(ConfigError::invalid(
                "general.min_relevance",
                "must be between 0 and 10",
            ));
        }
        if self.general.run_deadline_secs == 0 {
            return Err(ConfigError::invalid(
                "general.run_deadline_secs",
                "must be at least 1",
            ));
        }
        for (field, value) in self.limits.fields() {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be at least 1"));
            }
        }
        if self.discovery.sources.is_empty() {
            return Err(ConfigError::invalid(
                "discovery.sources",
                "at least one index is required",
            ));
        }
        if self.discovery.results_per_prompt == 0 {
            return Err(ConfigError::invalid(
                "discovery.results_per_prompt",
                "must be at least 1",
            ));
        }
        if self.discovery.max_prompts == 0 {
            return Err(ConfigError::invalid(
                "discovery.max_prompts",
                "must be at least 1",
            ));
        }
        if self.corpus.sections.is_empty() {
            return Err(ConfigError::invalid(
                "corpus.sections",
                "at least one section is required",
            ));
        }
        let mut titles = HashSet::new();
        for section in &self.corpus.sections {
            if section.title.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "corpus.sections",
                    format!("section '{}' has an empty title", section.dir),
                ));
            }
            if !titles.insert(section.title.as_str()) {
                return Err(ConfigError::invalid(
                    "corpus.sections",
                    format!("duplicate section title '{}'", section.title),
                ));
            }
        }
        if self.corpus.extensions.is_empty() {
            return Err(ConfigError::invalid(
                "corpus.extensions",
                "at least one extension is required",
            ));
        }
        for dep in &self.dependencies {
            if dep.name.trim().is_empty() {
                return Err(ConfigError::invalid("dependencies", "empty package name"));
            }
            if dep.ecosystem == Ecosystem::Github && !dep.name.contains('/') {
                return Err(ConfigError::invalid(
                    "dependencies",
                    format!("github dependency '{}' must be 'owner/repo'", dep.name),
                ));
            }
        }
        Ok(())
    }

    /// Copy with secrets replaced, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for secret in [
            &mut copy.llm.api_key,
            &mut copy.registry.github_token,
            &mut copy.discovery.semantic_scholar_api_key,
        ] {
            if !secret.is_empty() {
                *secret = REDACTED.to_string();
            }
        }
        copy
    }
}

//! Language model (OpenAI-compatible chat completions) configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fallback environment variable for the API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_scoring_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_suggestion_model() -> String {
    "gpt-4o".to_string()
}

const fn default_scoring_temperature() -> f32 {
    0.3
}

const fn default_suggestion_temperature() -> f32 {
    0.7
}

const fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// API key. Falls back to `OPENAI_API_KEY` when empty.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used once per candidate for relevance scoring.
    #[serde(default = "default_scoring_model")]
    pub scoring_model: String,

    /// Model used once per run for content-gap suggestions.
    #[serde(default = "default_suggestion_model")]
    pub suggestion_model: String,

    #[serde(default = "default_scoring_temperature")]
    pub scoring_temperature: f32,

    #[serde(default = "default_suggestion_temperature")]
    pub suggestion_temperature: f32,

    /// Per-call timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            scoring_model: default_scoring_model(),
            suggestion_model: default_suggestion_model(),
            scoring_temperature: default_scoring_temperature(),
            suggestion_temperature: default_suggestion_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmConfig {
    /// Check if an API key is available.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Fill `api_key` from `OPENAI_API_KEY` if it was not set through config.
    pub(crate) fn apply_env_fallback(&mut self) {
        if self.is_configured() {
            return;
        }
        if let Ok(key) = std::env::var(OPENAI_API_KEY_ENV) {
            self.api_key = key;
        }
    }
}

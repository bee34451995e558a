//! Research discovery configuration: which indexes to query and with what prompts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// A scholarly index Curator knows how to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScholarlySource {
    Arxiv,
    SemanticScholar,
}

impl ScholarlySource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arxiv => "arxiv",
            Self::SemanticScholar => "semantic_scholar",
        }
    }
}

impl fmt::Display for ScholarlySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prompt declared inline in config (`[[discovery.prompts]]`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PromptEntry {
    pub query: String,
    #[serde(default)]
    pub rationale: Option<String>,
}

fn default_sources() -> Vec<ScholarlySource> {
    vec![ScholarlySource::Arxiv]
}

const fn default_results_per_prompt() -> usize {
    3
}

const fn default_max_prompts() -> usize {
    15
}

const fn default_max_age_days() -> u32 {
    180
}

fn default_prompts_file() -> Option<PathBuf> {
    Some(PathBuf::from("arxiv-paper/SEARCH-PROMPTS-FOR-IMPROVEMENT.md"))
}

fn default_arxiv_url() -> String {
    "http://export.arxiv.org/api/query".to_string()
}

fn default_semantic_scholar_url() -> String {
    "https://api.semanticscholar.org/graph/v1/paper/search".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscoveryConfig {
    /// Indexes queried for every prompt.
    #[serde(default = "default_sources")]
    pub sources: Vec<ScholarlySource>,

    /// Result cap per (prompt, index) query.
    #[serde(default = "default_results_per_prompt")]
    pub results_per_prompt: usize,

    /// Cap on the resolved prompt list.
    #[serde(default = "default_max_prompts")]
    pub max_prompts: usize,

    /// Candidates published longer ago than this are dropped before scoring.
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u32,

    /// Inline prompts. When non-empty, the prompts file is not read.
    #[serde(default)]
    pub prompts: Vec<PromptEntry>,

    /// Markdown file with `**Prompt**:` lines, relative to the corpus root.
    #[serde(default = "default_prompts_file")]
    pub prompts_file: Option<PathBuf>,

    #[serde(default = "default_arxiv_url")]
    pub arxiv_url: String,

    #[serde(default = "default_semantic_scholar_url")]
    pub semantic_scholar_url: String,

    /// Optional Semantic Scholar API key (`x-api-key` header).
    #[serde(default)]
    pub semantic_scholar_api_key: String,

    /// Per-query timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            results_per_prompt: default_results_per_prompt(),
            max_prompts: default_max_prompts(),
            max_age_days: default_max_age_days(),
            prompts: Vec::new(),
            prompts_file: default_prompts_file(),
            arxiv_url: default_arxiv_url(),
            semantic_scholar_url: default_semantic_scholar_url(),
            semantic_scholar_api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl DiscoveryConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.sources, vec![ScholarlySource::Arxiv]);
        assert_eq!(config.results_per_prompt, 3);
        assert_eq!(config.max_prompts, 15);
        assert_eq!(config.max_age_days, 180);
        assert!(config.prompts.is_empty());
        assert!(config.prompts_file.is_some());
    }

    #[test]
    fn source_names_are_snake_case() {
        assert_eq!(ScholarlySource::SemanticScholar.to_string(), "semantic_scholar");
    }
}

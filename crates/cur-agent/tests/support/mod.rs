//! In-memory fakes for every external interface of a run.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use cur_agent::Services;
use cur_config::{CuratorConfig, PromptEntry};
use cur_core::entities::{Candidate, DependencySpec, SearchPrompt};
use cur_core::enums::Ecosystem;
use cur_discovery::{DiscoveryError, ScholarlyIndex};
use cur_links::{LinkProber, ProbeOutcome};
use cur_llm::{JsonRequest, LanguageModel, LlmError};
use cur_registry::{LatestRelease, PackageIndex, RegistryError};
use serde_json::{Value, json};

// ── Discovery ──────────────────────────────────────────────────────

pub enum SearchBehavior {
    Found(Vec<(String, String)>),
    NetworkError,
}

/// Answers each query with a fixed `(title, url)` list or a failure.
#[derive(Default)]
pub struct FakeIndex {
    behaviors: HashMap<String, SearchBehavior>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeIndex {
    #[must_use]
    pub fn with(mut self, query: &str, behavior: SearchBehavior) -> Self {
        self.behaviors.insert(query.to_string(), behavior);
        self
    }
}

pub fn candidate(prompt: &SearchPrompt, title: &str, url: &str) -> Candidate {
    Candidate {
        title: title.to_string(),
        authors: vec!["Ada Lovelace".to_string()],
        published: Some(Utc::now() - chrono::Duration::days(10)),
        abstract_text: format!("Abstract of {title}."),
        source_url: url.to_string(),
        source: "fake".to_string(),
        origins: vec![prompt.to_ref()],
    }
}

#[async_trait]
impl ScholarlyIndex for FakeIndex {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn search(&self, prompt: &SearchPrompt, max_results: usize) -> Result<Vec<Candidate>, DiscoveryError> {
        self.calls.lock().unwrap().push(prompt.query.clone());
        match self.behaviors.get(&prompt.query) {
            Some(SearchBehavior::NetworkError) => Err(DiscoveryError::Api {
                status: 503,
                message: "service unavailable".into(),
            }),
            Some(SearchBehavior::Found(items)) => Ok(items
                .iter()
                .take(max_results)
                .map(|(title, url)| candidate(prompt, title, url))
                .collect()),
            None => Ok(Vec::new()),
        }
    }
}

// ── Language model ─────────────────────────────────────────────────

/// Scores by title; answers gap requests with two suggestions.
#[derive(Default)]
pub struct FakeModel {
    scores: HashMap<String, f64>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeModel {
    #[must_use]
    pub fn score(mut self, title: &str, score: f64) -> Self {
        self.scores.insert(title.to_string(), score);
        self
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn complete_json(&self, request: &JsonRequest) -> Result<Value, LlmError> {
        self.requests.lock().unwrap().push(request.schema_name.clone());
        if request.schema_name == "suggestions" {
            return Ok(json!({
                "suggestions": [
                    {"category": "content_gap", "description": "Cover agent memory", "rationale": "New papers"},
                    {"category": "structural", "description": "Split labs", "rationale": "Too long"}
                ]
            }));
        }
        let title = request
            .user
            .lines()
            .find_map(|line| line.strip_prefix("Title: "))
            .unwrap_or_default();
        let score = self.scores.get(title).copied().unwrap_or(5.0);
        Ok(json!({
            "relevance_score": score,
            "rationale": format!("about {title}"),
            "suggested_section": "Foundations"
        }))
    }
}

// ── Package index ──────────────────────────────────────────────────

pub enum LookupBehavior {
    Latest(&'static str),
    Hang,
    Missing,
}

#[derive(Default)]
pub struct FakePackages {
    behaviors: HashMap<String, LookupBehavior>,
}

impl FakePackages {
    #[must_use]
    pub fn with(mut self, name: &str, behavior: LookupBehavior) -> Self {
        self.behaviors.insert(name.to_string(), behavior);
        self
    }
}

#[async_trait]
impl PackageIndex for FakePackages {
    async fn latest(&self, spec: &DependencySpec) -> Result<LatestRelease, RegistryError> {
        match self.behaviors.get(&spec.name) {
            Some(LookupBehavior::Latest(version)) => Ok(LatestRelease {
                version: (*version).to_string(),
                release_date: None,
            }),
            Some(LookupBehavior::Hang) => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Err(RegistryError::Parse("unreachable".into()))
            }
            Some(LookupBehavior::Missing) | None => Err(RegistryError::NotFound {
                package: spec.name.clone(),
            }),
        }
    }
}

// ── Link prober ────────────────────────────────────────────────────

/// Counts probes per URL; unknown URLs answer 200.
#[derive(Default)]
pub struct CountingProber {
    statuses: HashMap<String, u16>,
    pub probes: Mutex<HashMap<String, usize>>,
}

impl CountingProber {
    #[must_use]
    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.statuses.insert(url.to_string(), status);
        self
    }

    pub fn probe_count(&self, url: &str) -> usize {
        self.probes.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_probes(&self) -> usize {
        self.probes.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl LinkProber for CountingProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        *self.probes.lock().unwrap().entry(url.to_string()).or_default() += 1;
        ProbeOutcome::from_status(self.statuses.get(url).copied().unwrap_or(200))
    }
}

// ── Wiring ─────────────────────────────────────────────────────────

pub struct Fakes {
    pub index: Arc<FakeIndex>,
    pub model: Option<Arc<FakeModel>>,
    pub packages: Arc<FakePackages>,
    pub prober: Arc<CountingProber>,
}

impl Fakes {
    pub fn services(&self) -> Services {
        Services {
            indexes: vec![Arc::clone(&self.index) as Arc<dyn ScholarlyIndex>],
            model: self
                .model
                .as_ref()
                .map(|m| Arc::clone(m) as Arc<dyn LanguageModel>),
            packages: Arc::clone(&self.packages) as Arc<dyn PackageIndex>,
            prober: Arc::clone(&self.prober) as Arc<dyn LinkProber>,
        }
    }
}

impl Default for Fakes {
    fn default() -> Self {
        Self {
            index: Arc::new(FakeIndex::default()),
            model: Some(Arc::new(FakeModel::default())),
            packages: Arc::new(FakePackages::default()),
            prober: Arc::new(CountingProber::default()),
        }
    }
}

/// Config pointing at `root` with inline prompts and the given dependencies.
pub fn config(root: &Path, prompts: &[&str], dependencies: &[&str]) -> CuratorConfig {
    let mut config = CuratorConfig::default();
    config.corpus.root = root.to_path_buf();
    config.general.output_dir = root.join("reports");
    config.discovery.prompts = prompts
        .iter()
        .map(|q| PromptEntry {
            query: (*q).to_string(),
            rationale: None,
        })
        .collect();
    config.dependencies = dependencies
        .iter()
        .map(|name| DependencySpec {
            name: (*name).to_string(),
            ecosystem: Ecosystem::Pypi,
            baseline: "1.0.0".to_string(),
        })
        .collect();
    config
}

/// Write `files` (relative path, contents) under `root`.
pub fn write_corpus(root: &Path, files: &[(&str, &str)]) {
    for (path, contents) in files {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, contents).unwrap();
    }
}

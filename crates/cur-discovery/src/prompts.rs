//! Search prompt resolution.
//!
//! The prompt list comes from the first non-empty source:
//! 1. inline `[[discovery.prompts]]` entries
//! 2. the prompts markdown file (`**Prompt**: "..."` lines)
//! 3. the built-in defaults
//!
//! The list is deduplicated, capped at `discovery.max_prompts`, and indexed
//! in order. The index is the ranking tie-breaker, so order matters.

use cur_config::DiscoveryConfig;
use cur_core::entities::SearchPrompt;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

const PROMPT_MARKER: &str = "**Prompt**:";
const RATIONALE_MARKER: &str = "**Rationale**:";

/// Built-in prompts used when neither config nor a prompts file supplies any.
pub const DEFAULT_PROMPTS: [&str; 10] = [
    "Survey of Large Language Model based Autonomous Agents",
    "Comprehensive review agentic AI systems LLM agents",
    "Tree of Thoughts Graph of Thoughts reasoning LLM",
    "MemGPT long-term memory systems LLM agents",
    "ReAct ReWOO tool use planning agents",
    "LangChain LangGraph Pydantic AI framework updates",
    "Multi-agent coordination GPT Swarm CAMEL",
    "Self-RAG CRAG Corrective RAG active retrieval",
    "AgentBench WebArena agent evaluation benchmark",
    "Multimodal agents vision-language reasoning",
];

/// Where the resolved prompts came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOrigin {
    Config,
    File(PathBuf),
    Defaults,
}

impl fmt::Display for PromptOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config => f.write_str("config"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults => f.write_str("built-in defaults"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedPrompts {
    pub prompts: Vec<SearchPrompt>,
    pub origin: PromptOrigin,
}

/// Resolve the ordered prompt list. Relative prompt file paths are resolved
/// against `corpus_root`.
#[must_use]
pub fn resolve_prompts(config: &DiscoveryConfig, corpus_root: &Path) -> ResolvedPrompts {
    let inline: Vec<(String, Option<String>)> = config
        .prompts
        .iter()
        .map(|p| (p.query.clone(), p.rationale.clone()))
        .collect();
    if has_query(&inline) {
        return finish(inline, config.max_prompts, PromptOrigin::Config);
    }

    if let Some(file) = &config.prompts_file {
        let path = if file.is_absolute() {
            file.clone()
        } else {
            corpus_root.join(file)
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let parsed = parse_prompts_markdown(&text);
                if has_query(&parsed) {
                    return finish(parsed, config.max_prompts, PromptOrigin::File(path));
                }
                tracing::warn!(path = %path.display(), "prompts file has no **Prompt** lines, using defaults");
            }
            Err(error) => {
                tracing::info!(path = %path.display(), %error, "prompts file not readable, using defaults");
            }
        }
    }

    let defaults = DEFAULT_PROMPTS
        .iter()
        .map(|q| ((*q).to_string(), None))
        .collect();
    finish(defaults, config.max_prompts, PromptOrigin::Defaults)
}

/// Extract `(query, rationale)` pairs from a prompts markdown document.
///
/// A `**Rationale**:` line applies to the closest preceding prompt, as long
/// as no other prompt intervenes.
#[must_use]
pub fn parse_prompts_markdown(text: &str) -> Vec<(String, Option<String>)> {
    let mut out: Vec<(String, Option<String>)> = Vec::new();
    let mut open = false;

    for line in text.lines() {
        let line = line.trim();
        let line = line
            .strip_prefix("- ")
            .or_else(|| line.strip_prefix("* "))
            .unwrap_or(line)
            .trim_start();

        if let Some(rest) = line.strip_prefix(PROMPT_MARKER) {
            out.push((unquote(rest), None));
            open = true;
        } else if let Some(rest) = line.strip_prefix(RATIONALE_MARKER) {
            if open {
                if let Some(last) = out.last_mut() {
                    last.1 = Some(unquote(rest)).filter(|r| !r.is_empty());
                }
                open = false;
            }
        }
    }

    out
}

fn unquote(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '"' || c == '\u{201c}' || c == '\u{201d}')
        .trim()
        .to_string()
}

fn has_query(entries: &[(String, Option<String>)]) -> bool {
    entries.iter().any(|(q, _)| !q.trim().is_empty())
}

fn finish(
    entries: Vec<(String, Option<String>)>,
    max_prompts: usize,
    origin: PromptOrigin,
) -> ResolvedPrompts {
    let mut seen = HashSet::new();
    let prompts = entries
        .into_iter()
        .map(|(q, r)| (q.trim().to_string(), r))
        .filter(|(q, _)| !q.is_empty() && seen.insert(q.to_lowercase()))
        .take(max_prompts)
        .enumerate()
        .map(|(index, (query, rationale))| SearchPrompt {
            index,
            query,
            rationale,
        })
        .collect();
    ResolvedPrompts { prompts, origin }
}

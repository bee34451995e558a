//! # cur-discovery
//!
//! Research discovery for Curator: resolves the search prompt list and
//! queries scholarly indexes for recent work.
//!
//! - arXiv export API (Atom, parsed with `feed-rs`)
//! - Semantic Scholar Graph API (JSON)
//!
//! An index answering with no matches returns `Ok(vec![])`; only transport,
//! status, and shape problems are errors.

pub mod arxiv;
pub mod prompts;
pub mod semantic_scholar;

mod error;
mod http;

pub use error::DiscoveryError;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use cur_config::{DiscoveryConfig, ScholarlySource};
use cur_core::entities::{Candidate, SearchPrompt};
use std::sync::Arc;

/// Abstracts are cut to this many characters before scoring.
pub const ABSTRACT_MAX_CHARS: usize = 300;

/// A searchable source of research items.
#[async_trait]
pub trait ScholarlyIndex: Send + Sync {
    /// Short, stable name used in logs and failure notes.
    fn name(&self) -> &'static str;

    /// Up to `max_results` items for `prompt`, each attributed to it.
    async fn search(
        &self,
        prompt: &SearchPrompt,
        max_results: usize,
    ) -> Result<Vec<Candidate>, DiscoveryError>;
}

/// Build the configured index clients, in configured order.
///
/// # Errors
///
/// Returns [`DiscoveryError::Http`] if an HTTP client cannot be built.
/// One client per configured source, duplicates collapsed.
///
/// # Errors
///
/// Returns [`DiscoveryError::Http`] if an HTTP client cannot be built.
pub fn build_indexes(
    config: &DiscoveryConfig,
) -> Result<Vec<Arc<dyn ScholarlyIndex>>, DiscoveryError> {
    let mut indexes: Vec<Arc<dyn ScholarlyIndex>> = Vec::new();
    for source in &config.sources {
        if indexes.iter().any(|i| i.name() == source.as_str()) {
            continue;
        }
        let index: Arc<dyn ScholarlyIndex> = match source {
            ScholarlySource::Arxiv => Arc::new(arxiv::ArxivClient::new(config)?),
            ScholarlySource::SemanticScholar => {
                Arc::new(semantic_scholar::SemanticScholarClient::new(config)?)
            }
        };
        indexes.push(index);
    }
    Ok(indexes)
}

/// Whether `candidate` is recent enough to score.
///
/// Items without a publication date are kept.
/// Undated candidates always pass.
#[must_use]
pub fn is_recent(candidate: &Candidate, max_age_days: u32, now: DateTime<Utc>) -> bool {
    let cutoff = now - Duration::days(i64::from(max_age_days));
    candidate.published.is_none_or(|published| published >= cutoff)
}

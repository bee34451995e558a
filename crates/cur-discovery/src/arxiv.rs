//! arXiv export API client.
//!
//! Queries `export.arxiv.org/api/query` and parses the Atom response with
//! `feed-rs`. Results are ordered by last update, newest first.

use async_trait::async_trait;
use cur_config::DiscoveryConfig;
use cur_core::entities::{Candidate, SearchPrompt};
use cur_core::text::{collapse_whitespace, truncate_chars};
use feed_rs::model::Entry;

use crate::error::DiscoveryError;
use crate::http::{build_client, check_response};
use crate::{ABSTRACT_MAX_CHARS, ScholarlyIndex};

/// Marker in the id of the entry arXiv returns instead of results for a bad query.
const API_ERROR_ID: &str = "arxiv.org/api/errors";

pub struct ArxivClient {
    http: reqwest::Client,
    base_url: String,
}

impl ArxivClient {
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &DiscoveryConfig) -> Result<Self, DiscoveryError> {
        Ok(Self {
            http: build_client(config.timeout())?,
            base_url: config.arxiv_url.clone(),
        })
    }

    fn query_url(&self, query: &str, max_results: usize) -> String {
        format!(
            "{}?search_query={}&start=0&max_results={max_results}&sortBy=lastUpdatedDate&sortOrder=descending",
            self.base_url,
            urlencoding::encode(&format!("all:{query}")),
        )
    }
}

#[async_trait]
impl ScholarlyIndex for ArxivClient {
    fn name(&self) -> &'static str {
        "arxiv"
    }

    async fn search(
        &self,
        prompt: &SearchPrompt,
        max_results: usize,
    ) -> Result<Vec<Candidate>, DiscoveryError> {
        let url = self.query_url(&prompt.query, max_results);
        tracing::debug!(prompt = %prompt.query, %url, "querying arXiv");

        let resp = self.http.get(&url).send().await?;
        let resp = check_response(resp).await?;
        let body = resp.bytes().await?;

        let mut candidates = parse_feed(&body, prompt)?;
        candidates.truncate(max_results);
        Ok(candidates)
    }
}

/// Parse an arXiv Atom document into candidates attributed to `prompt`.
///
/// An empty feed is an empty result. The error entry arXiv emits for a
/// malformed query becomes [`DiscoveryError::Api`].
pub fn parse_feed(body: &[u8], prompt: &SearchPrompt) -> Result<Vec<Candidate>, DiscoveryError> {
    let feed = feed_rs::parser::parse(body)
        .map_err(|e| DiscoveryError::Parse(format!("invalid arXiv Atom feed: {e}")))?;

    if let Some(error) = feed.entries.iter().find(|e| e.id.contains(API_ERROR_ID)) {
        let message = error
            .summary
            .as_ref()
            .map_or_else(|| "query rejected".to_string(), |s| collapse_whitespace(&s.content));
        return Err(DiscoveryError::Api {
            status: 400,
            message,
        });
    }

    Ok(feed
        .entries
        .into_iter()
        .filter_map(|entry| entry_to_candidate(entry, prompt))
        .collect())
}

fn entry_to_candidate(entry: Entry, prompt: &SearchPrompt) -> Option<Candidate> {
    let title = entry
        .title
        .map(|t| collapse_whitespace(&t.content))
        .filter(|t| !t.is_empty())?;

    let source_url = entry
        .links
        .iter()
        .find(|l| l.rel.as_deref() == Some("alternate"))
        .or_else(|| entry.links.first())
        .map(|l| l.href.clone())
        .or_else(|| entry.id.starts_with("http").then(|| entry.id.clone()))?;

    let abstract_text = entry
        .summary
        .map(|s| collapse_whitespace(&s.content))
        .unwrap_or_default();

    Some(Candidate {
        title,
        authors: entry.authors.into_iter().map(|p| p.name).collect(),
        published: entry.published.or(entry.updated),
        abstract_text: truncate_chars(&abstract_text, ABSTRACT_MAX_CHARS).to_string(),
        source_url,
        source: "arxiv".to_string(),
        origins: vec![prompt.to_ref()],
    })
}

//! Semantic Scholar Graph API client (`/graph/v1/paper/search`).

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use cur_config::DiscoveryConfig;
use cur_core::entities::{Candidate, SearchPrompt};
use cur_core::text::{collapse_whitespace, truncate_chars};
use serde::Deserialize;

use crate::error::DiscoveryError;
use crate::http::{build_client, check_response};
use crate::{ABSTRACT_MAX_CHARS, ScholarlyIndex};

const FIELDS: &str = "title,authors,abstract,url,publicationDate,year";

pub struct SemanticScholarClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl SemanticScholarClient {
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &DiscoveryConfig) -> Result<Self, DiscoveryError> {
        Ok(Self {
            http: build_client(config.timeout())?,
            base_url: config.semantic_scholar_url.clone(),
            api_key: Some(config.semantic_scholar_api_key.clone()).filter(|k| !k.is_empty()),
        })
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Paper>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Paper {
    paper_id: String,
    title: Option<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    url: Option<String>,
    #[serde(default)]
    authors: Vec<Author>,
    publication_date: Option<String>,
}

#[derive(Deserialize)]
struct Author {
    name: String,
}

#[async_trait]
impl ScholarlyIndex for SemanticScholarClient {
    fn name(&self) -> &'static str {
        "semantic_scholar"
    }

    async fn search(
        &self,
        prompt: &SearchPrompt,
        max_results: usize,
    ) -> Result<Vec<Candidate>, DiscoveryError> {
        let url = format!(
            "{}?query={}&limit={max_results}&fields={FIELDS}",
            self.base_url,
            urlencoding::encode(&prompt.query),
        );
        tracing::debug!(prompt = %prompt.query, %url, "querying Semantic Scholar");

        let mut request = self.http.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }
        let resp = check_response(request.send().await?).await?;
        let body = resp.text().await?;

        let mut candidates = parse_response(&body, prompt)?;
        candidates.truncate(max_results);
        Ok(candidates)
    }
}

/// Parse a paper search response into candidates attributed to `prompt`.
pub fn parse_response(body: &str, prompt: &SearchPrompt) -> Result<Vec<Candidate>, DiscoveryError> {
    let resp: SearchResponse = serde_json::from_str(body)
        .map_err(|e| DiscoveryError::Parse(format!("invalid Semantic Scholar response: {e}")))?;

    Ok(resp
        .data
        .into_iter()
        .filter_map(|paper| {
            let title = paper
                .title
                .map(|t| collapse_whitespace(&t))
                .filter(|t| !t.is_empty())?;
            let abstract_text = paper
                .abstract_text
                .map(|a| collapse_whitespace(&a))
                .unwrap_or_default();
            let source_url = paper.url.unwrap_or_else(|| {
                format!("https://www.semanticscholar.org/paper/{}", paper.paper_id)
            });
            Some(Candidate {
                title,
                authors: paper.authors.into_iter().map(|a| a.name).collect(),
                published: paper.publication_date.as_deref().and_then(parse_date),
                abstract_text: truncate_chars(&abstract_text, ABSTRACT_MAX_CHARS).to_string(),
                source_url,
                source: "semantic_scholar".to_string(),
                origins: vec![prompt.to_ref()],
            })
        })
        .collect())
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

//! Relevance scoring of discovered candidates.
//!
//! One structured-output call per candidate. The answer must name a
//! configured corpus section and carry a finite score in `[0, 10]`; anything
//! else drops the candidate rather than defaulting it.

use std::sync::Arc;

use cur_config::LlmConfig;
use cur_core::entities::{Candidate, Relevance, ScoredCandidate};
use cur_core::errors::CoreError;
use cur_core::text::truncate_chars;
use cur_llm::schema::{restrict_to, strict_schema};
use cur_llm::{JsonRequest, LanguageModel, LlmError, structured};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

const SYSTEM_PROMPT: &str =
    "You are an expert in AI agent systems and academic paper review. \
     You judge whether new research belongs in a curated knowledge base.";

const AUTHORS_SHOWN: usize = 5;

/// Shape the model must answer with.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RelevancePayload {
    /// 0 (unrelated) to 10 (essential).
    pub relevance_score: f64,
    pub rationale: String,
    pub suggested_section: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("no language model configured")]
    ModelUnavailable,

    #[error(transparent)]
    Model(#[from] LlmError),

    #[error("invalid relevance: {0}")]
    InvalidScore(#[from] CoreError),

    #[error("suggested section {0:?} is not a configured section")]
    UnknownSection(String),
}

/// Scores candidates against the corpus section vocabulary.
pub struct RelevanceScorer {
    model: Option<Arc<dyn LanguageModel>>,
    model_name: String,
    temperature: f32,
    sections: Vec<String>,
    schema: Value,
}

impl RelevanceScorer {
    #[must_use]
    pub fn new(model: Option<Arc<dyn LanguageModel>>, llm: &LlmConfig, sections: Vec<String>) -> Self {
        let mut schema = strict_schema::<RelevancePayload>();
        restrict_to(&mut schema, "suggested_section", &sections);
        Self {
            model,
            model_name: llm.scoring_model.clone(),
            temperature: llm.scoring_temperature,
            sections,
            schema,
        }
    }

    /// The request sent for `candidate`.
    #[must_use]
    pub fn request(&self, candidate: &Candidate) -> JsonRequest {
        let authors = if candidate.authors.is_empty() {
            "unknown".to_string()
        } else {
            candidate.authors[..candidate.authors.len().min(AUTHORS_SHOWN)].join(", ")
        };
        let published = candidate
            .published
            .map_or_else(|| "unknown".to_string(), |d| d.format("%Y-%m-%d").to_string());
        let prompts: Vec<&str> = candidate.origins.iter().map(|o| o.query.as_str()).collect();

        let user = format!(
            "Assess this paper for the knowledge base.\n\n\
             Title: {title}\n\
             Authors: {authors}\n\
             Published: {published}\n\
             Found by: {prompts}\n\
             Abstract: {abstract_text}\n\n\
             Consider whether it is about AI agents, LLM-based agents, or autonomous systems, \
             whether it introduces new techniques or insights, and whether it would add value \
             to the knowledge base.\n\n\
             Score relevance from 0 to 10 and pick the section it belongs to, one of: {sections}.",
            title = candidate.title,
            prompts = prompts.join("; "),
            abstract_text = truncate_chars(&candidate.abstract_text, cur_discovery::ABSTRACT_MAX_CHARS),
            sections = self.sections.join(", "),
        );

        JsonRequest {
            model: self.model_name.clone(),
            system: SYSTEM_PROMPT.to_string(),
            user,
            temperature: self.temperature,
            schema_name: "relevance".to_string(),
            schema: self.schema.clone(),
        }
    }

    /// Score one candidate.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError`] if no model is configured, the call fails,
    /// or the answer is out of range or names an unknown section.
    pub async fn score(&self, candidate: Candidate) -> Result<ScoredCandidate, ScoringError> {
        let model = self.model.as_deref().ok_or(ScoringError::ModelUnavailable)?;
        let payload: RelevancePayload = structured(model, &self.request(&candidate)).await?;

        if !self.sections.contains(&payload.suggested_section) {
            return Err(ScoringError::UnknownSection(payload.suggested_section));
        }
        let relevance = Relevance::new(
            payload.relevance_score,
            payload.rationale,
            payload.suggested_section,
        )?;

        tracing::debug!(title = %candidate.title, score = relevance.score, "scored candidate");
        Ok(ScoredCandidate::new(candidate, relevance))
    }
}

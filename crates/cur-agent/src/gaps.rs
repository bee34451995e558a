//! Content gap analysis over a structural corpus summary.

use std::sync::Arc;

use cur_config::LlmConfig;
use cur_core::entities::{CorpusSummary, ScoredCandidate, Suggestion};
use cur_llm::schema::strict_schema;
use cur_llm::{JsonRequest, LanguageModel, LlmError, structured};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

const SYSTEM_PROMPT: &str =
    "You are an expert in AI agent systems who keeps a curated knowledge base current \
     with the latest research and developments.";

/// Number of top-ranked papers mentioned in the request.
const PAPERS_SHOWN: usize = 5;

#[derive(Debug, Deserialize, JsonSchema)]
struct SuggestionsPayload {
    /// Most important first.
    suggestions: Vec<Suggestion>,
}

#[derive(Debug, thiserror::Error)]
pub enum SuggestionError {
    #[error("no language model configured")]
    ModelUnavailable,

    #[error(transparent)]
    Model(#[from] LlmError),
}

/// Proposes structural changes and missing topics for the corpus.
pub struct GapAnalyzer {
    model: Option<Arc<dyn LanguageModel>>,
    model_name: String,
    temperature: f32,
    schema: Value,
}

impl GapAnalyzer {
    #[must_use]
    pub fn new(model: Option<Arc<dyn LanguageModel>>, llm: &LlmConfig) -> Self {
        Self {
            model,
            model_name: llm.suggestion_model.clone(),
            temperature: llm.suggestion_temperature,
            schema: strict_schema::<SuggestionsPayload>(),
        }
    }

    #[must_use]
    pub fn request(&self, corpus: &CorpusSummary, top_papers: &[ScoredCandidate]) -> JsonRequest {
        let mut user = String::from(
            "Suggest specific, actionable improvements for this knowledge base on agentic AI systems.\n\n\
             Structure of the knowledge base:\n",
        );
        user.push_str(&corpus.to_prompt_text());

        if !top_papers.is_empty() {
            user.push_str("\nRecently discovered relevant papers:\n");
            for paper in top_papers.iter().take(PAPERS_SHOWN) {
                user.push_str(&format!(
                    "- {} (score {:.1}, suggested for {})\n",
                    paper.candidate.title,
                    paper.score(),
                    paper.relevance.suggested_section
                ));
            }
        }

        user.push_str(
            "\nFocus on missing recent frameworks or tools, emerging research directions, \
             new benchmarks or evaluation methods, and production deployment practices. \
             Use category \"structural\" for changes to organization and \"content_gap\" \
             for missing topics. Return at most five suggestions.",
        );

        JsonRequest {
            model: self.model_name.clone(),
            system: SYSTEM_PROMPT.to_string(),
            user,
            temperature: self.temperature,
            schema_name: "suggestions".to_string(),
            schema: self.schema.clone(),
        }
    }

    /// Ask for suggestions, in the order the model ranks them.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionError`] if no model is configured or the call fails.
    pub async fn suggest(
        &self,
        corpus: &CorpusSummary,
        top_papers: &[ScoredCandidate],
    ) -> Result<Vec<Suggestion>, SuggestionError> {
        let model = self.model.as_deref().ok_or(SuggestionError::ModelUnavailable)?;
        let payload: SuggestionsPayload = structured(model, &self.request(corpus, top_papers)).await?;
        tracing::debug!(count = payload.suggestions.len(), "received suggestions");
        Ok(payload.suggestions)
    }
}

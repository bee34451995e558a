use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A topical search query driving discovery.
///
/// `index` is the prompt's position in the ordered input list; it is the
/// first tie-breaker when ranking candidates with equal scores.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SearchPrompt {
    pub index: usize,
    pub query: String,
    pub rationale: Option<String>,
}

impl SearchPrompt {
    #[must_use]
    pub fn new(index: usize, query: impl Into<String>) -> Self {
        Self {
            index,
            query: query.into(),
            rationale: None,
        }
    }

    #[must_use]
    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }

    /// Lightweight reference recorded on every candidate the prompt produced.
    #[must_use]
    pub fn to_ref(&self) -> PromptRef {
        PromptRef {
            index: self.index,
            query: self.query.clone(),
        }
    }
}

/// Back-reference from a candidate to the prompt that surfaced it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PromptRef {
    pub index: usize,
    pub query: String,
}

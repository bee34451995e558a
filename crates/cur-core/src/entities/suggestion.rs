use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SuggestionCategory;

/// A proposed structural or topical improvement to the corpus.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Suggestion {
    pub category: SuggestionCategory,
    pub description: String,
    pub rationale: String,
}

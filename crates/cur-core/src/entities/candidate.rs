use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::PromptRef;
use crate::errors::CoreError;
use crate::url::normalize_url;

/// Upper bound of the relevance scale.
pub const MAX_SCORE: f64 = 10.0;

/// A research item returned by a scholarly index.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub authors: Vec<String>,
    pub published: Option<DateTime<Utc>>,
    pub abstract_text: String,
    pub source_url: String,
    /// Name of the index that returned the item (e.g. `arxiv`).
    pub source: String,
    /// Prompts that surfaced this item, ascending by index after a merge.
    pub origins: Vec<PromptRef>,
}

impl Candidate {
    /// Identity key used for deduplication.
    #[must_use]
    pub fn identity_key(&self) -> String {
        normalize_url(&self.source_url)
    }

    /// Index of the earliest prompt that surfaced this item.
    ///
    /// A candidate with no recorded origin sorts last.
    #[must_use]
    pub fn first_origin_index(&self) -> usize {
        self.origins.iter().map(|o| o.index).min().unwrap_or(usize::MAX)
    }

    /// Union `other` into this candidate's origins, keeping them sorted and unique.
    pub fn merge_origins(&mut self, other: &[PromptRef]) {
        self.origins.extend(other.iter().cloned());
        self.origins.sort();
        self.origins.dedup();
    }
}

/// Relevance judgement attached to a candidate.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Relevance {
    /// Score on the closed interval `[0, 10]`.
    pub score: f64,
    pub rationale: String,
    /// One of the configured corpus section titles.
    pub suggested_section: String,
}

impl Relevance {
    /// Build a relevance judgement, rejecting non-finite or out-of-range scores.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if `score` is NaN, infinite, or outside `[0, 10]`.
    pub fn new(
        score: f64,
        rationale: impl Into<String>,
        suggested_section: impl Into<String>,
    ) -> Result<Self, CoreError> {
        if !score.is_finite() || !(0.0..=MAX_SCORE).contains(&score) {
            return Err(CoreError::Validation(format!(
                "relevance score {score} is outside [0, {MAX_SCORE}]"
            )));
        }
        Ok(Self {
            score,
            rationale: rationale.into(),
            suggested_section: suggested_section.into(),
        })
    }
}

/// A candidate that has been successfully scored.
///
/// Only this type reaches the run report, so every reported candidate
/// carries a score.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub relevance: Relevance,
}

impl ScoredCandidate {
    #[must_use]
    pub const fn new(candidate: Candidate, relevance: Relevance) -> Self {
        Self {
            candidate,
            relevance,
        }
    }

    #[must_use]
    pub const fn score(&self) -> f64 {
        self.relevance.score
    }
}

//! Entity structs for Curator's data model.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` so they can
//! be written to the structured report artifact and validated against their
//! generated schemas.

mod candidate;
mod corpus;
mod dependency;
mod link;
mod prompt;
mod suggestion;

pub use candidate::{Candidate, Relevance, ScoredCandidate};
pub use corpus::{CorpusSummary, SectionSummary, StaleReference};
pub use dependency::{DependencyRecord, DependencySpec};
pub use link::{LinkCheckResult, LinkOccurrence};
pub use prompt::{PromptRef, SearchPrompt};
pub use suggestion::Suggestion;

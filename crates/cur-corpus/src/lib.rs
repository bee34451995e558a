//! # cur-corpus
//!
//! Read-only access to the content corpus: walking documents, summarizing
//! its structure for the content-gap analysis, and flagging stale content.
//! Nothing in this crate writes to the corpus.

mod error;
pub mod staleness;
pub mod summary;
pub mod walk;

pub use error::CorpusError;
pub use staleness::find_stale_references;
pub use summary::summarize;
pub use walk::{CorpusDocument, collect_documents};

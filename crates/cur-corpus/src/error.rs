//! Corpus error types.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    /// The corpus root does not exist or is not a directory.
    #[error("corpus root not found: {}", .0.display())]
    RootMissing(PathBuf),

    /// An exclude pattern is not a valid glob.
    #[error("invalid exclude glob '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

//! Cross-cutting error types for Curator.
//!
//! Subsystem errors (`DiscoveryError`, `RegistryError`, `LlmError`, ...) live in
//! their own crates. The binary converges them through `anyhow`.

use thiserror::Error;

/// Errors that can be raised while building or validating core types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (format, range, vocabulary).
    #[error("Validation error: {0}")]
    Validation(String),

    /// An identifier did not match any known variant.
    #[error("Unknown {kind}: {value}")]
    Unknown { kind: &'static str, value: String },
}

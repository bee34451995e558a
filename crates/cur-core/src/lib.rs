//! # cur-core
//!
//! Core types and error types shared by every Curator crate.
//!
//! - Entity structs for prompts, candidates, dependency records, link checks,
//!   suggestions, and the corpus summary
//! - Enums for run phases, subsystems, freshness, and failure kinds
//! - The terminal [`report::RunReport`] aggregate
//! - URL normalization used as the candidate identity key
//! - Text helpers for whitespace collapsing and char-safe truncation

pub mod entities;
pub mod enums;
pub mod errors;
pub mod report;
pub mod text;
pub mod url;

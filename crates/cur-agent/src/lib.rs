//! # cur-agent
//!
//! One Curator run, end to end.
//!
//! [`RunOrchestrator`] drives discovery, scoring, and the concurrent
//! checking subsystems (dependencies, links, content gaps) through
//! [`BoundedPool`]s, then synthesizes a [`RunReport`](cur_core::report::RunReport).
//! External interfaces arrive as trait objects in [`Services`], so every
//! subsystem can run against fakes.

pub mod artifacts;
pub mod gaps;
pub mod orchestrator;
pub mod pool;
pub mod ranking;
pub mod render;
pub mod scoring;
pub mod services;
pub mod synthesis;

pub use artifacts::{ReportWriteError, WrittenArtifacts, write_artifacts};
pub use gaps::{GapAnalyzer, SuggestionError};
pub use orchestrator::{PhaseHook, RunOrchestrator};
pub use pool::{BoundedPool, TaskOutcome};
pub use ranking::Cutoff;
pub use render::render_markdown;
pub use scoring::{RelevanceScorer, ScoringError};
pub use services::{ServiceError, Services};

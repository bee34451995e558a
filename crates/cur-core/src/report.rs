//! The terminal aggregate of one agent run.
//!
//! A [`RunReport`] is produced exactly once per run by the synthesizer and
//! then written to disk. Every subsystem gets a [`SubsystemStatus`], even
//! when it had nothing to do, so a degraded run is always visible.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{
    CorpusSummary, DependencyRecord, LinkCheckResult, ScoredCandidate, StaleReference, Suggestion,
};
use crate::enums::{Subsystem, SubsystemOutcome};

/// One recorded failure: what failed and why.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FailureNote {
    /// The prompt, package, URL, or candidate that failed.
    pub subject: String,
    pub reason: String,
}

impl FailureNote {
    #[must_use]
    pub fn new(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            reason: reason.into(),
        }
    }
}

/// Per-subsystem health for a run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SubsystemStatus {
    pub subsystem: Subsystem,
    pub outcome: SubsystemOutcome,
    /// Units of work scheduled (queries, scorings, lookups, probes, requests).
    pub attempted: usize,
    /// Units that failed, including those skipped after the run deadline.
    pub failed: usize,
    pub failures: Vec<FailureNote>,
}

impl SubsystemStatus {
    /// Build a status from the attempted count and the recorded failures.
    #[must_use]
    pub fn from_failures(subsystem: Subsystem, attempted: usize, failures: Vec<FailureNote>) -> Self {
        let failed = failures.len();
        Self {
            subsystem,
            outcome: SubsystemOutcome::from_counts(attempted, failed),
            attempted,
            failed,
            failures,
        }
    }

    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        matches!(self.outcome, SubsystemOutcome::Succeeded)
    }

    /// Human-readable degradation line, e.g. `2 of 5 search queries failed`.
    #[must_use]
    pub fn degradation_note(&self) -> Option<String> {
        if self.is_healthy() {
            return None;
        }
        Some(format!(
            "{}: {} of {} {} failed",
            self.subsystem,
            self.failed,
            self.attempted,
            self.subsystem.unit_label()
        ))
    }
}

/// Everything one run produced.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Whether the run deadline passed before every unit of work started.
    pub deadline_exceeded: bool,
    /// Ranked, deduplicated, truncated to the configured top-K.
    pub candidates: Vec<ScoredCandidate>,
    /// Sorted by package name, one per package.
    pub dependencies: Vec<DependencyRecord>,
    /// Failing link results only, sorted by source file then URL.
    pub broken_links: Vec<LinkCheckResult>,
    /// In the order the analyzer returned them.
    pub suggestions: Vec<Suggestion>,
    pub stale_content: Vec<StaleReference>,
    pub corpus: CorpusSummary,
    /// One entry per subsystem, in [`Subsystem::ALL`] order.
    pub subsystems: Vec<SubsystemStatus>,
}

impl RunReport {
    #[must_use]
    pub fn status(&self, subsystem: Subsystem) -> Option<&SubsystemStatus> {
        self.subsystems.iter().find(|s| s.subsystem == subsystem)
    }

    /// Whether any subsystem recorded a failure or the deadline was hit.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.deadline_exceeded || self.subsystems.iter().any(|s| !s.is_healthy())
    }

    /// Degradation lines for every unhealthy subsystem.
    #[must_use]
    pub fn degradation_notes(&self) -> Vec<String> {
        self.subsystems
            .iter()
            .filter_map(SubsystemStatus::degradation_note)
            .collect()
    }
}

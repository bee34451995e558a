//! Deterministic assembly of the run report.
//!
//! Synthesis cannot fail: whatever the subsystems produced (possibly
//! nothing) is sorted, deduplicated, and wrapped with its status.

use chrono::{DateTime, Utc};
use cur_core::entities::{
    CorpusSummary, DependencyRecord, LinkCheckResult, ScoredCandidate, StaleReference, Suggestion,
};
use cur_core::enums::Subsystem;
use cur_core::report::{RunReport, SubsystemStatus};

use crate::ranking::{self, Cutoff};

/// Everything the subsystems handed back for one run.
#[derive(Debug, Clone, Default)]
pub struct RunOutputs {
    pub scored: Vec<ScoredCandidate>,
    pub dependencies: Vec<DependencyRecord>,
    /// Every checked occurrence, failing or not.
    pub link_results: Vec<LinkCheckResult>,
    pub suggestions: Vec<Suggestion>,
    pub stale_content: Vec<StaleReference>,
    pub corpus: CorpusSummary,
    pub statuses: Vec<SubsystemStatus>,
    pub deadline_exceeded: bool,
}

/// Run identity and timing.
#[derive(Debug, Clone)]
pub struct RunMeta {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunMeta {
    /// Identifier derived from the start time, e.g. `run-20261018T120000Z`.
    #[must_use]
    pub fn run_id_for(started_at: DateTime<Utc>) -> String {
        format!("run-{}", started_at.format("%Y%m%dT%H%M%SZ"))
    }
}

/// Build the report.
#[must_use]
pub fn synthesize(meta: RunMeta, outputs: RunOutputs, cutoff: Cutoff) -> RunReport {
    let duration_ms = u64::try_from((meta.finished_at - meta.started_at).num_milliseconds()).unwrap_or(0);

    RunReport {
        run_id: meta.run_id,
        started_at: meta.started_at,
        finished_at: meta.finished_at,
        duration_ms,
        deadline_exceeded: outputs.deadline_exceeded,
        candidates: ranking::rank(outputs.scored, cutoff),
        dependencies: sort_dependencies(outputs.dependencies),
        broken_links: broken_links(outputs.link_results),
        suggestions: outputs.suggestions,
        stale_content: sort_stale(outputs.stale_content),
        corpus: outputs.corpus,
        subsystems: complete_statuses(outputs.statuses),
    }
}

fn sort_dependencies(mut records: Vec<DependencyRecord>) -> Vec<DependencyRecord> {
    records.sort_by(|a, b| a.package_name.cmp(&b.package_name));
    records.dedup_by(|a, b| a.package_name == b.package_name);
    records
}

fn broken_links(results: Vec<LinkCheckResult>) -> Vec<LinkCheckResult> {
    let mut failing: Vec<LinkCheckResult> = results.into_iter().filter(LinkCheckResult::is_failure).collect();
    failing.sort_by(|a, b| {
        a.source_file
            .cmp(&b.source_file)
            .then_with(|| a.url.cmp(&b.url))
            .then_with(|| a.line.cmp(&b.line))
    });
    failing.dedup_by(|a, b| a.source_file == b.source_file && a.url == b.url);
    failing
}

fn sort_stale(mut stale: Vec<StaleReference>) -> Vec<StaleReference> {
    stale.sort_by(|a, b| a.source_file.cmp(&b.source_file));
    stale
}

/// One status per subsystem in canonical order; missing ones count as idle.
fn complete_statuses(statuses: Vec<SubsystemStatus>) -> Vec<SubsystemStatus> {
    Subsystem::ALL
        .iter()
        .map(|&subsystem| {
            statuses
                .iter()
                .find(|s| s.subsystem == subsystem)
                .cloned()
                .unwrap_or_else(|| SubsystemStatus::from_failures(subsystem, 0, Vec::new()))
        })
        .collect()
}

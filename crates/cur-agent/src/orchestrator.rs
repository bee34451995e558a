//! The run state machine.
//!
//! ```text
//! idle → discovering → scoring → checking (dependencies ∥ links ∥ gaps) → synthesizing → done
//! ```
//!
//! Each subsystem fans out through its own [`BoundedPool`]. Failures are
//! recorded per unit of work and never abort the run; the only thing that
//! stops a subsystem early is the run deadline.

use std::fmt::Display;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use cur_config::CuratorConfig;
use cur_core::entities::{
    Candidate, CorpusSummary, DependencyRecord, LinkCheckResult, ScoredCandidate, SearchPrompt,
    StaleReference, Suggestion,
};
use cur_core::enums::{LinkErrorKind, RunPhase, Subsystem};
use cur_core::report::{FailureNote, RunReport, SubsystemStatus};
use cur_corpus::{CorpusDocument, CorpusError};
use cur_discovery::prompts::resolve_prompts;
use cur_discovery::{ScholarlyIndex, is_recent};
use cur_links::ProbeOutcome;
use tokio::time::Instant;

use crate::gaps::GapAnalyzer;
use crate::pool::{BoundedPool, TaskOutcome};
use crate::ranking::{self, Cutoff};
use crate::scoring::RelevanceScorer;
use crate::services::Services;
use crate::synthesis::{RunMeta, RunOutputs, synthesize};

/// Called on every phase transition.
pub type PhaseHook = Box<dyn Fn(RunPhase) + Send + Sync>;

/// Failure bookkeeping for one subsystem.
struct Tally {
    subsystem: Subsystem,
    attempted: usize,
    failures: Vec<FailureNote>,
    deadline_hit: bool,
}

impl Tally {
    const fn new(subsystem: Subsystem, attempted: usize) -> Self {
        Self {
            subsystem,
            attempted,
            failures: Vec::new(),
            deadline_hit: false,
        }
    }

    fn fail(&mut self, subject: &str, reason: String) {
        tracing::warn!(subsystem = %self.subsystem, subject, %reason, "unit of work failed");
        self.failures.push(FailureNote::new(subject, reason));
    }

    /// Record anything but a successful completion, passing the value through.
    fn settle<T, E: Display>(&mut self, subject: &str, outcome: TaskOutcome<Result<T, E>>) -> Option<T> {
        match outcome {
            TaskOutcome::Completed(Ok(value)) => Some(value),
            TaskOutcome::Completed(Err(error)) => {
                self.fail(subject, error.to_string());
                None
            }
            other => {
                self.unfinished(subject, &other);
                None
            }
        }
    }

    /// Record a unit that never produced a value (skipped, timed out, aborted).
    fn unfinished<T>(&mut self, subject: &str, outcome: &TaskOutcome<T>) {
        self.deadline_hit |= matches!(outcome, TaskOutcome::Skipped);
        if let Some(reason) = outcome.failure_reason() {
            self.fail(subject, reason);
        }
    }

    fn finish(self) -> (SubsystemStatus, bool) {
        let status = SubsystemStatus::from_failures(self.subsystem, self.attempted, self.failures);
        if let Some(note) = status.degradation_note() {
            tracing::warn!("{note}");
        }
        (status, self.deadline_hit)
    }
}

/// Corpus state shared by the checking subsystems.
struct CorpusScan {
    documents: Vec<CorpusDocument>,
    summary: CorpusSummary,
    error: Option<String>,
}

/// Drives one run from discovery to a finished [`RunReport`].
pub struct RunOrchestrator {
    config: Arc<CuratorConfig>,
    services: Services,
    phase: RunPhase,
    phase_hook: Option<PhaseHook>,
}

impl RunOrchestrator {
    #[must_use]
    pub fn new(config: CuratorConfig, services: Services) -> Self {
        Self {
            config: Arc::new(config),
            services,
            phase: RunPhase::Idle,
            phase_hook: None,
        }
    }

    #[must_use]
    pub fn with_phase_hook(mut self, hook: impl Fn(RunPhase) + Send + Sync + 'static) -> Self {
        self.phase_hook = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub const fn phase(&self) -> RunPhase {
        self.phase
    }

    fn advance(&mut self, next: RunPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "invalid run phase transition {} -> {next}",
            self.phase
        );
        tracing::info!(from = %self.phase, to = %next, "run phase");
        self.phase = next;
        if let Some(hook) = &self.phase_hook {
            hook(next);
        }
    }

    /// Execute the run. Never fails: problems end up in the report.
    pub async fn run(mut self) -> RunReport {
        let started_at = Utc::now();
        let deadline = Instant::now() + self.config.general.run_deadline();
        let mut outputs = RunOutputs::default();

        self.advance(RunPhase::Discovering);
        let prompts = resolve_prompts(&self.config.discovery, &self.config.corpus.root);
        tracing::info!(count = prompts.prompts.len(), origin = %prompts.origin, "resolved search prompts");
        let (candidates, status, hit) = self.discover(prompts.prompts, started_at, deadline).await;
        outputs.statuses.push(status);
        outputs.deadline_exceeded |= hit;

        self.advance(RunPhase::Scoring);
        let (scored, status, hit) = self.score(candidates, deadline).await;
        outputs.statuses.push(status);
        outputs.deadline_exceeded |= hit;

        self.advance(RunPhase::Checking);
        let scan = self.scan_corpus().await;
        let preview = ranking::rank(scored.clone(), Cutoff::from_config(&self.config.general));
        let (dependency_run, link_run, gap_run) = tokio::join!(
            self.check_dependencies(deadline),
            self.check_links(&scan, deadline),
            self.analyze_gaps(&scan.summary, preview, deadline),
        );
        let (dependencies, dep_status, dep_hit) = dependency_run;
        let (links, link_status, link_hit) = link_run;
        let (suggestions, gap_status, gap_hit) = gap_run;
        outputs.statuses.extend([dep_status, link_status, gap_status]);
        outputs.deadline_exceeded |= dep_hit || link_hit || gap_hit;

        self.advance(RunPhase::Synthesizing);
        outputs.scored = scored;
        outputs.dependencies = dependencies;
        outputs.link_results = links;
        outputs.suggestions = suggestions;
        outputs.stale_content = self.stale_content(&scan.documents, started_at);
        outputs.corpus = scan.summary;

        let meta = RunMeta {
            run_id: RunMeta::run_id_for(started_at),
            started_at,
            finished_at: Utc::now(),
        };
        let report = synthesize(meta, outputs, Cutoff::from_config(&self.config.general));

        self.advance(RunPhase::Done);
        report
    }

    async fn discover(
        &self,
        prompts: Vec<SearchPrompt>,
        now: DateTime<Utc>,
        deadline: Instant,
    ) -> (Vec<Candidate>, SubsystemStatus, bool) {
        let queries: Vec<(SearchPrompt, Arc<dyn ScholarlyIndex>)> = prompts
            .iter()
            .flat_map(|prompt| {
                self.services
                    .indexes
                    .iter()
                    .map(move |index| (prompt.clone(), Arc::clone(index)))
            })
            .collect();
        let subjects: Vec<String> = queries
            .iter()
            .map(|(prompt, index)| format!("{}: {}", index.name(), prompt.query))
            .collect();

        let pool = BoundedPool::new(
            self.config.limits.discovery_concurrency,
            self.config.discovery.timeout(),
        )
        .with_deadline(deadline);
        let per_prompt = self.config.discovery.results_per_prompt;
        let outcomes = pool
            .run(queries, move |(prompt, index)| async move {
                index.search(&prompt, per_prompt).await
            })
            .await;

        let mut tally = Tally::new(Subsystem::Discovery, subjects.len());
        let mut candidates = Vec::new();
        for (subject, outcome) in subjects.iter().zip(outcomes) {
            if let Some(found) = tally.settle(subject, outcome) {
                tracing::debug!(query = %subject, count = found.len(), "search completed");
                candidates.extend(found);
            }
        }

        let max_age = self.config.discovery.max_age_days;
        let before = candidates.len();
        candidates.retain(|c| is_recent(c, max_age, now));
        tracing::info!(
            found = before,
            kept = candidates.len(),
            max_age_days = max_age,
            "discovery finished"
        );

        let (status, hit) = tally.finish();
        (candidates, status, hit)
    }

    async fn score(
        &self,
        candidates: Vec<Candidate>,
        deadline: Instant,
    ) -> (Vec<ScoredCandidate>, SubsystemStatus, bool) {
        let scorer = Arc::new(RelevanceScorer::new(
            self.services.model.clone(),
            &self.config.llm,
            self.config.corpus.section_titles(),
        ));
        let subjects: Vec<String> = candidates.iter().map(|c| c.source_url.clone()).collect();

        let pool = BoundedPool::new(self.config.limits.scoring_concurrency, self.config.llm.timeout())
            .with_deadline(deadline);
        let outcomes = pool
            .run(candidates, move |candidate| {
                let scorer = Arc::clone(&scorer);
                async move { scorer.score(candidate).await }
            })
            .await;

        let mut tally = Tally::new(Subsystem::Scoring, subjects.len());
        let scored: Vec<ScoredCandidate> = subjects
            .iter()
            .zip(outcomes)
            .filter_map(|(subject, outcome)| tally.settle(subject, outcome))
            .collect();

        let (status, hit) = tally.finish();
        (scored, status, hit)
    }

    async fn scan_corpus(&self) -> CorpusScan {
        let config = Arc::clone(&self.config);
        let scanned = tokio::task::spawn_blocking(move || {
            let documents = cur_corpus::collect_documents(&config.corpus, Some(&config.general.output_dir))?;
            let summary = cur_corpus::summarize(&config.corpus, &documents);
            Ok::<_, CorpusError>((documents, summary))
        })
        .await;

        let error = match scanned {
            Ok(Ok((documents, summary))) => {
                tracing::info!(documents = documents.len(), "scanned corpus");
                return CorpusScan {
                    documents,
                    summary,
                    error: None,
                };
            }
            Ok(Err(error)) => error.to_string(),
            Err(error) => format!("corpus scan did not complete: {error}"),
        };
        tracing::warn!(root = %self.config.corpus.root.display(), %error, "corpus unavailable");
        CorpusScan {
            documents: Vec::new(),
            summary: cur_corpus::summarize(&self.config.corpus, &[]),
            error: Some(error),
        }
    }

    async fn check_dependencies(&self, deadline: Instant) -> (Vec<DependencyRecord>, SubsystemStatus, bool) {
        let specs = self.config.dependencies.clone();
        let subjects: Vec<String> = specs.iter().map(|s| s.name.clone()).collect();

        let pool = BoundedPool::new(self.config.limits.registry_concurrency, self.config.registry.timeout())
            .with_deadline(deadline);
        let packages = Arc::clone(&self.services.packages);
        let outcomes = pool
            .run(specs, move |spec| {
                let packages = Arc::clone(&packages);
                async move { packages.latest(&spec).await.map(|release| release.into_record(&spec)) }
            })
            .await;

        let mut tally = Tally::new(Subsystem::Dependencies, subjects.len());
        let records = subjects
            .iter()
            .zip(outcomes)
            .filter_map(|(subject, outcome)| tally.settle(subject, outcome))
            .collect();

        let (status, hit) = tally.finish();
        (records, status, hit)
    }

    async fn check_links(&self, scan: &CorpusScan, deadline: Instant) -> (Vec<LinkCheckResult>, SubsystemStatus, bool) {
        if let Some(error) = &scan.error {
            let mut tally = Tally::new(Subsystem::Links, 1);
            tally.fail(&self.config.corpus.root.display().to_string(), error.clone());
            let (status, hit) = tally.finish();
            return (Vec::new(), status, hit);
        }
        if !self.config.links.enabled {
            tracing::info!("link checking disabled");
            let (status, hit) = Tally::new(Subsystem::Links, 0).finish();
            return (Vec::new(), status, hit);
        }

        let occurrences = scan
            .documents
            .iter()
            .flat_map(|doc| cur_links::extract_links(&doc.rel_path, &doc.text));
        let plan = cur_links::plan(occurrences, &self.config.links);
        tracing::info!(
            external = plan.probe_count(),
            internal = plan.internal.len(),
            "checking links"
        );

        let mut results: Vec<LinkCheckResult> = plan
            .internal
            .iter()
            .map(|occurrence| cur_links::check_internal(&self.config.corpus.root, occurrence))
            .collect();

        // HEAD plus the one permitted GET fallback.
        let call_timeout = self.config.links.timeout() * 2;
        let pool = BoundedPool::new(self.config.limits.link_concurrency, call_timeout).with_deadline(deadline);
        let prober = Arc::clone(&self.services.prober);
        let urls: Vec<String> = plan.external.iter().map(|link| link.url.clone()).collect();
        let outcomes = pool
            .run(urls, move |url| {
                let prober = Arc::clone(&prober);
                async move { prober.probe(&url).await }
            })
            .await;

        let mut tally = Tally::new(Subsystem::Links, plan.probe_count());
        for (link, outcome) in plan.external.iter().zip(outcomes) {
            let probed = match outcome {
                TaskOutcome::Completed(probed) => probed,
                TaskOutcome::TimedOut(_) => ProbeOutcome::failed(LinkErrorKind::Timeout),
                other => {
                    tally.unfinished(&link.url, &other);
                    continue;
                }
            };
            if probed.error_kind.is_some() {
                tracing::debug!(url = %link.url, status = ?probed.http_status, kind = ?probed.error_kind, "link failed");
            }
            results.extend(cur_links::fan_out(link, probed));
        }

        let (status, hit) = tally.finish();
        (results, status, hit)
    }

    async fn analyze_gaps(
        &self,
        summary: &CorpusSummary,
        top_papers: Vec<ScoredCandidate>,
        deadline: Instant,
    ) -> (Vec<Suggestion>, SubsystemStatus, bool) {
        let analyzer = Arc::new(GapAnalyzer::new(self.services.model.clone(), &self.config.llm));
        let summary = summary.clone();

        let pool = BoundedPool::new(1, self.config.llm.timeout()).with_deadline(deadline);
        let mut outcomes = pool
            .run(vec![(summary, top_papers)], move |(summary, papers)| {
                let analyzer = Arc::clone(&analyzer);
                async move { analyzer.suggest(&summary, &papers).await }
            })
            .await;

        let mut tally = Tally::new(Subsystem::Suggestions, 1);
        let suggestions = outcomes
            .pop()
            .and_then(|outcome| tally.settle("content gap analysis", outcome))
            .unwrap_or_default();

        let (status, hit) = tally.finish();
        (suggestions, status, hit)
    }

    fn stale_content(&self, documents: &[CorpusDocument], now: DateTime<Utc>) -> Vec<StaleReference> {
        cur_corpus::find_stale_references(documents, now.year(), self.config.corpus.stale_after_years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tally_classifies_outcomes() {
        let mut tally = Tally::new(Subsystem::Discovery, 4);
        assert_eq!(tally.settle::<u8, String>("a", TaskOutcome::Completed(Ok(1))), Some(1));
        assert_eq!(tally.settle::<u8, String>("b", TaskOutcome::Completed(Err("HTTP 503".into()))), None);
        assert_eq!(tally.settle::<u8, String>("c", TaskOutcome::Skipped), None);
        assert_eq!(
            tally.settle::<u8, String>("d", TaskOutcome::TimedOut(std::time::Duration::from_secs(30))),
            None
        );

        let (status, hit) = tally.finish();
        assert!(hit);
        assert_eq!(status.failed, 3);
        let reasons: Vec<&str> = status.failures.iter().map(|f| f.reason.as_str()).collect();
        assert_eq!(
            reasons,
            vec!["HTTP 503", "skipped: run deadline exceeded", "timed out after 30s"]
        );
    }

    #[test]
    fn phases_advance_in_order() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let services = crate::services::Services::from_config(&CuratorConfig::default()).unwrap();
        let mut orchestrator = RunOrchestrator::new(CuratorConfig::default(), services)
            .with_phase_hook(move |phase| sink.lock().unwrap().push(phase));

        for phase in [
            RunPhase::Discovering,
            RunPhase::Scoring,
            RunPhase::Checking,
            RunPhase::Synthesizing,
            RunPhase::Done,
        ] {
            orchestrator.advance(phase);
        }
        assert_eq!(orchestrator.phase(), RunPhase::Done);
        assert_eq!(seen.lock().unwrap().len(), 5);
    }
}

//! End-to-end runs against in-memory fakes.

mod support;

use std::sync::Arc;

use cur_agent::{RunOrchestrator, render_markdown, write_artifacts};
use cur_core::enums::{Freshness, LinkErrorKind, Subsystem, SubsystemOutcome};
use cur_core::report::RunReport;
use pretty_assertions::assert_eq;
use support::{
    CountingProber, FakeIndex, FakeModel, FakePackages, Fakes, LookupBehavior, SearchBehavior, config,
    write_corpus,
};

async fn run(config: cur_config::CuratorConfig, fakes: &Fakes) -> RunReport {
    RunOrchestrator::new(config, fakes.services()).run().await
}

fn found(items: &[(&str, &str)]) -> SearchBehavior {
    SearchBehavior::Found(
        items
            .iter()
            .map(|(t, u)| ((*t).to_string(), (*u).to_string()))
            .collect(),
    )
}

#[tokio::test]
async fn failed_prompts_are_named_and_others_still_contribute() {
    let tmp = tempfile::tempdir().unwrap();
    let prompts = ["p0", "p1", "p2", "p3", "p4"];
    let fakes = Fakes {
        index: Arc::new(
            FakeIndex::default()
                .with("p0", found(&[("Alpha", "https://arxiv.org/abs/1")]))
                .with("p1", SearchBehavior::NetworkError)
                .with("p2", found(&[("Beta", "https://arxiv.org/abs/2")]))
                .with("p3", SearchBehavior::NetworkError)
                .with("p4", found(&[("Gamma", "https://arxiv.org/abs/3")])),
        ),
        ..Default::default()
    };

    let report = run(config(tmp.path(), &prompts, &[]), &fakes).await;

    let mut titles: Vec<&str> = report.candidates.iter().map(|c| c.candidate.title.as_str()).collect();
    titles.sort_unstable();
    assert_eq!(titles, vec!["Alpha", "Beta", "Gamma"]);
    let sources: Vec<usize> = report
        .candidates
        .iter()
        .flat_map(|c| c.candidate.origins.iter().map(|o| o.index))
        .collect();
    assert!(sources.iter().all(|i| [0, 2, 4].contains(i)));

    let discovery = report.status(Subsystem::Discovery).unwrap();
    assert_eq!(discovery.outcome, SubsystemOutcome::Degraded);
    assert_eq!((discovery.attempted, discovery.failed), (5, 2));
    let failed: Vec<&str> = discovery.failures.iter().map(|f| f.subject.as_str()).collect();
    assert_eq!(failed, vec!["fake: p1", "fake: p3"]);
    assert!(
        report
            .degradation_notes()
            .contains(&"discovery: 2 of 5 search queries failed".to_string())
    );
}

#[tokio::test]
async fn duplicate_url_keeps_best_score_and_both_origins() {
    let tmp = tempfile::tempdir().unwrap();
    let fakes = Fakes {
        index: Arc::new(
            FakeIndex::default()
                .with("memory", found(&[("Shared v1", "http://arxiv.org/abs/2401.00001v1")]))
                .with("planning", found(&[("Shared v2", "https://arxiv.org/pdf/2401.00001v2")])),
        ),
        model: Some(Arc::new(FakeModel::default().score("Shared v1", 7.0).score("Shared v2", 9.0))),
        ..Default::default()
    };

    let report = run(config(tmp.path(), &["memory", "planning"], &[]), &fakes).await;

    assert_eq!(report.candidates.len(), 1);
    let merged = &report.candidates[0];
    assert!((merged.score() - 9.0).abs() < f64::EPSILON);
    let origins: Vec<&str> = merged.candidate.origins.iter().map(|o| o.query.as_str()).collect();
    assert_eq!(origins, vec!["memory", "planning"]);
}

#[tokio::test]
async fn papers_below_relevance_floor_are_not_reported() {
    let tmp = tempfile::tempdir().unwrap();
    let fakes = Fakes {
        index: Arc::new(FakeIndex::default().with(
            "agents",
            found(&[
                ("Cooking Recipes", "https://arxiv.org/abs/9"),
                ("Planning Agents", "https://arxiv.org/abs/10"),
            ]),
        )),
        model: Some(Arc::new(
            FakeModel::default()
                .score("Cooking Recipes", 0.0)
                .score("Planning Agents", 8.0),
        )),
        ..Default::default()
    };

    let report = run(config(tmp.path(), &["agents"], &[]), &fakes).await;

    let titles: Vec<&str> = report.candidates.iter().map(|c| c.candidate.title.as_str()).collect();
    assert_eq!(titles, vec!["Planning Agents"]);
    assert!(report.status(Subsystem::Scoring).unwrap().is_healthy());

    let markdown = render_markdown(&report);
    assert!(markdown.contains("- **Relevant papers**: 1"));
    assert!(!markdown.contains("Cooking Recipes"));
}

#[tokio::test]
async fn timed_out_lookup_is_omitted_and_named() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = config(tmp.path(), &[], &["langchain", "crewai", "dspy-ai"]);
    config.registry.timeout_secs = 1;
    let fakes = Fakes {
        packages: Arc::new(
            FakePackages::default()
                .with("langchain", LookupBehavior::Latest("1.2.0"))
                .with("crewai", LookupBehavior::Hang)
                .with("dspy-ai", LookupBehavior::Latest("1.0.0")),
        ),
        ..Default::default()
    };

    let report = run(config, &fakes).await;

    let names: Vec<&str> = report.dependencies.iter().map(|d| d.package_name.as_str()).collect();
    assert_eq!(names, vec!["dspy-ai", "langchain"]);
    assert_eq!(report.dependencies[0].freshness, Freshness::Current);
    assert_eq!(report.dependencies[1].freshness, Freshness::Behind);

    let status = report.status(Subsystem::Dependencies).unwrap();
    assert_eq!(status.failures.len(), 1);
    assert_eq!(status.failures[0].subject, "crewai");
    assert!(status.failures[0].reason.starts_with("timed out"));
    assert!(!report.deadline_exceeded);
}

#[tokio::test]
async fn shared_broken_url_is_probed_once_and_reported_per_file() {
    let tmp = tempfile::tempdir().unwrap();
    let dead = "https://example.org/gone";
    write_corpus(
        tmp.path(),
        &[
            ("01-foundations/a.md", "# A\n\nSee [gone](https://example.org/gone).\n"),
            ("02-implementation/b.md", "# B\n\n[again](https://example.org/gone)\n"),
            ("05-research/c.md", "# C\n\nA <https://example.org/gone> autolink.\n[ok](https://example.org/fine)\n"),
        ],
    );
    let fakes = Fakes {
        prober: Arc::new(CountingProber::default().status(dead, 404)),
        ..Default::default()
    };

    let report = run(config(tmp.path(), &[], &[]), &fakes).await;

    assert_eq!(fakes.prober.probe_count(dead), 1);
    assert_eq!(fakes.prober.total_probes(), 2);
    let files: Vec<&str> = report.broken_links.iter().map(|l| l.source_file.as_str()).collect();
    assert_eq!(
        files,
        vec!["01-foundations/a.md", "02-implementation/b.md", "05-research/c.md"]
    );
    assert!(
        report
            .broken_links
            .iter()
            .all(|l| l.http_status == Some(404) && l.error_kind == Some(LinkErrorKind::BadStatus))
    );
    assert!(report.status(Subsystem::Links).unwrap().is_healthy());
}

#[tokio::test]
async fn missing_internal_target_needs_no_probe() {
    let tmp = tempfile::tempdir().unwrap();
    write_corpus(
        tmp.path(),
        &[
            ("01-foundations/a.md", "[next](../02-implementation/b.md) and [lost](missing.md)\n"),
            ("02-implementation/b.md", "# B\n"),
        ],
    );
    let fakes = Fakes::default();

    let report = run(config(tmp.path(), &[], &[]), &fakes).await;

    assert_eq!(fakes.prober.total_probes(), 0);
    assert_eq!(report.broken_links.len(), 1);
    assert_eq!(report.broken_links[0].url, "missing.md");
    assert_eq!(report.broken_links[0].error_kind, Some(LinkErrorKind::MissingTarget));
}

#[tokio::test]
async fn empty_inputs_yield_empty_healthy_report() {
    let tmp = tempfile::tempdir().unwrap();
    let fakes = Fakes::default();

    let report = run(config(tmp.path(), &["nothing here"], &[]), &fakes).await;

    assert!(report.candidates.is_empty());
    assert!(report.dependencies.is_empty());
    assert!(report.broken_links.is_empty());
    assert_eq!(report.suggestions.len(), 2);
    assert!(!report.is_degraded(), "{:?}", report.degradation_notes());
    assert_eq!(report.subsystems.len(), Subsystem::ALL.len());
}

#[tokio::test]
async fn missing_model_fails_scoring_and_suggestions() {
    let tmp = tempfile::tempdir().unwrap();
    let fakes = Fakes {
        index: Arc::new(FakeIndex::default().with("q", found(&[("Alpha", "https://arxiv.org/abs/1")]))),
        model: None,
        ..Default::default()
    };

    let report = run(config(tmp.path(), &["q"], &[]), &fakes).await;

    assert!(report.candidates.is_empty());
    let scoring = report.status(Subsystem::Scoring).unwrap();
    assert_eq!(scoring.outcome, SubsystemOutcome::Failed);
    assert_eq!(scoring.failures[0].reason, "no language model configured");
    assert_eq!(
        report.status(Subsystem::Suggestions).unwrap().outcome,
        SubsystemOutcome::Failed
    );
}

#[tokio::test]
async fn expired_deadline_skips_work_but_still_reports() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = config(tmp.path(), &["a", "b"], &["langchain"]);
    config.general.run_deadline_secs = 0;
    let fakes = Fakes::default();

    let report = run(config, &fakes).await;

    assert!(report.deadline_exceeded);
    assert!(fakes.index.calls.lock().unwrap().is_empty());
    let discovery = report.status(Subsystem::Discovery).unwrap();
    assert_eq!(discovery.outcome, SubsystemOutcome::Failed);
    assert!(discovery.failures.iter().all(|f| f.reason == "skipped: run deadline exceeded"));
    assert!(report.dependencies.is_empty());
}

#[tokio::test]
async fn missing_corpus_root_degrades_links_only() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("does-not-exist");
    let fakes = Fakes::default();

    let report = run(config(&root, &[], &[]), &fakes).await;

    assert_eq!(report.status(Subsystem::Links).unwrap().outcome, SubsystemOutcome::Failed);
    assert_eq!(report.corpus.sections.len(), 6);
    assert!(report.corpus.sections.iter().all(|s| !s.exists));
    assert!(report.status(Subsystem::Suggestions).unwrap().is_healthy());
}

#[tokio::test]
async fn report_and_artifact_are_written() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config(tmp.path(), &[], &[]);
    let report_path = config.general.report_path();
    let artifact_path = config.general.artifact_path();
    let fakes = Fakes::default();

    let report = run(config, &fakes).await;
    write_artifacts(&report, &report_path, &artifact_path).unwrap();

    let markdown = std::fs::read_to_string(report_path).unwrap();
    assert!(markdown.contains("## Content Improvement Suggestions"));
    assert!(markdown.contains("Cover agent memory"));
    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(artifact_path).unwrap()).unwrap();
    assert_eq!(json["suggestions"].as_array().map(Vec::len), Some(2));
}

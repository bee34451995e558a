use anyhow::Context;
use cur_agent::{RunOrchestrator, Services, write_artifacts};
use cur_core::report::RunReport;
use serde::Serialize;
use std::io::Write;

use crate::bootstrap;
use crate::cli::{GlobalFlags, OutputFormat, RunArgs};
use crate::output::write_to;
use crate::progress::Progress;
use crate::warnings;

/// What `curator run` prints once the artifacts are on disk.
#[derive(Debug, Serialize)]
struct RunSummary {
    run_id: String,
    report: String,
    artifact: String,
    duration_ms: u64,
    papers: usize,
    dependencies: usize,
    outdated_dependencies: usize,
    broken_links: usize,
    suggestions: usize,
    stale_files: usize,
    degraded: bool,
    degradation: Vec<String>,
}

impl RunSummary {
    fn new(report: &RunReport, report_path: &std::path::Path, artifact_path: &std::path::Path) -> Self {
        Self {
            run_id: report.run_id.clone(),
            report: report_path.display().to_string(),
            artifact: artifact_path.display().to_string(),
            duration_ms: report.duration_ms,
            papers: report.candidates.len(),
            dependencies: report.dependencies.len(),
            outdated_dependencies: report.dependencies.iter().filter(|d| d.is_outdated()).count(),
            broken_links: report.broken_links.len(),
            suggestions: report.suggestions.len(),
            stale_files: report.stale_content.len(),
            degraded: report.is_degraded(),
            degradation: report.degradation_notes(),
        }
    }
}

/// Handle `curator run` (and bare `curator`).
pub async fn handle(args: &RunArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = bootstrap::load_run_config(args)?;
    warnings::warn_unconfigured(&config);

    let services = Services::from_config(&config).context("failed to initialize external clients")?;
    let report_path = config.general.report_path();
    let artifact_path = config.general.artifact_path();

    let progress = Progress::spinner("starting run");
    let hook_progress = progress.clone();
    let report = RunOrchestrator::new(config, services)
        .with_phase_hook(move |phase| hook_progress.set_message(&format!("{phase}")))
        .run()
        .await;

    let written = match write_artifacts(&report, &report_path, &artifact_path) {
        Ok(written) => written,
        Err(error) => {
            progress.finish_err("failed to write report");
            return Err(error).context("run finished but its report could not be saved");
        }
    };

    if report.is_degraded() {
        progress.finish_ok("run finished with degraded subsystems");
    } else {
        progress.finish_ok("run finished");
    }

    let summary = RunSummary::new(&report, &written.report_path, &written.artifact_path);
    print_summary(&mut std::io::stdout().lock(), &summary, flags.format);
    Ok(())
}

/// The report is already on disk here, so a failed print only warns.
fn print_summary<W: Write>(out: &mut W, summary: &RunSummary, format: OutputFormat) {
    if let Err(error) = write_to(out, summary, format) {
        tracing::warn!(error = %format!("{error:#}"), "could not print run summary");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cur_agent::Cutoff;
    use cur_agent::synthesis::{RunMeta, RunOutputs, synthesize};
    use pretty_assertions::assert_eq;
    use std::io;
    use std::path::Path;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    fn summary() -> RunSummary {
        let now = Utc::now();
        let report = synthesize(
            RunMeta {
                run_id: RunMeta::run_id_for(now),
                started_at: now,
                finished_at: now,
            },
            RunOutputs::default(),
            Cutoff::new(15, 5.0),
        );
        RunSummary::new(
            &report,
            Path::new("out/update_report.md"),
            Path::new("out/update_suggestions.json"),
        )
    }

    #[test]
    fn summary_is_printed_as_json() {
        let mut buf = Vec::new();
        print_summary(&mut buf, &summary(), OutputFormat::Raw);
        let printed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(printed["report"], "out/update_report.md");
        assert_eq!(printed["papers"], 0);
        assert_eq!(printed["degraded"], false);
    }

    #[test]
    fn unwritable_stdout_is_not_fatal() {
        let mut pipe = ClosedPipe;
        print_summary(&mut pipe, &summary(), OutputFormat::Json);
        assert!(write_to(&mut pipe, &summary(), OutputFormat::Json).is_err());
    }
}

//! Markdown rendering of a [`RunReport`].

use std::fmt::Write;

use cur_core::entities::{DependencyRecord, LinkCheckResult};
use cur_core::report::RunReport;
use cur_core::text::escape_table_cell;

/// Authors listed per paper before eliding.
const AUTHORS_SHOWN: usize = 3;

/// Render the human-readable report.
#[must_use]
pub fn render_markdown(report: &RunReport) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &RunReport) -> std::fmt::Result {
    writeln!(out, "# Knowledge Base Update Report\n")?;
    writeln!(out, "**Generated**: {}  ", report.finished_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(out, "**Run**: `{}` ({:.1}s)\n", report.run_id, duration_secs(report.duration_ms))?;

    write_summary(out, report)?;
    write_degradation(out, report)?;
    write_papers(out, report)?;
    write_dependencies(out, &report.dependencies)?;
    write_links(out, &report.broken_links)?;
    write_suggestions(out, report)?;
    write_stale(out, report)?;
    write_corpus(out, report)?;
    write_actions(out, report)?;

    writeln!(out, "---\n\n*Generated automatically by curator. Review before changing content.*")
}

#[allow(clippy::cast_precision_loss)]
fn duration_secs(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

fn write_summary(out: &mut String, report: &RunReport) -> std::fmt::Result {
    let outdated = report.dependencies.iter().filter(|d| d.is_outdated()).count();
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Relevant papers**: {}", report.candidates.len())?;
    writeln!(
        out,
        "- **Tracked dependencies**: {} ({outdated} behind)",
        report.dependencies.len()
    )?;
    writeln!(out, "- **Broken links**: {}", report.broken_links.len())?;
    writeln!(out, "- **Suggestions**: {}", report.suggestions.len())?;
    writeln!(out, "- **Files with stale references**: {}\n", report.stale_content.len())
}

fn write_degradation(out: &mut String, report: &RunReport) -> std::fmt::Result {
    writeln!(out, "## Run Health\n")?;
    if !report.is_degraded() {
        return writeln!(out, "All subsystems completed without errors.\n");
    }
    if report.deadline_exceeded {
        writeln!(out, "- The run deadline passed; remaining work was skipped.")?;
    }
    for note in report.degradation_notes() {
        writeln!(out, "- {note}")?;
    }
    for status in report.subsystems.iter().filter(|s| !s.failures.is_empty()) {
        writeln!(out, "\n<details><summary>{} failures</summary>\n", status.subsystem)?;
        for failure in &status.failures {
            writeln!(out, "- `{}`: {}", failure.subject, failure.reason)?;
        }
        writeln!(out, "\n</details>")?;
    }
    writeln!(out)
}

fn write_papers(out: &mut String, report: &RunReport) -> std::fmt::Result {
    writeln!(out, "## New Relevant Papers\n")?;
    if report.candidates.is_empty() {
        return writeln!(out, "*No relevant papers found in this cycle.*\n");
    }
    for (rank, scored) in report.candidates.iter().enumerate() {
        let paper = &scored.candidate;
        writeln!(out, "### {}. {}\n", rank + 1, paper.title)?;

        let mut authors = paper.authors[..paper.authors.len().min(AUTHORS_SHOWN)].join(", ");
        if paper.authors.len() > AUTHORS_SHOWN {
            authors.push_str(" et al.");
        }
        if !authors.is_empty() {
            writeln!(out, "- **Authors**: {authors}")?;
        }
        let published = paper
            .published
            .map_or_else(|| "unknown".to_string(), |d| d.format("%Y-%m-%d").to_string());
        writeln!(out, "- **Published**: {published}")?;
        writeln!(out, "- **Relevance**: {:.1}/10", scored.score())?;
        writeln!(out, "- **Reason**: {}", scored.relevance.rationale)?;
        writeln!(out, "- **Suggested section**: {}", scored.relevance.suggested_section)?;
        writeln!(out, "- **URL**: {}\n", paper.source_url)?;
    }
    Ok(())
}

fn write_dependencies(out: &mut String, records: &[DependencyRecord]) -> std::fmt::Result {
    writeln!(out, "## Dependency Freshness\n")?;
    if records.is_empty() {
        return writeln!(out, "*No dependency information collected.*\n");
    }
    writeln!(out, "| Package | Ecosystem | Tracked | Latest | Released | Status |")?;
    writeln!(out, "|---|---|---|---|---|---|")?;
    for record in records {
        let released = record
            .release_date
            .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string());
        writeln!(
            out,
            "| {} | {} | {} | {} | {released} | {} |",
            escape_table_cell(&record.package_name),
            record.ecosystem,
            escape_table_cell(&record.tracked_baseline_version),
            escape_table_cell(&record.latest_observed_version),
            record.freshness,
        )?;
    }
    writeln!(out)
}

fn write_links(out: &mut String, links: &[LinkCheckResult]) -> std::fmt::Result {
    writeln!(out, "## Broken Links\n")?;
    if links.is_empty() {
        return writeln!(out, "*No broken links detected.*\n");
    }
    writeln!(out, "| File | Line | Text | URL | Problem |")?;
    writeln!(out, "|---|---|---|---|---|")?;
    for link in links {
        let problem = match (link.http_status, link.error_kind) {
            (Some(status), _) => format!("HTTP {status}"),
            (None, Some(kind)) => kind.to_string(),
            (None, None) => "-".to_string(),
        };
        writeln!(
            out,
            "| `{}` | {} | {} | {} | {problem} |",
            link.source_file,
            link.line,
            escape_table_cell(&link.link_text),
            escape_table_cell(&link.url),
        )?;
    }
    writeln!(out)
}

fn write_suggestions(out: &mut String, report: &RunReport) -> std::fmt::Result {
    writeln!(out, "## Content Improvement Suggestions\n")?;
    if report.suggestions.is_empty() {
        return writeln!(out, "*No suggestions generated.*\n");
    }
    for (i, suggestion) in report.suggestions.iter().enumerate() {
        writeln!(
            out,
            "{}. **[{}]** {}\n   - {}",
            i + 1,
            suggestion.category,
            suggestion.description,
            suggestion.rationale
        )?;
    }
    writeln!(out)
}

fn write_stale(out: &mut String, report: &RunReport) -> std::fmt::Result {
    if report.stale_content.is_empty() {
        return Ok(());
    }
    writeln!(out, "## Possibly Outdated Content\n")?;
    for stale in &report.stale_content {
        let years: Vec<String> = stale.years.iter().map(ToString::to_string).collect();
        writeln!(out, "- `{}` mentions {}", stale.source_file, years.join(", "))?;
    }
    writeln!(out)
}

fn write_corpus(out: &mut String, report: &RunReport) -> std::fmt::Result {
    if report.corpus.sections.is_empty() {
        return Ok(());
    }
    writeln!(out, "## Knowledge Base Overview\n")?;
    writeln!(out, "| Section | Directory | Documents | Other files |")?;
    writeln!(out, "|---|---|---|---|")?;
    for section in &report.corpus.sections {
        if section.exists {
            writeln!(
                out,
                "| {} | `{}` | {} | {} |",
                escape_table_cell(&section.title),
                section.dir,
                section.markdown_files,
                section.other_files
            )?;
        } else {
            writeln!(out, "| {} | `{}` | missing | - |", escape_table_cell(&section.title), section.dir)?;
        }
    }
    writeln!(out)
}

fn write_actions(out: &mut String, report: &RunReport) -> std::fmt::Result {
    writeln!(out, "## Action Items\n")?;
    let mut items = Vec::new();
    if !report.candidates.is_empty() {
        items.push(format!(
            "**Review top papers**: evaluate the {} highest-scoring papers for inclusion",
            report.candidates.len().min(5)
        ));
    }
    if report.dependencies.iter().any(DependencyRecord::is_outdated) {
        items.push("**Update dependency versions**: refresh version references that are behind".to_string());
    }
    if !report.broken_links.is_empty() {
        items.push(format!(
            "**Fix broken links**: update or remove {} links",
            report.broken_links.len()
        ));
    }
    if !report.suggestions.is_empty() {
        items.push("**Consider suggestions**: review the proposed content improvements".to_string());
    }
    if !report.stale_content.is_empty() {
        items.push(format!(
            "**Check stale content**: {} files reference older years",
            report.stale_content.len()
        ));
    }
    if report.is_degraded() {
        items.push("**Investigate failures**: some subsystems did not complete, see Run Health".to_string());
    }

    if items.is_empty() {
        return writeln!(out, "*No significant updates found. The knowledge base appears current.*\n");
    }
    for (i, item) in items.iter().enumerate() {
        writeln!(out, "{}. {item}", i + 1)?;
    }
    writeln!(out)
}

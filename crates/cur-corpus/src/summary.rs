//! Structural corpus summary for the content-gap analysis.
//!
//! Per configured section: whether the directory exists, how many documents
//! and other files it holds, and the leading heading of up to
//! `corpus.max_headings` documents. Never the full text.

use cur_config::CorpusConfig;
use cur_core::entities::{CorpusSummary, SectionSummary};
use cur_core::text::collapse_whitespace;

use crate::walk::{CorpusDocument, has_extension, walk_files};

/// Summarize `documents` (as returned by [`crate::collect_documents`]).
#[must_use]
pub fn summarize(config: &CorpusConfig, documents: &[CorpusDocument]) -> CorpusSummary {
    let extensions: Vec<String> = config
        .extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
        .collect();

    let sections = config
        .sections
        .iter()
        .map(|section| {
            let dir = config.root.join(&section.dir);
            let prefix = format!("{}/", section.dir.trim_end_matches('/'));
            let docs: Vec<&CorpusDocument> = documents
                .iter()
                .filter(|d| d.rel_path.starts_with(&prefix))
                .collect();
            let exists = dir.is_dir();
            let other_files = if exists {
                walk_files(&dir, None)
                    .iter()
                    .filter(|p| !has_extension(p, &extensions))
                    .count()
            } else {
                0
            };
            SectionSummary {
                dir: section.dir.clone(),
                title: section.title.clone(),
                exists,
                markdown_files: docs.len(),
                other_files,
                headings: docs
                    .iter()
                    .filter_map(|d| leading_heading(&d.text))
                    .take(config.max_headings)
                    .collect(),
            }
        })
        .collect();

    CorpusSummary {
        sections,
        total_markdown_files: documents.len(),
    }
}

/// First ATX heading (`#` to `######`) outside fenced code.
#[must_use]
pub fn leading_heading(text: &str) -> Option<String> {
    let mut in_fence = false;
    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        let hashes = trimmed.chars().take_while(|c| *c == '#').count();
        if (1..=6).contains(&hashes) {
            let rest = &trimmed[hashes..];
            if rest.starts_with(' ') || rest.starts_with('\t') {
                let heading = collapse_whitespace(rest.trim().trim_end_matches('#'));
                if !heading.is_empty() {
                    return Some(heading);
                }
            }
        }
    }
    None
}

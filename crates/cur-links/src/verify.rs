//! Link check planning, filesystem checks, and result fan-out.
//!
//! Occurrences are deduplicated per `(source_file, url)`, then external URLs
//! are grouped so each unique URL is probed once and its outcome is copied
//! to every occurrence.

use cur_config::LinksConfig;
use cur_core::entities::{LinkCheckResult, LinkOccurrence};
use cur_core::enums::LinkErrorKind;
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

use crate::extract::{LinkTarget, classify};
use crate::probe::ProbeOutcome;

/// A unique external URL and every occurrence referencing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalLink {
    pub url: String,
    pub occurrences: Vec<LinkOccurrence>,
}

/// What needs checking, split by how it is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPlan {
    /// Unique external URLs, in first-seen order.
    pub external: Vec<ExternalLink>,
    /// Relative links, checked against the filesystem.
    pub internal: Vec<LinkOccurrence>,
}

impl LinkPlan {
    /// Number of probes the plan will issue.
    #[must_use]
    pub fn probe_count(&self) -> usize {
        self.external.len()
    }
}

/// Build a check plan from raw occurrences.
#[must_use]
pub fn plan<I>(occurrences: I, config: &LinksConfig) -> LinkPlan
where
    I: IntoIterator<Item = LinkOccurrence>,
{
    let mut seen = HashSet::new();
    let mut by_url: HashMap<String, usize> = HashMap::new();
    let mut plan = LinkPlan::default();

    for occurrence in occurrences {
        if !seen.insert((occurrence.source_file.clone(), occurrence.url.clone())) {
            continue;
        }
        match classify(&occurrence.url) {
            LinkTarget::External if !config.is_skipped(&occurrence.url) => {
                if let Some(&slot) = by_url.get(&occurrence.url) {
                    plan.external[slot].occurrences.push(occurrence);
                } else {
                    by_url.insert(occurrence.url.clone(), plan.external.len());
                    plan.external.push(ExternalLink {
                        url: occurrence.url.clone(),
                        occurrences: vec![occurrence],
                    });
                }
            }
            LinkTarget::Internal if config.check_internal => plan.internal.push(occurrence),
            _ => {}
        }
    }

    plan
}

/// Copy one probe outcome to every occurrence of the URL.
#[must_use]
pub fn fan_out(link: &ExternalLink, outcome: ProbeOutcome) -> Vec<LinkCheckResult> {
    link.occurrences
        .iter()
        .map(|occ| LinkCheckResult::from_occurrence(occ, outcome.http_status, outcome.error_kind))
        .collect()
}

/// Check a relative link against the corpus on disk.
///
/// Paths starting with `/` resolve from the corpus root, others from the
/// linking file's directory. Fragments and queries are ignored.
#[must_use]
pub fn check_internal(root: &Path, occurrence: &LinkOccurrence) -> LinkCheckResult {
    let exists = resolve_internal(root, occurrence).is_none_or(|target| target.exists());
    let error_kind = (!exists).then_some(LinkErrorKind::MissingTarget);
    LinkCheckResult::from_occurrence(occurrence, None, error_kind)
}

/// Filesystem target of a relative link; `None` for same-document links.
fn resolve_internal(root: &Path, occurrence: &LinkOccurrence) -> Option<PathBuf> {
    let path_part = occurrence
        .url
        .split(['#', '?'])
        .next()
        .unwrap_or_default();
    if path_part.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(path_part).map_or_else(|_| path_part.to_string(), |d| d.into_owned());

    let base = if decoded.starts_with('/') {
        PathBuf::new()
    } else {
        Path::new(&occurrence.source_file)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    };

    Some(root.join(normalize(&base.join(decoded.trim_start_matches('/')))))
}

/// Resolve `.` and `..` lexically so a link cannot be checked outside the root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
            _ => {}
        }
    }
    out
}

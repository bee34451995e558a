//! Link extraction from markdown text.
//!
//! Recognizes inline links and images (`[text](url "title")`) and autolinks
//! (`<https://...>`), outside fenced code blocks and inline code spans.
//! Extraction is pure: no filesystem or network access.

use cur_core::entities::LinkOccurrence;
use regex::Regex;
use std::sync::LazyLock;

static INLINE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\[([^\]]*)\]\(\s*<?((?:[^()\s<>]|\([^()\s]*\))+)>?(?:\s+(?:"[^"]*"|'[^']*'))?\s*\)"#,
    )
    .expect("valid inline link regex")
});

static AUTOLINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(https?://[^>\s]+)>").expect("valid autolink regex"));

static CODE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`]*`").expect("valid code span regex"));

/// What a link points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// `http` or `https` URL, probed over the network.
    External,
    /// Relative path, checked against the filesystem.
    Internal,
    /// Anchors, `mailto:`, and other schemes; never checked.
    Ignored,
}

/// Classify a link destination.
#[must_use]
pub fn classify(url: &str) -> LinkTarget {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        LinkTarget::External
    } else if url.starts_with('#') || url.starts_with("//") || has_scheme(&lower) {
        LinkTarget::Ignored
    } else {
        LinkTarget::Internal
    }
}

fn has_scheme(url: &str) -> bool {
    url.split_once(':').is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Every link in `text`, attributed to `source_file`, in document order.
#[must_use]
pub fn extract_links(source_file: &str, text: &str) -> Vec<LinkOccurrence> {
    let mut out = Vec::new();
    let mut in_fence = false;

    for (idx, raw_line) in text.lines().enumerate() {
        let trimmed = raw_line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        let line = CODE_SPAN.replace_all(raw_line, "");
        let mut found: Vec<(usize, String, String)> = Vec::new();
        let mut spans = Vec::new();
        for c in INLINE_LINK.captures_iter(&line) {
            let Some(whole) = c.get(0) else { continue };
            spans.push(whole.range());
            found.push((whole.start(), c[1].trim().to_string(), c[2].to_string()));
        }
        // An `<url>` destination inside an inline link is not a separate autolink.
        for c in AUTOLINK.captures_iter(&line) {
            let Some(whole) = c.get(0) else { continue };
            if spans.iter().any(|span| span.contains(&whole.start())) {
                continue;
            }
            found.push((whole.start(), c[1].to_string(), c[1].to_string()));
        }
        found.sort_by_key(|(start, _, _)| *start);

        out.extend(found.into_iter().map(|(_, link_text, url)| LinkOccurrence {
            source_file: source_file.to_string(),
            line: idx + 1,
            link_text,
            url,
        }));
    }

    out
}

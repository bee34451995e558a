use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::LinkErrorKind;

/// A link found in a corpus document.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct LinkOccurrence {
    /// Path relative to the corpus root, `/`-separated.
    pub source_file: String,
    /// 1-based line of the link.
    pub line: usize,
    pub link_text: String,
    pub url: String,
}

/// Outcome of checking one link occurrence.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LinkCheckResult {
    pub source_file: String,
    pub line: usize,
    pub link_text: String,
    pub url: String,
    pub http_status: Option<u16>,
    /// `None` when the link resolved successfully.
    pub error_kind: Option<LinkErrorKind>,
}

impl LinkCheckResult {
    #[must_use]
    pub fn from_occurrence(
        occurrence: &LinkOccurrence,
        http_status: Option<u16>,
        error_kind: Option<LinkErrorKind>,
    ) -> Self {
        Self {
            source_file: occurrence.source_file.clone(),
            line: occurrence.line,
            link_text: occurrence.link_text.clone(),
            url: occurrence.url.clone(),
            http_status,
            error_kind,
        }
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        self.error_kind.is_some()
    }
}

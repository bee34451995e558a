//! Run phases, subsystems, outcomes, and classification enums for Curator.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! [`RunPhase`] provides `allowed_next_states()` so the orchestrator can
//! enforce its state machine.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// RunPhase
// ---------------------------------------------------------------------------

/// Phase of a single agent run.
///
/// ```text
/// idle → discovering → scoring → checking → synthesizing → done
/// ```
///
/// `checking` covers the dependency, link, and gap subsystems, which run
/// concurrently. There is no transition out of `done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Idle,
    Discovering,
    Scoring,
    Checking,
    Synthesizing,
    Done,
}

impl RunPhase {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Idle => &[Self::Discovering],
            Self::Discovering => &[Self::Scoring],
            Self::Scoring => &[Self::Checking],
            Self::Checking => &[Self::Synthesizing],
            Self::Synthesizing => &[Self::Done],
            Self::Done => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Discovering => "discovering",
            Self::Scoring => "scoring",
            Self::Checking => "checking",
            Self::Synthesizing => "synthesizing",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Subsystem
// ---------------------------------------------------------------------------

/// A failure-isolated part of the run, reported separately in the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Subsystem {
    Discovery,
    Scoring,
    Dependencies,
    Links,
    Suggestions,
}

impl Subsystem {
    pub const ALL: [Self; 5] = [
        Self::Discovery,
        Self::Scoring,
        Self::Dependencies,
        Self::Links,
        Self::Suggestions,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Discovery => "discovery",
            Self::Scoring => "scoring",
            Self::Dependencies => "dependencies",
            Self::Links => "links",
            Self::Suggestions => "suggestions",
        }
    }

    /// Noun used for one unit of work in degradation notes.
    #[must_use]
    pub const fn unit_label(self) -> &'static str {
        match self {
            Self::Discovery => "search queries",
            Self::Scoring => "candidate scorings",
            Self::Dependencies => "package lookups",
            Self::Links => "link probes",
            Self::Suggestions => "suggestion requests",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SubsystemOutcome
// ---------------------------------------------------------------------------

/// Aggregate outcome of one subsystem for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubsystemOutcome {
    /// Every unit of work succeeded (including the empty case).
    Succeeded,
    /// Some units failed, at least one succeeded.
    Degraded,
    /// Every attempted unit failed.
    Failed,
}

impl SubsystemOutcome {
    /// Classify from attempted and failed counts.
    ///
    /// Zero attempts is a success: an empty input is a valid empty result.
    #[must_use]
    pub const fn from_counts(attempted: usize, failed: usize) -> Self {
        if failed == 0 {
            Self::Succeeded
        } else if failed >= attempted {
            Self::Failed
        } else {
            Self::Degraded
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Degraded => "degraded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SubsystemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Ecosystem
// ---------------------------------------------------------------------------

/// Package index a tracked dependency is published to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Ecosystem {
    Pypi,
    Crates,
    Npm,
    /// GitHub releases, `name` is `owner/repo`.
    Github,
}

impl Ecosystem {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pypi => "pypi",
            Self::Crates => "crates",
            Self::Npm => "npm",
            Self::Github => "github",
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ecosystem {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pypi" | "python" => Ok(Self::Pypi),
            "crates" | "crates.io" | "cargo" | "rust" => Ok(Self::Crates),
            "npm" | "javascript" | "typescript" => Ok(Self::Npm),
            "github" | "gh" => Ok(Self::Github),
            other => Err(CoreError::Unknown {
                kind: "ecosystem",
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Freshness
// ---------------------------------------------------------------------------

/// Display-only comparison of a tracked baseline against the latest release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    Current,
    Behind,
    Ahead,
    Unknown,
}

impl Freshness {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Behind => "behind",
            Self::Ahead => "ahead",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LinkErrorKind
// ---------------------------------------------------------------------------

/// Why a link check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LinkErrorKind {
    /// The server answered with a non-success status.
    BadStatus,
    /// Connection-level failure (DNS, TLS, refused, reset).
    NetworkFailure,
    /// The probe exceeded its timeout.
    Timeout,
    /// A relative link points at a file that does not exist.
    MissingTarget,
}

impl LinkErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadStatus => "bad_status",
            Self::NetworkFailure => "network_failure",
            Self::Timeout => "timeout",
            Self::MissingTarget => "missing_target",
        }
    }
}

impl fmt::Display for LinkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SuggestionCategory
// ---------------------------------------------------------------------------

/// Category of an improvement suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    Structural,
    ContentGap,
}

impl SuggestionCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::ContentGap => "content_gap",
        }
    }
}

impl fmt::Display for SuggestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
                assert_eq!(val.to_string(), $expected_str);
            }
        };
    }

    test_serde_roundtrip!(phase_synthesizing, RunPhase, RunPhase::Synthesizing, "synthesizing");
    test_serde_roundtrip!(subsystem_links, Subsystem, Subsystem::Links, "links");
    test_serde_roundtrip!(
        outcome_degraded,
        SubsystemOutcome,
        SubsystemOutcome::Degraded,
        "degraded"
    );
    test_serde_roundtrip!(ecosystem_pypi, Ecosystem, Ecosystem::Pypi, "pypi");
    test_serde_roundtrip!(freshness_behind, Freshness, Freshness::Behind, "behind");
    test_serde_roundtrip!(
        link_network_failure,
        LinkErrorKind,
        LinkErrorKind::NetworkFailure,
        "network_failure"
    );
    test_serde_roundtrip!(
        category_content_gap,
        SuggestionCategory,
        SuggestionCategory::ContentGap,
        "content_gap"
    );

    #[test]
    fn run_phase_walks_forward_only() {
        let path = [
            RunPhase::Idle,
            RunPhase::Discovering,
            RunPhase::Scoring,
            RunPhase::Checking,
            RunPhase::Synthesizing,
            RunPhase::Done,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
            assert!(!pair[1].can_transition_to(pair[0]));
        }
        assert!(RunPhase::Done.allowed_next_states().is_empty());
    }

    #[test]
    fn run_phase_cannot_skip_scoring() {
        assert!(!RunPhase::Discovering.can_transition_to(RunPhase::Checking));
    }

    #[test]
    fn outcome_from_counts() {
        assert_eq!(SubsystemOutcome::from_counts(0, 0), SubsystemOutcome::Succeeded);
        assert_eq!(SubsystemOutcome::from_counts(5, 0), SubsystemOutcome::Succeeded);
        assert_eq!(SubsystemOutcome::from_counts(5, 2), SubsystemOutcome::Degraded);
        assert_eq!(SubsystemOutcome::from_counts(5, 5), SubsystemOutcome::Failed);
        assert_eq!(SubsystemOutcome::from_counts(0, 1), SubsystemOutcome::Failed);
    }

    #[test]
    fn ecosystem_parses_aliases() {
        assert_eq!("python".parse::<Ecosystem>().unwrap(), Ecosystem::Pypi);
        assert_eq!("Cargo".parse::<Ecosystem>().unwrap(), Ecosystem::Crates);
        assert_eq!("gh".parse::<Ecosystem>().unwrap(), Ecosystem::Github);
        assert!(matches!(
            "fortran".parse::<Ecosystem>(),
            Err(CoreError::Unknown { kind: "ecosystem", .. })
        ));
    }
}

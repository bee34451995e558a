//! Lenient version comparison for the freshness column.
//!
//! Registry and tag versions are messy (`v1.2`, `langchain==0.3.7`,
//! `2024.1`). Everything before the first digit is dropped, missing minor
//! and patch components are filled with zero, and whatever still fails to
//! parse as semver is [`Freshness::Unknown`].

use cur_core::enums::Freshness;
use semver::Version;
use std::cmp::Ordering;

/// Compare the tracked `baseline` with the `latest` observed release.
#[must_use]
pub fn compare(baseline: &str, latest: &str) -> Freshness {
    match (parse_lenient(baseline), parse_lenient(latest)) {
        (Some(base), Some(latest)) => match base.cmp_precedence(&latest) {
            Ordering::Equal => Freshness::Current,
            Ordering::Less => Freshness::Behind,
            Ordering::Greater => Freshness::Ahead,
        },
        _ if baseline.trim() == latest.trim() && !baseline.trim().is_empty() => Freshness::Current,
        _ => Freshness::Unknown,
    }
}

/// Parse a loosely formatted version string.
#[must_use]
pub fn parse_lenient(raw: &str) -> Option<Version> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let candidate = raw[start..].trim();

    if let Ok(v) = Version::parse(candidate) {
        return Some(v);
    }

    // Split off pre-release/build suffix, pad the numeric core.
    let core_end = candidate
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(candidate.len());
    let (core, suffix) = candidate.split_at(core_end);
    let mut parts: Vec<&str> = core.trim_end_matches('.').split('.').collect();
    if parts.len() > 3 || parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    while parts.len() < 3 {
        parts.push("0");
    }
    let suffix = suffix.trim_start_matches(['-', '.', '_']);
    let padded = if suffix.is_empty() {
        parts.join(".")
    } else if suffix.starts_with('+') {
        format!("{}{suffix}", parts.join("."))
    } else {
        format!("{}-{suffix}", parts.join("."))
    };
    Version::parse(&padded).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("0.3.7", "0.3.7", Freshness::Current)]
    #[case("0.2.0", "0.3.7", Freshness::Behind)]
    #[case("v1.2", "1.2.0", Freshness::Current)]
    #[case("langchain==0.3.0", "langchain==0.3.7", Freshness::Behind)]
    #[case("2.0", "1.9.9", Freshness::Ahead)]
    #[case("1.0.0-rc.1", "1.0.0", Freshness::Behind)]
    #[case("0.4.0rc1", "0.3.9", Freshness::Ahead)]
    #[case("latest", "1.0.0", Freshness::Unknown)]
    #[case("nightly", "nightly", Freshness::Current)]
    #[case("1.2.3.4", "1.2.3", Freshness::Unknown)]
    fn compares(#[case] baseline: &str, #[case] latest: &str, #[case] expected: Freshness) {
        assert_eq!(compare(baseline, latest), expected);
    }

    #[test]
    fn pads_short_versions() {
        assert_eq!(parse_lenient("2024.1"), Some(Version::new(2024, 1, 0)));
        assert_eq!(parse_lenient("v3"), Some(Version::new(3, 0, 0)));
    }
}

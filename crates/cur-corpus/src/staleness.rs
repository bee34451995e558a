//! Stale-content scan.
//!
//! Flags documents that mention calendar years in a window ending
//! `stale_after_years` before the current year. With the default of 2 and a
//! current year of 2026, mentions of 2021 through 2024 are flagged. Years
//! older than the window are treated as historical citations.

use cur_core::entities::StaleReference;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::walk::CorpusDocument;

/// Width of the flagged window, in years.
const WINDOW_YEARS: i32 = 4;

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").expect("valid year regex"));

/// Documents mentioning stale years, in document order.
#[must_use]
pub fn find_stale_references(
    documents: &[CorpusDocument],
    current_year: i32,
    stale_after_years: i32,
) -> Vec<StaleReference> {
    let newest = current_year - stale_after_years;
    let oldest = newest - WINDOW_YEARS + 1;

    documents
        .iter()
        .filter_map(|doc| {
            let years: BTreeSet<i32> = YEAR_RE
                .captures_iter(&doc.text)
                .filter_map(|c| c[1].parse::<i32>().ok())
                .filter(|y| (oldest..=newest).contains(y))
                .collect();
            (!years.is_empty()).then(|| StaleReference {
                source_file: doc.rel_path.clone(),
                years: years.into_iter().collect(),
            })
        })
        .collect()
}

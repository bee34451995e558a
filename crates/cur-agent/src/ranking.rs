//! Deduplication and ranking of scored candidates.

use std::cmp::Ordering;
use std::collections::HashMap;

use cur_config::GeneralConfig;
use cur_core::entities::ScoredCandidate;

/// Which ranked candidates make it into the report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cutoff {
    pub top_k: usize,
    /// Lowest score still reported, inclusive.
    pub min_relevance: f64,
}

impl Cutoff {
    #[must_use]
    pub const fn new(top_k: usize, min_relevance: f64) -> Self {
        Self {
            top_k,
            min_relevance,
        }
    }

    #[must_use]
    pub const fn from_config(general: &GeneralConfig) -> Self {
        Self::new(general.top_k, general.min_relevance)
    }
}

/// Merge candidates that share a normalized URL.
///
/// The higher score wins; on a tie the first seen is kept. Origins from
/// every duplicate are unioned into the survivor. Output keeps first-seen
/// order.
#[must_use]
pub fn dedupe(scored: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut kept: Vec<ScoredCandidate> = Vec::with_capacity(scored.len());

    for item in scored {
        let key = item.candidate.identity_key();
        let Some(&slot) = slots.get(&key) else {
            slots.insert(key, kept.len());
            kept.push(item);
            continue;
        };

        let existing = &mut kept[slot];
        if item.score() > existing.score() {
            let origins = std::mem::take(&mut existing.candidate.origins);
            *existing = item;
            existing.candidate.merge_origins(&origins);
        } else {
            existing.candidate.merge_origins(&item.candidate.origins);
        }
    }

    kept
}

/// Ranking order: score descending, then earliest origin prompt, then title.
#[must_use]
pub fn compare(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score()
        .total_cmp(&a.score())
        .then_with(|| a.candidate.first_origin_index().cmp(&b.candidate.first_origin_index()))
        .then_with(|| a.candidate.title.cmp(&b.candidate.title))
}

/// Deduplicate, drop candidates below the relevance floor, sort by
/// [`compare`], and keep the best `top_k`.
#[must_use]
pub fn rank(scored: Vec<ScoredCandidate>, cutoff: Cutoff) -> Vec<ScoredCandidate> {
    let mut ranked = dedupe(scored);
    ranked.retain(|item| item.score() >= cutoff.min_relevance);
    ranked.sort_by(compare);
    ranked.truncate(cutoff.top_k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use cur_core::entities::{Candidate, PromptRef, Relevance};
    use pretty_assertions::assert_eq;

    fn scored(title: &str, url: &str, score: f64, origin: usize) -> ScoredCandidate {
        ScoredCandidate::new(
            Candidate {
                title: title.into(),
                authors: vec![],
                published: None,
                abstract_text: String::new(),
                source_url: url.into(),
                source: "arxiv".into(),
                origins: vec![PromptRef {
                    index: origin,
                    query: format!("prompt {origin}"),
                }],
            },
            Relevance::new(score, "r", "Foundations").unwrap(),
        )
    }

    fn titles(items: &[ScoredCandidate]) -> Vec<&str> {
        items.iter().map(|s| s.candidate.title.as_str()).collect()
    }

    #[test]
    fn duplicate_keeps_higher_score_and_unions_origins() {
        let merged = dedupe(vec![
            scored("first", "http://arxiv.org/abs/1v1", 6.0, 2),
            scored("second", "https://arxiv.org/abs/1", 9.0, 0),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].candidate.title, "second");
        let origins: Vec<usize> = merged[0].candidate.origins.iter().map(|o| o.index).collect();
        assert_eq!(origins, vec![0, 2]);
    }

    #[test]
    fn tie_keeps_first_seen() {
        let merged = dedupe(vec![
            scored("first", "https://x.org/a", 7.0, 3),
            scored("second", "https://x.org/a/", 7.0, 1),
        ]);
        assert_eq!(titles(&merged), vec!["first"]);
        assert_eq!(merged[0].candidate.first_origin_index(), 1);
    }

    #[test]
    fn ranks_by_score_then_prompt_then_title() {
        let ranked = rank(
            vec![
                scored("b", "https://x.org/1", 8.0, 1),
                scored("a", "https://x.org/2", 8.0, 1),
                scored("c", "https://x.org/3", 8.0, 0),
                scored("d", "https://x.org/4", 9.5, 4),
                scored("e", "https://x.org/5", 2.0, 0),
            ],
            Cutoff::new(4, 0.0),
        );
        assert_eq!(titles(&ranked), vec!["d", "c", "a", "b"]);
    }

    #[test]
    fn top_k_larger_than_input() {
        let ranked = rank(vec![scored("only", "https://x.org/1", 1.0, 0)], Cutoff::new(15, 0.0));
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn ranking_is_idempotent() {
        let items = vec![
            scored("x", "https://x.org/1", 5.0, 1),
            scored("y", "https://x.org/2", 5.0, 1),
            scored("z", "https://x.org/1", 5.0, 0),
        ];
        let once = rank(items, Cutoff::new(10, 0.0));
        assert_eq!(titles(&once), vec!["x", "y"]);
        assert_eq!(rank(once.clone(), Cutoff::new(10, 0.0)), once);
    }

    #[test]
    fn low_scores_are_dropped_before_top_k() {
        let ranked = rank(
            vec![
                scored("recipes", "https://x.org/1", 0.0, 0),
                scored("borderline", "https://x.org/2", 5.0, 1),
                scored("planning", "https://x.org/3", 8.0, 2),
                scored("weak", "https://x.org/4", 4.9, 0),
            ],
            Cutoff::new(2, 5.0),
        );
        assert_eq!(titles(&ranked), vec!["planning", "borderline"]);
    }

    #[test]
    fn duplicate_above_floor_survives_low_scoring_copy() {
        let ranked = rank(
            vec![
                scored("low copy", "http://arxiv.org/abs/7v1", 2.0, 0),
                scored("high copy", "https://arxiv.org/abs/7", 6.0, 1),
            ],
            Cutoff::new(5, 5.0),
        );
        assert_eq!(titles(&ranked), vec!["high copy"]);
        assert_eq!(ranked[0].candidate.first_origin_index(), 0);
    }
}

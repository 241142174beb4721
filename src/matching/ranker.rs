//! Ranking engine
//!
//! Per-job ordering of scored results: match score descending, ties broken
//! by higher semantic component and then smaller candidate id, duplicate
//! candidates collapsed to their best entry, truncated to the top K. Top-K
//! selection goes through a bounded heap so small K over a large pool does
//! not pay for a full sort.

use crate::matching::scorer::MatchResult;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};

/// Ordered top-K results for one job. Recomputed per ranking request, never
/// mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedList {
    pub jd_id: String,
    pub results: Vec<MatchResult>,
}

/// Total order over match results; `Less` means "ranks earlier". The
/// candidate-id tie-break keeps output byte-identical across runs and
/// platforms.
fn rank_order(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.match_score
        .total_cmp(&a.match_score)
        .then_with(|| b.components.semantic.total_cmp(&a.components.semantic))
        .then_with(|| a.candidate_id.cmp(&b.candidate_id))
}

struct Ranked(MatchResult);

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        rank_order(&self.0, &other.0) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        rank_order(&self.0, &other.0)
    }
}

/// Rank the scored results of a single job and keep the best `k`. The input
/// is not mutated; a new ordered sequence is returned.
pub fn rank(jd_id: &str, results: &[MatchResult], k: usize) -> RankedList {
    if k == 0 || results.is_empty() {
        return RankedList {
            jd_id: jd_id.to_string(),
            results: Vec::new(),
        };
    }

    // Collapse duplicate candidates to their best-ranked entry before
    // selection, so a repeated id cannot occupy two slots.
    let mut best: HashMap<&str, &MatchResult> = HashMap::with_capacity(results.len());
    for result in results {
        match best.entry(result.candidate_id.as_str()) {
            Entry::Vacant(slot) => {
                slot.insert(result);
            }
            Entry::Occupied(mut slot) => {
                if rank_order(result, slot.get()) == Ordering::Less {
                    slot.insert(result);
                }
            }
        }
    }

    // Max-heap whose top is the worst entry kept so far; pushing then
    // popping holds it at k entries.
    let mut heap: BinaryHeap<Ranked> = BinaryHeap::with_capacity(k + 1);
    for result in best.into_values() {
        heap.push(Ranked(result.clone()));
        if heap.len() > k {
            heap.pop();
        }
    }

    RankedList {
        jd_id: jd_id.to_string(),
        results: heap.into_sorted_vec().into_iter().map(|r| r.0).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::scorer::ComponentScores;

    fn result(candidate_id: &str, match_score: f32, semantic: f32) -> MatchResult {
        MatchResult {
            candidate_id: candidate_id.to_string(),
            jd_id: "job".to_string(),
            match_score,
            components: ComponentScores {
                semantic,
                skill_overlap: 0.5,
                experience_fit: 0.5,
            },
        }
    }

    fn ids(list: &RankedList) -> Vec<&str> {
        list.results.iter().map(|r| r.candidate_id.as_str()).collect()
    }

    #[test]
    fn sorts_by_match_score_descending() {
        let results = vec![
            result("low", 0.2, 0.2),
            result("high", 0.9, 0.9),
            result("mid", 0.5, 0.5),
        ];
        let ranked = rank("job", &results, 10);
        assert_eq!(ids(&ranked), vec!["high", "mid", "low"]);
    }

    #[test]
    fn equal_scores_break_by_semantic_component() {
        let results = vec![
            result("weaker_semantic", 0.75, 0.70),
            result("stronger_semantic", 0.75, 0.80),
        ];
        let ranked = rank("job", &results, 10);
        assert_eq!(ids(&ranked), vec!["stronger_semantic", "weaker_semantic"]);
    }

    #[test]
    fn full_ties_break_by_candidate_id() {
        let results = vec![result("B001", 0.75, 0.8), result("A100", 0.75, 0.8)];
        let ranked = rank("job", &results, 10);
        assert_eq!(ids(&ranked), vec!["A100", "B001"]);
    }

    #[test]
    fn truncates_to_k() {
        let results: Vec<MatchResult> = (0..10)
            .map(|i| result(&format!("c{:02}", i), i as f32 / 10.0, 0.5))
            .collect();

        assert_eq!(rank("job", &results, 3).results.len(), 3);
        assert_eq!(rank("job", &results, 0).results.len(), 0);
        assert_eq!(rank("job", &results, 100).results.len(), 10);
    }

    #[test]
    fn duplicate_candidates_collapse_to_best_entry() {
        let results = vec![
            result("c1", 0.4, 0.4),
            result("c1", 0.8, 0.8),
            result("c2", 0.6, 0.6),
        ];
        let ranked = rank("job", &results, 10);
        assert_eq!(ids(&ranked), vec!["c1", "c2"]);
        assert_eq!(ranked.results[0].match_score, 0.8);
    }

    #[test]
    fn ordering_is_independent_of_input_order() {
        let mut results = vec![
            result("a", 0.9, 0.1),
            result("b", 0.9, 0.1),
            result("c", 0.3, 0.9),
            result("d", 0.7, 0.2),
        ];
        let forward = rank("job", &results, 3);
        results.reverse();
        let backward = rank("job", &results, 3);
        assert_eq!(forward, backward);
    }

    #[test]
    fn reranking_own_output_is_identity() {
        let results = vec![
            result("c1", 0.9, 0.9),
            result("c2", 0.7, 0.7),
            result("c3", 0.5, 0.5),
        ];
        let first = rank("job", &results, 2);
        let second = rank("job", &first.results, 2);
        assert_eq!(first, second);
    }

    #[test]
    fn jd_id_is_carried_through() {
        let ranked = rank("backend", &[result("c1", 0.5, 0.5)], 1);
        assert_eq!(ranked.jd_id, "backend");
    }
}

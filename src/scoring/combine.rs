//! Score combination across retrieval sources
//!
//! Merges similarity hits, recency hits, and graph-derived concept
//! boosts into one running score per candidate. Presence in multiple
//! sources is additive evidence of relevance, not redundancy to be
//! averaged away.

use crate::collaborators::{RelatedConcept, SimilarityHit};
use crate::memory::{CandidateSource, MemoryKey, RankedCandidate};
use std::collections::HashMap;

/// Default confidence assumed when the index omitted one.
const FALLBACK_CONFIDENCE: f64 = 0.5;

/// Per-concept match contributions against a candidate.
const CONTENT_MATCH: f64 = 2.0;
const ENTITY_MATCH: f64 = 3.0;
const KEYWORD_MATCH: f64 = 1.0;

/// Signal weights for one scoring mode.
///
/// Long-context mode shifts weight toward the graph signal, trading some
/// precision for breadth under the larger downstream context budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombineWeights {
    /// Weight on similarity confidence
    pub semantic: f64,
    /// Weight credited for presence in the recency source
    pub temporal: f64,
    /// Weight on graph concept boosts
    pub graph: f64,
}

impl CombineWeights {
    /// Weights for the given scoring mode.
    pub fn for_mode(long_context: bool) -> Self {
        if long_context {
            Self {
                semantic: 0.6,
                temporal: 0.25,
                graph: 0.25,
            }
        } else {
            Self {
                semantic: 0.7,
                temporal: 0.3,
                graph: 0.2,
            }
        }
    }
}

/// Merge the three retrieval sources into deduplicated, scored
/// candidates, ordered descending by score (stable for ties).
///
/// Candidate identity follows `Memory::key`: the true id when present,
/// the timestamp + content-prefix composite otherwise. Scores are clamped
/// non-negative on the way out.
pub fn combine(
    similarity_hits: &[SimilarityHit],
    recency_hits: &[SimilarityHit],
    graph_hits: &[RelatedConcept],
    long_context: bool,
) -> Vec<RankedCandidate> {
    let weights = CombineWeights::for_mode(long_context);

    let mut candidates: Vec<RankedCandidate> = Vec::new();
    let mut index_by_key: HashMap<MemoryKey, usize> = HashMap::new();

    for hit in similarity_hits {
        let key = hit.memory.key();
        let score = hit.confidence.unwrap_or(FALLBACK_CONFIDENCE) * weights.semantic;
        match index_by_key.get(&key) {
            // Duplicate hit within the source: keep the first position,
            // take the newer score
            Some(&i) => candidates[i].score = score,
            None => {
                index_by_key.insert(key, candidates.len());
                candidates.push(RankedCandidate::new(
                    hit.memory.clone(),
                    score,
                    CandidateSource::Similarity,
                ));
            }
        }
    }

    for hit in recency_hits {
        let key = hit.memory.key();
        match index_by_key.get(&key) {
            // Also semantically relevant: additive boost
            Some(&i) => candidates[i].score += weights.temporal,
            None => {
                index_by_key.insert(key, candidates.len());
                candidates.push(RankedCandidate::new(
                    hit.memory.clone(),
                    weights.temporal,
                    CandidateSource::Recency,
                ));
            }
        }
    }

    for concept in graph_hits {
        let term = concept.concept.to_lowercase();
        if term.is_empty() {
            continue;
        }
        for candidate in candidates.iter_mut() {
            let matches = concept_matches(&term, candidate);
            if matches > 0.0 {
                candidate.score += concept.strength * weights.graph * matches;
                candidate.source = CandidateSource::GraphBoosted;
            }
        }
    }

    for candidate in candidates.iter_mut() {
        candidate.score = candidate.score.max(0.0);
    }

    // Stable sort: equal scores keep input order
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates
}

/// Weighted match count of a concept term against a candidate's content,
/// entities, and keywords.
fn concept_matches(term: &str, candidate: &RankedCandidate) -> f64 {
    let memory = &candidate.memory;
    let mut matches = 0.0;
    if memory.content.to_lowercase().contains(term) {
        matches += CONTENT_MATCH;
    }
    if memory.entities.iter().any(|e| e.to_lowercase() == term) {
        matches += ENTITY_MATCH;
    }
    if memory.keywords.iter().any(|k| k.to_lowercase() == term) {
        matches += KEYWORD_MATCH;
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{ContentKind, Memory, MemoryBuilder};

    fn memory(id: &str, content: &str) -> Memory {
        MemoryBuilder::new(ContentKind::Text)
            .subject_id("u1")
            .id(id)
            .content(content)
            .created_at("2024-05-01T12:00:00Z")
            .build()
            .unwrap()
    }

    fn hit(id: &str, content: &str, confidence: Option<f64>) -> SimilarityHit {
        SimilarityHit {
            memory: memory(id, content),
            confidence,
        }
    }

    #[test]
    fn test_similarity_only_scoring() {
        let candidates = combine(&[hit("a", "alpha", Some(0.8))], &[], &[], false);
        assert_eq!(candidates.len(), 1);
        assert!((candidates[0].score - 0.8 * 0.7).abs() < 1e-9);
        assert_eq!(candidates[0].source, CandidateSource::Similarity);
    }

    #[test]
    fn test_presence_in_both_sources_is_additive() {
        let candidates = combine(
            &[hit("a", "alpha", Some(0.8))],
            &[hit("a", "alpha", None)],
            &[],
            false,
        );
        assert_eq!(candidates.len(), 1);
        assert!((candidates[0].score - (0.8 * 0.7 + 0.3)).abs() < 1e-9);
    }

    #[test]
    fn test_recency_only_gets_temporal_weight() {
        let candidates = combine(&[], &[hit("b", "bravo", None)], &[], false);
        assert_eq!(candidates.len(), 1);
        assert!((candidates[0].score - 0.3).abs() < 1e-9);
        assert_eq!(candidates[0].source, CandidateSource::Recency);
    }

    #[test]
    fn test_long_context_weights() {
        let candidates = combine(
            &[hit("a", "alpha", Some(1.0))],
            &[hit("a", "alpha", None)],
            &[],
            true,
        );
        assert!((candidates[0].score - (0.6 + 0.25)).abs() < 1e-9);
    }

    #[test]
    fn test_graph_boost_match_weighting() {
        let mut m = memory("a", "lunch with Alice downtown");
        m.entities = vec!["Alice".to_string()];
        m.keywords = vec!["alice".to_string(), "lunch".to_string()];
        let sim = SimilarityHit {
            memory: m,
            confidence: Some(0.5),
        };
        let graph = vec![RelatedConcept {
            concept: "Alice".to_string(),
            strength: 0.8,
            distance: 1,
        }];

        let candidates = combine(&[sim], &[], &graph, false);
        // content substring (2) + entity (3) + keyword (1) = 6 matches
        let expected = 0.5 * 0.7 + 0.8 * 0.2 * 6.0;
        assert!((candidates[0].score - expected).abs() < 1e-9);
        assert_eq!(candidates[0].source, CandidateSource::GraphBoosted);
    }

    #[test]
    fn test_graph_no_match_leaves_score_alone() {
        let graph = vec![RelatedConcept {
            concept: "zurich".to_string(),
            strength: 0.9,
            distance: 2,
        }];
        let candidates = combine(&[hit("a", "lunch with Alice", Some(0.5))], &[], &graph, false);
        assert!((candidates[0].score - 0.5 * 0.7).abs() < 1e-9);
        assert_eq!(candidates[0].source, CandidateSource::Similarity);
    }

    #[test]
    fn test_never_negative_even_with_bad_inputs() {
        let graph = vec![RelatedConcept {
            concept: "alpha".to_string(),
            strength: -5.0,
            distance: 1,
        }];
        let candidates = combine(&[hit("a", "alpha", Some(0.1))], &[], &graph, false);
        assert!(candidates[0].score >= 0.0);

        let candidates = combine(&[hit("a", "alpha", Some(-1.0))], &[], &[], false);
        assert!(candidates[0].score >= 0.0);
    }

    #[test]
    fn test_empty_inputs_empty_output() {
        assert!(combine(&[], &[], &[], false).is_empty());
    }

    #[test]
    fn test_ordering_descending_stable() {
        let candidates = combine(
            &[
                hit("a", "alpha", Some(0.4)),
                hit("b", "bravo", Some(0.9)),
                hit("c", "charlie", Some(0.4)),
            ],
            &[],
            &[],
            false,
        );
        let ids: Vec<&str> = candidates.iter().map(|c| c.memory.id.as_str()).collect();
        // b first; a and c tie and keep input order
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_composite_key_dedup_for_legacy_records() {
        let mut legacy_sim = hit("", "same content here", Some(0.8));
        legacy_sim.memory.id = String::new();
        let mut legacy_recent = hit("", "same content here", None);
        legacy_recent.memory.id = String::new();

        let candidates = combine(&[legacy_sim], &[legacy_recent], &[], false);
        // Same timestamp + same prefix → one merged candidate
        assert_eq!(candidates.len(), 1);
        assert!((candidates[0].score - (0.8 * 0.7 + 0.3)).abs() < 1e-9);
    }

    #[test]
    fn test_true_ids_distinguish_same_content() {
        let candidates = combine(
            &[hit("a", "identical", Some(0.8)), hit("b", "identical", Some(0.6))],
            &[],
            &[],
            false,
        );
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_missing_confidence_uses_fallback() {
        let candidates = combine(&[hit("a", "alpha", None)], &[], &[], false);
        assert!((candidates[0].score - 0.5 * 0.7).abs() < 1e-9);
    }
}

//! Concept extraction from free text
//!
//! Derives a ranked set of salient terms from a query. The terms drive
//! relationship-graph fan-out and are matched against candidate memories
//! during score combination. Extraction is a pure function of the input
//! text, the stop-word set, and the term cap: no model calls, no state.
//!
//! Scoring: a term's weight is its frequency in the token stream times a
//! position weight taken at its first occurrence. Earlier terms weigh
//! more — `1.0 − (index / total) × 0.3`, which bottoms out at 0.7.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// How much of the weight range is governed by position.
const POSITION_SPREAD: f64 = 0.3;

/// A salient term with its extraction weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptScore {
    /// The extracted term, lowercased
    pub term: String,
    /// Frequency × position weight
    pub weight: f64,
}

/// Deterministic, rule-based concept extractor.
pub struct ConceptExtractor {
    stop_words: HashSet<String>,
    max_concepts: usize,
}

impl ConceptExtractor {
    /// Create an extractor with the default stop-word set.
    pub fn new(max_concepts: usize) -> Self {
        Self::with_stop_words(default_stop_words(), max_concepts)
    }

    /// Create an extractor with a custom stop-word set.
    pub fn with_stop_words(
        stop_words: impl IntoIterator<Item = String>,
        max_concepts: usize,
    ) -> Self {
        Self {
            stop_words: stop_words.into_iter().collect(),
            max_concepts,
        }
    }

    /// Extract at most `max_concepts` terms from `text`, highest weight
    /// first.
    ///
    /// Returns an empty vec for empty or all-stop-word input; callers
    /// treat that as "no graph fan-out requested", not as an error.
    pub fn extract(&self, text: &str) -> Vec<ConceptScore> {
        let terms: Vec<String> = tokenize(text)
            .into_iter()
            .filter(|t| !self.stop_words.contains(t))
            .collect();
        if terms.is_empty() {
            return Vec::new();
        }

        let total = terms.len() as f64;
        let mut frequency: HashMap<&str, usize> = HashMap::new();
        for term in &terms {
            *frequency.entry(term.as_str()).or_insert(0) += 1;
        }

        // Score each term at its first occurrence
        let mut scored: Vec<ConceptScore> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for (index, term) in terms.iter().enumerate() {
            if !seen.insert(term.as_str()) {
                continue;
            }
            let position_weight = 1.0 - (index as f64 / total) * POSITION_SPREAD;
            let weight = position_weight * frequency[term.as_str()] as f64;
            scored.push(ConceptScore {
                term: term.clone(),
                weight,
            });
        }

        // Descending by weight; stable, so equal weights keep first-seen order
        scored.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(self.max_concepts);
        scored
    }
}

/// Split text into lowercase alphabetic runs of length ≥ 3.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_alphabetic() {
            current.extend(ch.to_lowercase());
        } else if !current.is_empty() {
            if current.chars().count() >= 3 {
                tokens.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        }
    }
    if current.chars().count() >= 3 {
        tokens.push(current);
    }
    tokens
}

/// The default stop-word set.
pub fn default_stop_words() -> Vec<String> {
    [
        "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was",
        "one", "our", "out", "day", "get", "has", "him", "his", "how", "its", "may", "new",
        "now", "old", "see", "two", "who", "boy", "did", "man", "too", "way", "she", "use",
        "will", "been", "from", "they", "have", "said", "each", "which", "what", "were",
        "when", "where", "more", "some", "like", "into", "time", "very", "then", "come",
        "back", "only", "think", "also",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_is_deterministic() {
        let extractor =
            ConceptExtractor::with_stop_words(vec!["the".to_string()], 8);
        let first = extractor.extract("the quick quick fox the fox");
        let second = extractor.extract("the quick quick fox the fox");
        assert_eq!(first, second);

        let terms: Vec<&str> = first.iter().map(|c| c.term.as_str()).collect();
        assert_eq!(terms, vec!["quick", "fox"]);
        // Equal frequency, but quick occurs earlier so its position weight
        // is higher
        assert!(first[0].weight >= first[1].weight);
    }

    #[test]
    fn test_empty_input_returns_empty() {
        let extractor = ConceptExtractor::new(8);
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("   \t\n").is_empty());
    }

    #[test]
    fn test_all_stop_words_returns_empty() {
        let extractor = ConceptExtractor::new(8);
        assert!(extractor.extract("the and for are but not").is_empty());
    }

    #[test]
    fn test_short_tokens_dropped() {
        let extractor = ConceptExtractor::new(8);
        let concepts = extractor.extract("go to rome in may");
        let terms: Vec<&str> = concepts.iter().map(|c| c.term.as_str()).collect();
        // "go", "to", "in" are under 3 chars; "may" is a stop word
        assert_eq!(terms, vec!["rome"]);
    }

    #[test]
    fn test_case_insensitive() {
        let extractor = ConceptExtractor::new(8);
        let concepts = extractor.extract("Rome ROME rome");
        assert_eq!(concepts.len(), 1);
        assert_eq!(concepts[0].term, "rome");
        assert!((concepts[0].weight - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_frequency_beats_position() {
        let extractor = ConceptExtractor::new(8);
        let concepts = extractor.extract("paris tickets tickets tickets");
        assert_eq!(concepts[0].term, "tickets");
        assert_eq!(concepts[1].term, "paris");
    }

    #[test]
    fn test_position_weight_floor() {
        let extractor = ConceptExtractor::new(100);
        let text = (0..50)
            .map(|i| format!("word{}{}", (b'a' + (i % 26) as u8) as char, i))
            .collect::<Vec<_>>()
            .join(" ");
        let concepts = extractor.extract(&text);
        for concept in &concepts {
            assert!(concept.weight >= 0.7 - 1e-9, "term {} under floor", concept.term);
        }
    }

    #[test]
    fn test_max_concepts_cap() {
        let extractor = ConceptExtractor::new(3);
        let concepts =
            extractor.extract("alpha bravo charlie delta echo foxtrot golf hotel");
        assert_eq!(concepts.len(), 3);
        // Earliest terms win on position when frequencies are equal
        assert_eq!(concepts[0].term, "alpha");
    }

    #[test]
    fn test_punctuation_and_digits_split_tokens() {
        let extractor = ConceptExtractor::new(8);
        let concepts = extractor.extract("meeting-2024: budget, budget!");
        let terms: Vec<&str> = concepts.iter().map(|c| c.term.as_str()).collect();
        assert_eq!(terms, vec!["budget", "meeting"]);
    }
}

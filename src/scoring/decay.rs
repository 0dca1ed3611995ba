//! Temporal decay scoring
//!
//! Adjusts combined scores by memory age: an exponential decay per day of
//! age, multiplied by tiered boosts for very recent memories, blended
//! back into the combined score. Produces the authoritative final
//! ordering. Candidates whose timestamp cannot be parsed keep their
//! combined score untouched — unknown age is not irrelevance.

use crate::memory::RankedCandidate;
use chrono::{DateTime, Utc};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Apply temporal decay and re-sort, using the current instant.
pub fn decay(candidates: Vec<RankedCandidate>, long_context: bool) -> Vec<RankedCandidate> {
    decay_at(candidates, long_context, Utc::now())
}

/// Apply temporal decay and re-sort against an explicit `now`.
///
/// Deterministic given its inputs; `decay` is the thin clock-bound
/// wrapper.
pub fn decay_at(
    mut candidates: Vec<RankedCandidate>,
    long_context: bool,
    now: DateTime<Utc>,
) -> Vec<RankedCandidate> {
    let base_decay: f64 = if long_context { 0.95 } else { 0.9 };
    let recent_boost: f64 = if long_context { 1.3 } else { 1.5 };
    let context_weight: f64 = if long_context { 0.65 } else { 0.7 };

    for candidate in candidates.iter_mut() {
        let Some(timestamp) = candidate.memory.timestamp() else {
            continue;
        };
        let age_days =
            ((now - timestamp).num_milliseconds() as f64 / 1_000.0 / SECONDS_PER_DAY).max(0.0);

        let mut temporal_factor = base_decay.powf(age_days);
        if age_days < 1.0 / 24.0 {
            temporal_factor *= recent_boost;
        } else if age_days < 1.0 {
            temporal_factor *= recent_boost * 0.8;
        } else if age_days < 7.0 {
            temporal_factor *= 1.1;
        }

        candidate.score =
            candidate.score * context_weight + temporal_factor * (1.0 - context_weight);
        candidate.temporal_factor = Some(temporal_factor);
    }

    // Final ordering: score descending, ties broken by recency (more
    // recent wins, unparseable timestamps last)
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.memory.timestamp().cmp(&a.memory.timestamp()))
    });
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{CandidateSource, ContentKind, MemoryBuilder};
    use chrono::Duration;

    fn candidate_aged(id: &str, age: Duration, score: f64, now: DateTime<Utc>) -> RankedCandidate {
        let memory = MemoryBuilder::new(ContentKind::Text)
            .subject_id("u1")
            .id(id)
            .content("some content")
            .created_at((now - age).to_rfc3339())
            .build()
            .unwrap();
        RankedCandidate::new(memory, score, CandidateSource::Similarity)
    }

    #[test]
    fn test_monotonic_decay_younger_dominates() {
        let now = Utc::now();
        let young = candidate_aged("young", Duration::zero(), 0.5, now);
        let old = candidate_aged("old", Duration::days(30), 0.5, now);

        let ranked = decay_at(vec![old, young], false, now);
        assert_eq!(ranked[0].memory.id, "young");
        assert!(ranked[0].score >= ranked[1].score);
    }

    #[test]
    fn test_under_one_hour_tier() {
        let now = Utc::now();
        let aged = candidate_aged("m", Duration::minutes(30), 0.5, now);
        let ranked = decay_at(vec![aged], false, now);

        let age_days = 30.0 / (60.0 * 24.0);
        let expected_factor = 0.9f64.powf(age_days) * 1.5;
        let factor = ranked[0].temporal_factor.unwrap();
        assert!((factor - expected_factor).abs() < 1e-9);
    }

    #[test]
    fn test_under_one_day_tier() {
        let now = Utc::now();
        let aged = candidate_aged("m", Duration::hours(5), 0.5, now);
        let ranked = decay_at(vec![aged], false, now);

        let age_days = 5.0 / 24.0;
        let expected_factor = 0.9f64.powf(age_days) * 1.5 * 0.8;
        let factor = ranked[0].temporal_factor.unwrap();
        assert!((factor - expected_factor).abs() < 1e-9);
    }

    #[test]
    fn test_twenty_five_hours_gets_week_tier() {
        let now = Utc::now();
        let aged = candidate_aged("m", Duration::hours(25), 0.5, now);
        let ranked = decay_at(vec![aged], false, now);

        let age_days = 25.0 / 24.0;
        let expected_factor = 0.9f64.powf(age_days) * 1.1;
        let factor = ranked[0].temporal_factor.unwrap();
        assert!((factor - expected_factor).abs() < 1e-9);
    }

    #[test]
    fn test_older_than_a_week_no_tier_boost() {
        let now = Utc::now();
        let aged = candidate_aged("m", Duration::days(10), 0.5, now);
        let ranked = decay_at(vec![aged], false, now);

        let expected_factor = 0.9f64.powf(10.0);
        let factor = ranked[0].temporal_factor.unwrap();
        assert!((factor - expected_factor).abs() < 1e-6);
    }

    #[test]
    fn test_long_context_slower_decay() {
        let now = Utc::now();
        let normal = decay_at(
            vec![candidate_aged("m", Duration::days(10), 0.5, now)],
            false,
            now,
        );
        let long = decay_at(
            vec![candidate_aged("m", Duration::days(10), 0.5, now)],
            true,
            now,
        );
        assert!(long[0].temporal_factor.unwrap() > normal[0].temporal_factor.unwrap());
    }

    #[test]
    fn test_unparseable_timestamp_untouched() {
        let now = Utc::now();
        let mut candidate = candidate_aged("m", Duration::zero(), 0.42, now);
        candidate.memory.created_at = "garbage".to_string();

        let ranked = decay_at(vec![candidate], false, now);
        assert!((ranked[0].score - 0.42).abs() < f64::EPSILON);
        assert!(ranked[0].temporal_factor.is_none());
    }

    #[test]
    fn test_scores_finite_and_non_negative() {
        let now = Utc::now();
        let candidates = vec![
            candidate_aged("a", Duration::zero(), 0.0, now),
            candidate_aged("b", Duration::days(365), 0.0, now),
            candidate_aged("c", Duration::days(365 * 10), 100.0, now),
        ];
        for candidate in decay_at(candidates, false, now) {
            assert!(candidate.score.is_finite());
            assert!(candidate.score >= 0.0);
        }
    }

    #[test]
    fn test_future_timestamp_clamped_to_zero_age() {
        let now = Utc::now();
        let future = candidate_aged("m", Duration::hours(-2), 0.5, now);
        let ranked = decay_at(vec![future], false, now);

        // age clamps to 0 → full recent boost, no growth beyond it
        let factor = ranked[0].temporal_factor.unwrap();
        assert!((factor - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_equal_scores_tie_break_by_recency() {
        let now = Utc::now();
        // Unparseable timestamps keep their combined score and sort after
        // an equal-scored parseable candidate only via the recency key
        let mut a = candidate_aged("no-ts", Duration::zero(), 0.5, now);
        a.memory.created_at = "garbage".to_string();
        let mut b = candidate_aged("also-no-ts", Duration::zero(), 0.5, now);
        b.memory.created_at = "invalid".to_string();

        let ranked = decay_at(vec![a, b], false, now);
        // Equal score, both timestamps None: stable order preserved
        assert_eq!(ranked[0].memory.id, "no-ts");
        assert_eq!(ranked[1].memory.id, "also-no-ts");
    }

    #[test]
    fn test_resort_after_decay() {
        let now = Utc::now();
        // Older candidate enters with a higher combined score but loses
        // after decay
        let old_strong = candidate_aged("old", Duration::days(30), 0.6, now);
        let young_weak = candidate_aged("young", Duration::minutes(2), 0.5, now);

        let ranked = decay_at(vec![old_strong, young_weak], false, now);
        assert_eq!(ranked[0].memory.id, "young");
    }
}

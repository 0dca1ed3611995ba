//! Recollect configuration
//!
//! All tunables live here as plain serde structs. The engine never reads
//! files or environment variables itself — the hosting process deserializes
//! an `EngineConfig` (or takes the defaults) and passes it in at
//! construction.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Retrieval and ranking configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Query-result cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Session buffer configuration
    #[serde(default)]
    pub session: SessionConfig,
}

/// Retrieval and ranking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Default number of candidates returned by `retrieve`
    pub base_limit: usize,

    /// Hard ceiling on the effective limit in long-context mode
    pub context_memory_limit: usize,

    /// Whether long-context mode is on when the caller does not specify
    pub long_context_enabled: bool,

    /// Minimum similarity confidence for search hits.
    ///
    /// Deliberately lower than a strict relevance threshold: the decay and
    /// combination stages do the real filtering, so recall is favored here.
    pub min_confidence: f64,

    /// Relationship graph traversal depth in hops
    pub graph_depth: u32,

    /// Minimum association strength for related concepts
    pub graph_strength_floor: f64,

    /// Maximum related concepts returned per extracted concept
    pub graph_related_limit: usize,

    /// Maximum concepts extracted from a query
    pub max_concepts: usize,

    /// Timeout for each collaborator call, in milliseconds
    pub collaborator_timeout_ms: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            base_limit: 20,
            context_memory_limit: 50,
            long_context_enabled: false,
            min_confidence: 0.65,
            graph_depth: 3,
            graph_strength_floor: 0.5,
            graph_related_limit: 8,
            max_concepts: 8,
            collaborator_timeout_ms: 5_000,
        }
    }
}

impl RetrievalConfig {
    /// Collaborator call timeout as a `Duration`
    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_millis(self.collaborator_timeout_ms)
    }
}

/// Query-result cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached result lists before LRU eviction
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 1_000 }
    }
}

/// Session buffer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum buffered snapshots per subject
    pub per_subject_limit: usize,

    /// Snapshot time-to-live in seconds
    pub ttl_secs: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            per_subject_limit: 50,
            ttl_secs: 172_800, // 48 hours
        }
    }
}

impl SessionConfig {
    /// Snapshot time-to-live as a `chrono::Duration`
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retrieval_constants() {
        let config = RetrievalConfig::default();
        assert_eq!(config.base_limit, 20);
        assert_eq!(config.context_memory_limit, 50);
        assert!(!config.long_context_enabled);
        assert!((config.min_confidence - 0.65).abs() < f64::EPSILON);
        assert_eq!(config.graph_depth, 3);
        assert!((config.graph_strength_floor - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.max_concepts, 8);
    }

    #[test]
    fn test_default_cache_and_session() {
        let config = EngineConfig::default();
        assert_eq!(config.cache.capacity, 1_000);
        assert_eq!(config.session.per_subject_limit, 50);
        assert_eq!(config.session.ttl().num_hours(), 48);
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.retrieval.base_limit, 20);
        assert_eq!(
            config.retrieval.collaborator_timeout(),
            Duration::from_millis(5_000)
        );
    }
}

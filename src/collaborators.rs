//! Collaborator capability interfaces
//!
//! The engine depends on two external stores, each modeled as a pluggable
//! trait so the hosting process can wire real backends and tests can wire
//! doubles that fail on demand:
//!
//! ```text
//! query ──► [SimilarityIndex]  search / recent
//!       ──► [RelationshipGraph] related / trending / connected / connections
//!                  ▼
//!          degrade to empty on failure (engine-enforced, per source)
//! ```
//!
//! Both stores share a uniform partial-failure contract: the engine bounds
//! every call with a timeout and converts a failure or timeout into an
//! empty result for that source, logged but never surfaced to the caller.

use crate::error::Result;
use crate::memory::Memory;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A memory returned by the similarity index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityHit {
    /// The stored memory record
    pub memory: Memory,
    /// Semantic closeness to the query. `None` on the recency path,
    /// which carries no similarity signal.
    pub confidence: Option<f64>,
}

/// A concept related to a queried concept in the relationship graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedConcept {
    /// The related concept term
    pub concept: String,
    /// Association strength (0.0–1.0)
    pub strength: f64,
    /// Path distance from the queried concept, in hops
    pub distance: u32,
}

/// An entity trending for a subject over a trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingEntity {
    /// Entity name
    pub entity: String,
    /// Mentions within the window
    pub mention_count: u64,
}

/// A highly connected entity in a subject's network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectedEntity {
    /// Entity name
    pub entity: String,
    /// Total mentions for the subject
    pub mention_count: u64,
    /// Entities directly associated with this one
    pub related_entities: Vec<String>,
}

/// A connection between two memories through shared entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryConnection {
    /// The connected memory's identifier
    pub memory_id: String,
    /// Number of entities shared with the source memory
    pub shared_entity_count: u64,
    /// The shared entity names
    pub shared_entities: Vec<String>,
}

/// Semantic similarity search over stored memories.
#[async_trait]
pub trait SimilarityIndex: Send + Sync {
    /// Search memories by semantic closeness to `query`, scoped to a
    /// subject, returning at most `limit` hits at or above
    /// `min_confidence`.
    async fn search(
        &self,
        query: &str,
        subject_id: &str,
        limit: usize,
        min_confidence: f64,
    ) -> Result<Vec<SimilarityHit>>;

    /// The subject's most recent memories, newest first, at most `limit`.
    async fn recent(&self, subject_id: &str, limit: usize) -> Result<Vec<SimilarityHit>>;
}

/// Entity/concept relationship graph over stored memories.
#[async_trait]
pub trait RelationshipGraph: Send + Sync {
    /// Concepts related to `concept` within `depth` hops, filtered to
    /// association strength at or above `strength_floor`.
    async fn related_concepts(
        &self,
        concept: &str,
        depth: u32,
        strength_floor: f64,
        limit: usize,
    ) -> Result<Vec<RelatedConcept>>;

    /// Entities trending for a subject over the trailing `window_days`.
    async fn trending_entities(
        &self,
        subject_id: &str,
        window_days: u32,
        limit: usize,
    ) -> Result<Vec<TrendingEntity>>;

    /// The subject's most connected entities.
    async fn connected_entities(
        &self,
        subject_id: &str,
        limit: usize,
    ) -> Result<Vec<ConnectedEntity>>;

    /// Other memories sharing entities with `memory_id`.
    async fn memory_connections(
        &self,
        memory_id: &str,
        subject_id: &str,
        limit: usize,
    ) -> Result<Vec<MemoryConnection>>;
}

//! Ranked candidate and session snapshot types
//!
//! A `RankedCandidate` is a transient view over a stored memory, created
//! fresh per retrieval call and discarded afterwards unless cached. Its
//! score is unbounded and unnormalized — only relative ordering matters.

use crate::collaborators::MemoryConnection;
use crate::memory::record::{ContentKind, Memory, Sentiment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which retrieval path produced a candidate. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// Semantic similarity search
    Similarity,
    /// Recency lookup
    Recency,
    /// Entered through similarity or recency, then boosted by a graph
    /// concept match
    GraphBoosted,
}

/// A memory with its combined relevance score for one retrieval call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// The underlying stored memory
    pub memory: Memory,
    /// Combined, decay-adjusted relevance score. Finite and non-negative
    /// after the decay pass.
    pub score: f64,
    /// Which retrieval path produced this candidate
    pub source: CandidateSource,
    /// Diagnostic: the temporal factor applied by decay, when the
    /// memory's timestamp was parseable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporal_factor: Option<f64>,
    /// Other memories sharing entities with this one. Filled only by
    /// proactive connection enrichment; empty otherwise.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<MemoryConnection>,
}

impl RankedCandidate {
    /// Create a candidate fresh from a retrieval source.
    pub fn new(memory: Memory, score: f64, source: CandidateSource) -> Self {
        Self {
            memory,
            score,
            source,
            temporal_factor: None,
            connections: Vec::new(),
        }
    }
}

/// A compact copy of a just-stored memory, buffered per subject.
///
/// Written by the storage side effect, not by retrieval. Serves
/// collaborators that want the live session's recent context; never
/// ranked by this engine directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Identifier of the stored memory
    pub memory_id: String,
    /// Owning subject
    pub subject_id: String,
    /// The memory content
    pub content: String,
    /// Kind of content
    pub kind: ContentKind,
    /// Entities mentioned in the content
    pub entities: Vec<String>,
    /// Sentiment assigned by upstream analysis
    pub sentiment: Sentiment,
    /// The memory's raw creation timestamp
    pub created_at: String,
    /// When this snapshot entered the session buffer
    pub session_at: DateTime<Utc>,
}

impl SessionSnapshot {
    /// Snapshot a just-stored memory at the current instant.
    pub fn of(memory: &Memory) -> Self {
        Self {
            memory_id: memory.id.clone(),
            subject_id: memory.subject_id.clone(),
            content: memory.content.clone(),
            kind: memory.kind,
            entities: memory.entities.clone(),
            sentiment: memory.sentiment,
            created_at: memory.created_at.clone(),
            session_at: Utc::now(),
        }
    }
}

//! Recollect - Hybrid Memory Retrieval & Ranking Engine
//!
//! Recollect ranks a subject's stored memories for conversational AI
//! assistants by combining three retrieval signals: semantic similarity,
//! entity/concept graph relationships, and recency with temporal decay.
//! Storage and indexing live behind injected collaborator traits; this
//! crate owns the scoring pipeline, the result cache, and the session
//! buffer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       RetrievalEngine                           │
//! │                                                                 │
//! │  retrieve(query) ──► ResultCache (LRU) ──hit──► ranked list     │
//! │        │ miss                                                   │
//! │  ┌─────▼────────────────────────────────────────────────────┐   │
//! │  │                  Concurrent Fan-Out                      │   │
//! │  │  ┌─────────────┐  ┌────────────────┐  ┌──────────────┐   │   │
//! │  │  │ Similarity  │  │ Concept Graph  │  │   Recency    │   │   │
//! │  │  │   search    │  │  per-concept   │  │   lookup     │   │   │
//! │  │  │             │  │   traversal    │  │              │   │   │
//! │  │  └──────┬──────┘  └───────┬────────┘  └──────┬───────┘   │   │
//! │  │         └── timeout + degrade-to-empty ──────┘           │   │
//! │  └─────────────────────────┬────────────────────────────────┘   │
//! │                            │                                    │
//! │  ┌─────────────────────────▼────────────────────────────────┐   │
//! │  │  combine ──► temporal decay ──► truncate ──► cache ──►   │   │
//! │  └──────────────────────────────────────────────────────────┘   │
//! │                                                                 │
//! │  proactive_context() ──► trending/connected entities ──►        │
//! │       pseudo-query ──► retrieve() ──► connection enrichment     │
//! │                                                                 │
//! │  record_stored() ──► SessionBuffer (per-subject, TTL-pruned)    │
//! └─────────────────────────────────────────────────────────────────┘
//!           │                              │
//!   SimilarityIndex (trait)      RelationshipGraph (trait)
//!    vector store, etc.            graph store, etc.
//! ```
//!
//! ## Modules
//!
//! - [`engine`]: Retrieval orchestration, proactive context, insights
//! - [`collaborators`]: Injected similarity-index and graph traits
//! - [`scoring`]: Score combination and temporal decay
//! - [`concepts`]: Lightweight concept extraction from query text
//! - [`cache`]: Bounded LRU cache over ranked results
//! - [`session`]: Per-subject short-term session buffer
//! - [`memory`]: Memory records, builders, and candidate types
//! - [`config`]: Engine configuration

pub mod cache;
pub mod collaborators;
pub mod concepts;
pub mod config;
pub mod engine;
pub mod error;
pub mod memory;
pub mod scoring;
pub mod session;

pub use config::EngineConfig;
pub use engine::{MemoryInsights, RetrievalEngine};
pub use error::{Error, Result};
pub use memory::{Memory, MemoryBuilder, RankedCandidate, SessionSnapshot};

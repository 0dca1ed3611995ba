//! Memory data model
//!
//! `record` holds the immutable stored-memory record and its identity key.
//! `candidate` holds the transient ranked view produced per retrieval call,
//! plus the compact session snapshot written on the storage path.

pub mod candidate;
pub mod record;

pub use candidate::{CandidateSource, RankedCandidate, SessionSnapshot};
pub use record::{ContentKind, Memory, MemoryBuilder, MemoryKey, Sentiment};

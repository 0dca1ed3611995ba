//! Recollect error types

use thiserror::Error;

/// Recollect error type
#[derive(Error, Debug)]
pub enum Error {
    /// Collaborator error (similarity index or relationship graph)
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    /// Memory record error
    #[error("Memory error: {0}")]
    Memory(String),

    /// Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for recollect operations
pub type Result<T> = std::result::Result<T, Error>;

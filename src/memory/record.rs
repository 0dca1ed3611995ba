//! Stored memory record types
//!
//! A `Memory` is immutable once stored: the ingestion path creates it after
//! model analysis, and this engine only ever reads it. The creation
//! timestamp is carried as the raw string received from the backing store;
//! a record with an unparseable timestamp must still flow through ranking
//! (decay is skipped for it), so the string is the source of truth and
//! parsing happens on demand.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Length of the content prefix used by the composite identity fallback.
const COMPOSITE_PREFIX_LEN: usize = 50;

/// An immutable stored memory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    /// Opaque unique identifier. Empty when the backing store did not
    /// round-trip one (legacy records).
    #[serde(default)]
    pub id: String,
    /// Owner of this memory
    pub subject_id: String,
    /// The memory content
    pub content: String,
    /// Kind of content this memory was derived from
    pub kind: ContentKind,
    /// Raw ISO-8601 creation timestamp as received from the store
    pub created_at: String,
    /// Entities mentioned in the content, in extraction order
    #[serde(default)]
    pub entities: Vec<String>,
    /// Keywords for the content, in extraction order
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Sentiment assigned by upstream analysis
    #[serde(default)]
    pub sentiment: Sentiment,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Memory {
    /// Parse the creation timestamp.
    ///
    /// Accepts RFC 3339 (with `Z` or a numeric offset) and naive ISO-8601
    /// datetimes, which are taken as UTC. Returns `None` when the raw
    /// string cannot be parsed.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.created_at) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&self.created_at, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    /// Identity key for deduplication during score combination.
    pub fn key(&self) -> MemoryKey {
        if !self.id.is_empty() {
            MemoryKey::Id(self.id.clone())
        } else {
            let prefix: String = self.content.chars().take(COMPOSITE_PREFIX_LEN).collect();
            MemoryKey::Composite(format!("{}{}", self.created_at, prefix))
        }
    }
}

/// Candidate identity used when merging retrieval sources.
///
/// The true identifier is preferred. Records from legacy paths arrive
/// without one and fall back to a composite of the raw timestamp and a
/// fixed-length content prefix. Two distinct legacy records sharing both
/// would collide; the composite form exists for compatibility with stores
/// that drop the id, not as intended design.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryKey {
    /// The memory's true identifier
    Id(String),
    /// Timestamp string + content prefix fallback
    Composite(String),
}

/// Kind of content a memory was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Text,
    Image,
    Audio,
    Document,
    Multimodal,
}

impl ContentKind {
    /// Lowercase tag for this kind
    pub fn tag(&self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Image => "image",
            ContentKind::Audio => "audio",
            ContentKind::Document => "document",
            ContentKind::Multimodal => "multimodal",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ContentKind::Text),
            "image" => Ok(ContentKind::Image),
            "audio" => Ok(ContentKind::Audio),
            "document" => Ok(ContentKind::Document),
            "multimodal" => Ok(ContentKind::Multimodal),
            _ => Err(format!("Unknown content kind: {}", s)),
        }
    }
}

/// Sentiment assigned to a memory by upstream analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    /// Lowercase tag for this sentiment
    pub fn tag(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Builder for constructing `Memory` records
pub struct MemoryBuilder {
    id: Option<String>,
    subject_id: Option<String>,
    content: Option<String>,
    kind: ContentKind,
    created_at: Option<String>,
    entities: Vec<String>,
    keywords: Vec<String>,
    sentiment: Sentiment,
    metadata: HashMap<String, serde_json::Value>,
}

impl MemoryBuilder {
    /// Create a new builder with the required content kind
    pub fn new(kind: ContentKind) -> Self {
        Self {
            id: None,
            subject_id: None,
            content: None,
            kind,
            created_at: None,
            entities: Vec::new(),
            keywords: Vec::new(),
            sentiment: Sentiment::Neutral,
            metadata: HashMap::new(),
        }
    }

    /// Set an explicit identifier (a v4 UUID is minted otherwise)
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the owning subject
    pub fn subject_id(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = Some(subject_id.into());
        self
    }

    /// Set the memory content
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set an explicit creation timestamp (defaults to now, RFC 3339)
    pub fn created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    /// Add a single entity
    pub fn entity(mut self, entity: impl Into<String>) -> Self {
        self.entities.push(entity.into());
        self
    }

    /// Add multiple entities at once
    pub fn entities(mut self, entities: impl IntoIterator<Item = String>) -> Self {
        self.entities.extend(entities);
        self
    }

    /// Add a single keyword
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    /// Add multiple keywords at once
    pub fn keywords(mut self, keywords: impl IntoIterator<Item = String>) -> Self {
        self.keywords.extend(keywords);
        self
    }

    /// Set the sentiment
    pub fn sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = sentiment;
        self
    }

    /// Add a metadata entry
    pub fn metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Build the memory record, validating required fields
    pub fn build(self) -> Result<Memory> {
        let content = self
            .content
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::Memory("memory content is required".to_string()))?;
        let subject_id = self
            .subject_id
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Memory("memory subject is required".to_string()))?;

        Ok(Memory {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            subject_id,
            content,
            kind: self.kind,
            created_at: self
                .created_at
                .unwrap_or_else(|| Utc::now().to_rfc3339()),
            entities: self.entities,
            keywords: self.keywords,
            sentiment: self.sentiment,
            metadata: self.metadata,
        })
    }
}

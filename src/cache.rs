//! Bounded query-result cache with LRU eviction
//!
//! Memoizes (subject, query, limit, flags) → ranked result list so
//! retrieval can run on every message without redundant fan-out. Entries
//! are immutable snapshots: a hit is returned unchanged, a writer
//! replaces wholesale. There is no TTL and no partial invalidation —
//! staleness is bounded only by capacity pressure, a documented
//! limitation of the exact-match keying.

use crate::memory::RankedCandidate;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use tokio::sync::RwLock;

/// Exact-match cache key for one retrieval invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Owning subject
    pub subject_id: String,
    /// Hash of the normalized (trimmed, lowercased) query text
    pub query_hash: u64,
    /// Effective result limit
    pub limit: usize,
    /// Whether graph fan-out was requested
    pub include_graph: bool,
    /// Whether long-context mode was active
    pub long_context: bool,
}

impl CacheKey {
    /// Build a key from the raw retrieval arguments.
    pub fn new(
        subject_id: &str,
        query: &str,
        limit: usize,
        include_graph: bool,
        long_context: bool,
    ) -> Self {
        let mut hasher = DefaultHasher::new();
        query.trim().to_lowercase().hash(&mut hasher);
        Self {
            subject_id: subject_id.to_string(),
            query_hash: hasher.finish(),
            limit,
            include_graph,
            long_context,
        }
    }
}

/// Process-wide bounded LRU cache of ranked result lists.
///
/// `get` promotes an entry to most-recently-used; `put` evicts exactly
/// the least-recently-used entry when at capacity. Insert-and-evict is
/// atomic under a single write lock, so concurrent readers see either a
/// fully formed prior entry or a miss.
pub struct ResultCache {
    inner: RwLock<CacheInner>,
}

struct CacheInner {
    map: HashMap<CacheKey, Vec<RankedCandidate>>,
    /// LRU order: front = oldest, back = newest
    order: VecDeque<CacheKey>,
    capacity: usize,
}

impl ResultCache {
    /// Create a cache holding at most `capacity` result lists.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(CacheInner {
                map: HashMap::with_capacity(capacity.min(1024)),
                order: VecDeque::with_capacity(capacity.min(1024)),
                capacity,
            }),
        }
    }

    /// Look up an entry, promoting it to most-recently-used.
    pub async fn get(&self, key: &CacheKey) -> Option<Vec<RankedCandidate>> {
        let mut inner = self.inner.write().await;
        if let Some(entry) = inner.map.get(key) {
            let entry = entry.clone();
            inner.order.retain(|k| k != key);
            inner.order.push_back(key.clone());
            Some(entry)
        } else {
            None
        }
    }

    /// Look up an entry without promoting it.
    pub async fn peek(&self, key: &CacheKey) -> Option<Vec<RankedCandidate>> {
        self.inner.read().await.map.get(key).cloned()
    }

    /// Store an entry, evicting the LRU entry if at capacity.
    /// Returns the evicted key if eviction occurred.
    pub async fn put(&self, key: CacheKey, value: Vec<RankedCandidate>) -> Option<CacheKey> {
        let mut inner = self.inner.write().await;

        // Re-insert of an existing key replaces wholesale and re-promotes
        if inner.map.contains_key(&key) {
            inner.order.retain(|k| *k != key);
        }

        let evicted = if inner.map.len() >= inner.capacity && !inner.map.contains_key(&key) {
            Self::evict_lru(&mut inner)
        } else {
            None
        };

        inner.map.insert(key.clone(), value);
        inner.order.push_back(key);

        evicted
    }

    /// Current number of cached entries.
    pub async fn len(&self) -> usize {
        self.inner.read().await.map.len()
    }

    /// Whether the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.map.is_empty()
    }

    /// Configured capacity.
    pub async fn capacity(&self) -> usize {
        self.inner.read().await.capacity
    }

    /// Drop all entries.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.map.clear();
        inner.order.clear();
    }

    fn evict_lru(inner: &mut CacheInner) -> Option<CacheKey> {
        let lru_key = inner.order.pop_front()?;
        inner.map.remove(&lru_key);
        Some(lru_key)
    }
}

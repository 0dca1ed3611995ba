//! Per-subject session buffer
//!
//! A short-lived, bounded, time-expiring buffer of snapshots of
//! just-stored memories. The storage side effect appends here; live
//! handlers read the buffer back for recent-context assembly. Expired
//! snapshots are pruned lazily on both paths — there is no background
//! sweeper.

use crate::config::SessionConfig;
use crate::memory::SessionSnapshot;
use chrono::{Duration, Utc};
use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;
use tracing::debug;

/// Bounded, time-expiring per-subject snapshot buffer.
pub struct SessionBuffer {
    inner: RwLock<HashMap<String, VecDeque<SessionSnapshot>>>,
    per_subject_limit: usize,
    ttl: Duration,
}

impl SessionBuffer {
    /// Create a buffer from configuration.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            per_subject_limit: config.per_subject_limit,
            ttl: config.ttl(),
        }
    }

    /// Append a snapshot for its subject, newest first.
    ///
    /// Prunes expired snapshots and truncates to the per-subject cap.
    pub async fn record(&self, snapshot: SessionSnapshot) {
        let now = Utc::now();
        let mut inner = self.inner.write().await;
        let buffer = inner.entry(snapshot.subject_id.clone()).or_default();

        buffer.push_front(snapshot);
        buffer.retain(|s| now - s.session_at <= self.ttl);
        buffer.truncate(self.per_subject_limit);
    }

    /// The subject's buffered snapshots, newest first, at most `limit`.
    pub async fn recent(&self, subject_id: &str, limit: usize) -> Vec<SessionSnapshot> {
        let now = Utc::now();
        let mut inner = self.inner.write().await;
        let Some(buffer) = inner.get_mut(subject_id) else {
            return Vec::new();
        };

        buffer.retain(|s| now - s.session_at <= self.ttl);
        let snapshots: Vec<SessionSnapshot> = buffer.iter().take(limit).cloned().collect();
        debug!(
            subject_id,
            count = snapshots.len(),
            "read session snapshots"
        );
        snapshots
    }

    /// Number of buffered snapshots for a subject (expired included
    /// until the next prune).
    pub async fn len(&self, subject_id: &str) -> usize {
        self.inner
            .read()
            .await
            .get(subject_id)
            .map(|b| b.len())
            .unwrap_or(0)
    }

    /// Drop a subject's buffer entirely.
    pub async fn clear_subject(&self, subject_id: &str) {
        self.inner.write().await.remove(subject_id);
    }
}

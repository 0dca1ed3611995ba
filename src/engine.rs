//! Hybrid retrieval engine
//!
//! Orchestrates concept extraction, similarity search, graph traversal,
//! and recency lookup into ranked, budget-bounded memory lists:
//!
//! ```text
//!            retrieve(query)                 proactive_context()
//!                  │                                │
//!            [ResultCache]◄──────┐        trending + connected entities
//!              miss│             │                  │
//!    ┌─────────────┼──────────┐  │           pseudo-query synthesis
//!    ▼             ▼          ▼  │                  │
//! similarity   graph per   recency─── combine ── decay ── truncate ──►
//!  search      concept     lookup        │
//!    └───────(concurrent, per-call timeout, degrade to empty)
//! ```
//!
//! The engine is constructed once at process start with injected
//! collaborator handles and shared by reference across handlers. It holds
//! no mutable state beyond the bounded result cache and the session
//! buffer.

use crate::cache::{CacheKey, ResultCache};
use crate::collaborators::{
    ConnectedEntity, RelatedConcept, RelationshipGraph, SimilarityIndex, TrendingEntity,
};
use crate::concepts::ConceptExtractor;
use crate::config::EngineConfig;
use crate::memory::{Memory, RankedCandidate, SessionSnapshot};
use crate::scoring::{combine, decay};
use crate::session::SessionBuffer;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Trailing window for trending-entity lookup, in days.
const TRENDING_WINDOW_DAYS: u32 = 7;
/// Trending entities fetched per proactive call.
const TRENDING_LIMIT: usize = 15;
/// Trending entity names folded into the pseudo-query.
const TRENDING_QUERY_TERMS: usize = 8;
/// Connected entities fetched per proactive call.
const CONNECTED_LIMIT: usize = 20;
/// Connected entity names folded into the pseudo-query.
const CONNECTED_QUERY_TERMS: usize = 5;
/// Connections attached per candidate during enrichment.
const CONNECTIONS_PER_CANDIDATE: usize = 5;

/// Trailing window for insight trend analysis, in days.
const INSIGHTS_WINDOW_DAYS: u32 = 30;
/// Trending entities fetched for insights.
const INSIGHTS_TRENDING_LIMIT: usize = 25;
/// Entity network size fetched for insights.
const INSIGHTS_NETWORK_LIMIT: usize = 40;
/// Recent memories sampled for insight distributions.
const INSIGHTS_RECENT_LIMIT: usize = 150;
/// Trending entities kept in the insights report.
const INSIGHTS_TRENDING_KEPT: usize = 15;
/// Most-connected entities kept in the insights report.
const INSIGHTS_CONNECTED_KEPT: usize = 8;

/// Hybrid memory retrieval and ranking engine.
pub struct RetrievalEngine {
    similarity: Arc<dyn SimilarityIndex>,
    graph: Arc<dyn RelationshipGraph>,
    extractor: ConceptExtractor,
    cache: ResultCache,
    sessions: SessionBuffer,
    config: EngineConfig,
}

impl RetrievalEngine {
    /// Create an engine with injected collaborator handles.
    pub fn new(
        config: EngineConfig,
        similarity: Arc<dyn SimilarityIndex>,
        graph: Arc<dyn RelationshipGraph>,
    ) -> Self {
        Self {
            similarity,
            graph,
            extractor: ConceptExtractor::new(config.retrieval.max_concepts),
            cache: ResultCache::new(config.cache.capacity),
            sessions: SessionBuffer::new(&config.session),
            config,
        }
    }

    /// Query-driven hybrid retrieval.
    ///
    /// Returns at most the effective limit of ranked candidates, best
    /// first. Collaborator failures degrade that source to empty; the
    /// caller always gets a list, possibly empty.
    pub async fn retrieve(
        &self,
        query: &str,
        subject_id: &str,
        limit: Option<usize>,
        include_graph: bool,
        use_long_context: Option<bool>,
    ) -> Vec<RankedCandidate> {
        if query.trim().is_empty() {
            debug!(subject_id, "empty query, skipping retrieval");
            return Vec::new();
        }

        let long_context =
            use_long_context.unwrap_or(self.config.retrieval.long_context_enabled);
        let effective_limit = self.effective_limit(limit, long_context);

        let key = CacheKey::new(subject_id, query, effective_limit, include_graph, long_context);
        if let Some(cached) = self.cache.get(&key).await {
            debug!(subject_id, "retrieval served from cache");
            return cached;
        }

        let retrieval = &self.config.retrieval;
        let similarity_fut = self.guarded(
            "similarity search",
            self.similarity.search(
                query,
                subject_id,
                (effective_limit / 2).max(1),
                retrieval.min_confidence,
            ),
        );
        let graph_fut = async {
            if include_graph {
                self.graph_fanout(query).await
            } else {
                Vec::new()
            }
        };
        let recency_fut = self.guarded(
            "recency lookup",
            self.similarity.recent(subject_id, (effective_limit / 3).max(1)),
        );

        let (similarity_hits, graph_hits, recency_hits) =
            tokio::join!(similarity_fut, graph_fut, recency_fut);

        let combined = combine(&similarity_hits, &recency_hits, &graph_hits, long_context);
        let mut ranked = decay(combined, long_context);
        ranked.truncate(effective_limit);

        self.cache.put(key, ranked.clone()).await;
        info!(
            subject_id,
            count = ranked.len(),
            long_context,
            "retrieved contextual memories"
        );
        ranked
    }

    /// Proactive (query-less) context assembly.
    ///
    /// Synthesizes a pseudo-query from the subject's trending and most
    /// connected entities plus any live input, retrieves through the
    /// query-driven path in long-context mode, then attaches cross-memory
    /// connections best-effort.
    pub async fn proactive_context(
        &self,
        subject_id: &str,
        live_input: &str,
        max_results: Option<usize>,
    ) -> Vec<RankedCandidate> {
        let max_results =
            max_results.unwrap_or(self.config.retrieval.context_memory_limit);

        let (trending, connected) = tokio::join!(
            self.guarded(
                "trending entities",
                self.graph
                    .trending_entities(subject_id, TRENDING_WINDOW_DAYS, TRENDING_LIMIT),
            ),
            self.guarded(
                "connected entities",
                self.graph.connected_entities(subject_id, CONNECTED_LIMIT),
            ),
        );

        let mut parts: Vec<String> = Vec::new();
        if !live_input.trim().is_empty() {
            parts.push(live_input.trim().to_string());
        }
        parts.extend(
            trending
                .iter()
                .take(TRENDING_QUERY_TERMS)
                .map(|t: &TrendingEntity| t.entity.clone()),
        );
        parts.extend(
            connected
                .iter()
                .take(CONNECTED_QUERY_TERMS)
                .map(|c: &ConnectedEntity| c.entity.clone()),
        );

        let pseudo_query = parts.join(" ");
        if pseudo_query.is_empty() {
            debug!(subject_id, "no signals for proactive retrieval");
            return Vec::new();
        }

        let mut candidates = self
            .retrieve(&pseudo_query, subject_id, Some(max_results), true, Some(true))
            .await;

        // Best-effort connection enrichment: a failure leaves the
        // candidate without connections, never drops it
        for candidate in candidates.iter_mut() {
            if candidate.memory.id.is_empty() {
                continue;
            }
            let memory_id = candidate.memory.id.clone();
            candidate.connections = self
                .guarded(
                    "memory connections",
                    self.graph.memory_connections(
                        &memory_id,
                        subject_id,
                        CONNECTIONS_PER_CANDIDATE,
                    ),
                )
                .await;
        }

        info!(
            subject_id,
            count = candidates.len(),
            "assembled proactive context"
        );
        candidates
    }

    /// Storage side effect: buffer a snapshot of a just-stored memory.
    pub async fn record_stored(&self, memory: &Memory) {
        self.sessions.record(SessionSnapshot::of(memory)).await;
        debug!(
            subject_id = memory.subject_id.as_str(),
            memory_id = memory.id.as_str(),
            "buffered session snapshot"
        );
    }

    /// The subject's buffered session snapshots, newest first.
    pub async fn session_context(
        &self,
        subject_id: &str,
        limit: Option<usize>,
    ) -> Vec<SessionSnapshot> {
        let limit = limit.unwrap_or(self.config.retrieval.context_memory_limit);
        self.sessions.recent(subject_id, limit).await
    }

    /// Aggregate a subject's memory patterns into an insights report.
    ///
    /// Each source degrades to empty independently; an unreachable graph
    /// still yields content-kind and sentiment distributions, and vice
    /// versa.
    pub async fn insights(&self, subject_id: &str) -> MemoryInsights {
        let (trending, network, recent) = tokio::join!(
            self.guarded(
                "trending entities",
                self.graph.trending_entities(
                    subject_id,
                    INSIGHTS_WINDOW_DAYS,
                    INSIGHTS_TRENDING_LIMIT,
                ),
            ),
            self.guarded(
                "connected entities",
                self.graph.connected_entities(subject_id, INSIGHTS_NETWORK_LIMIT),
            ),
            self.guarded(
                "recency lookup",
                self.similarity.recent(subject_id, INSIGHTS_RECENT_LIMIT),
            ),
        );

        let mut kind_distribution: HashMap<String, usize> = HashMap::new();
        let mut sentiment_distribution: HashMap<String, usize> = HashMap::new();
        for hit in &recent {
            *kind_distribution
                .entry(hit.memory.kind.tag().to_string())
                .or_insert(0) += 1;
            *sentiment_distribution
                .entry(hit.memory.sentiment.tag().to_string())
                .or_insert(0) += 1;
        }

        let entity_network_size = network.len();
        let mut trending = trending;
        trending.truncate(INSIGHTS_TRENDING_KEPT);
        let mut most_connected = network;
        most_connected.truncate(INSIGHTS_CONNECTED_KEPT);

        MemoryInsights {
            trending_entities: trending,
            most_connected,
            entity_network_size,
            sampled_memories: recent.len(),
            kind_distribution,
            sentiment_distribution,
            generated_at: Utc::now(),
        }
    }

    /// Widen the limit in long-context mode, capped at the configured
    /// ceiling.
    fn effective_limit(&self, limit: Option<usize>, long_context: bool) -> usize {
        let base = limit.unwrap_or(self.config.retrieval.base_limit);
        if long_context {
            (base * 2).min(self.config.retrieval.context_memory_limit)
        } else {
            base
        }
    }

    /// Per-concept graph traversal, issued concurrently and accumulated.
    ///
    /// Arrival order does not affect correctness — combination treats the
    /// result as a bag of (concept, strength) evidence.
    async fn graph_fanout(&self, query: &str) -> Vec<RelatedConcept> {
        let concepts = self.extractor.extract(query);
        if concepts.is_empty() {
            debug!("no concepts extracted, skipping graph fan-out");
            return Vec::new();
        }

        let retrieval = &self.config.retrieval;
        let lookups = concepts.iter().map(|concept| {
            self.guarded(
                "graph traversal",
                self.graph.related_concepts(
                    &concept.term,
                    retrieval.graph_depth,
                    retrieval.graph_strength_floor,
                    retrieval.graph_related_limit,
                ),
            )
        });
        join_all(lookups).await.into_iter().flatten().collect()
    }

    /// Bound a collaborator call by the configured timeout and degrade
    /// failure or timeout to an empty result.
    async fn guarded<T>(
        &self,
        source: &str,
        call: impl Future<Output = crate::error::Result<Vec<T>>>,
    ) -> Vec<T> {
        let timeout = self.config.retrieval.collaborator_timeout();
        match tokio::time::timeout(timeout, call).await {
            Ok(Ok(items)) => items,
            Ok(Err(e)) => {
                warn!("{} failed, degrading to empty: {}", source, e);
                Vec::new()
            }
            Err(_) => {
                warn!("{} timed out after {:?}, degrading to empty", source, timeout);
                Vec::new()
            }
        }
    }
}

/// Aggregated view of a subject's memory patterns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryInsights {
    /// Entities trending over the insight window
    pub trending_entities: Vec<TrendingEntity>,
    /// The subject's most connected entities
    pub most_connected: Vec<ConnectedEntity>,
    /// Size of the fetched entity network
    pub entity_network_size: usize,
    /// Number of recent memories sampled for the distributions
    pub sampled_memories: usize,
    /// Memory count per content kind among the sample
    pub kind_distribution: HashMap<String, usize>,
    /// Memory count per sentiment among the sample
    pub sentiment_distribution: HashMap<String, usize>,
    /// When this report was generated
    pub generated_at: DateTime<Utc>,
}

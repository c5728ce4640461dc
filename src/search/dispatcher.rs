//! Multi-instance fallback dispatch

use super::candidates::CandidateList;
use super::error::SearchError;
use super::models::SearchQuery;
use crate::metrics::Metrics;
use crate::upstream::{RawResponse, Upstream, UpstreamInstance};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default cap on instances tried for one request
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// A successful upstream answer
#[derive(Debug, Clone)]
pub struct Dispatched {
    /// Instance that answered
    pub instance: UpstreamInstance,
    pub response: RawResponse,
    /// Time spent on the successful attempt
    pub elapsed: Duration,
}

/// Tries upstream instances one after another until one answers
pub struct FallbackDispatcher {
    upstream: Arc<dyn Upstream>,
    pool: Vec<UpstreamInstance>,
    max_attempts: usize,
    shuffle: bool,
    metrics: Arc<Metrics>,
}

impl FallbackDispatcher {
    /// Create a dispatcher over a pool of instances
    pub fn new(upstream: Arc<dyn Upstream>, pool: Vec<UpstreamInstance>) -> Self {
        Self {
            upstream,
            pool,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            shuffle: true,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Set the attempt cap
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Enable or disable per-request shuffling
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Record attempts into shared metrics
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn pool(&self) -> &[UpstreamInstance] {
        &self.pool
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Candidates for one request
    pub fn candidates(&self) -> CandidateList {
        if self.shuffle {
            CandidateList::shuffled(&self.pool, self.max_attempts)
        } else {
            CandidateList::in_order(&self.pool, self.max_attempts)
        }
    }

    /// Run the query against the candidates, returning the first success
    pub async fn dispatch(&self, query: &SearchQuery) -> Result<Dispatched, SearchError> {
        self.dispatch_to(&self.candidates(), query).await
    }

    /// Run the query against an explicit candidate list
    pub async fn dispatch_to(
        &self,
        candidates: &CandidateList,
        query: &SearchQuery,
    ) -> Result<Dispatched, SearchError> {
        let mut failures = Vec::with_capacity(candidates.len());

        for (attempt, instance) in candidates.iter().enumerate() {
            debug!(
                "Attempt {}/{} for '{}' on {}",
                attempt + 1,
                candidates.len(),
                query.query,
                instance
            );

            let start = Instant::now();
            match self.upstream.search(instance, query).await {
                Ok(response) => {
                    let elapsed = start.elapsed();
                    self.metrics
                        .record_success(instance.as_str(), elapsed.as_millis() as u64);
                    info!(
                        "Instance {} answered '{}' with {} results in {:?}",
                        instance,
                        query.query,
                        response.results.len(),
                        elapsed
                    );
                    return Ok(Dispatched {
                        instance: instance.clone(),
                        response,
                        elapsed,
                    });
                }
                Err(e) => {
                    self.metrics.record_failure(instance.as_str());
                    warn!("Upstream instance failed, trying next: {}", e);
                    failures.push(e);
                }
            }
        }

        warn!(
            "All {} attempted instances failed for '{}'",
            failures.len(),
            query.query
        );
        Err(SearchError::AllInstancesFailed { failures })
    }
}

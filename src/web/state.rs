//! Application state shared across handlers

use crate::cache::ResponseCache;
use crate::config::Settings;
use crate::health::HealthChecker;
use crate::metrics::Metrics;
use crate::search::{FallbackDispatcher, SearchService};
use crate::upstream::UpstreamClient;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Cached search executor
    pub search: Arc<SearchService>,
    /// Upstream and cache prober
    pub health: Arc<HealthChecker>,
}

impl AppState {
    /// Create new application state around an already connected cache
    pub fn new(settings: Settings, cache: ResponseCache) -> anyhow::Result<Self> {
        let pool = settings.upstream.parsed_instances()?;
        let client = UpstreamClient::with_settings(&settings.upstream)?;

        let dispatcher = FallbackDispatcher::new(Arc::new(client.clone()), pool.clone())
            .with_max_attempts(settings.upstream.max_attempts)
            .with_shuffle(settings.upstream.shuffle);

        let search = SearchService::new(dispatcher, cache.clone(), settings.cache.ttl());
        let health = HealthChecker::new(client, pool, cache);

        Ok(Self {
            settings: Arc::new(settings),
            search: Arc::new(search),
            health: Arc::new(health),
        })
    }

    pub fn metrics(&self) -> &Metrics {
        self.search.dispatcher().metrics()
    }
}

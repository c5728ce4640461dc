//! Caching module for SearXNG-API
//!
//! Memoizes formatted search responses in Redis when configured and
//! reachable, otherwise in an in-process map. Cache failures never fail a
//! search: they degrade to the in-process map.

mod memory;
mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

use crate::config::CacheSettings;
use crate::search::Category;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Recoverable cache store failure
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache store error: {0}")]
    Store(#[from] redis::RedisError),
    #[error("cache store timed out")]
    Timeout,
}

/// A key-value store holding serialized responses
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Check the store is reachable
    async fn ping(&self) -> Result<(), CacheError>;
}

/// Generate a cache key for a search.
///
/// Parameters are sorted by name before hashing, so the order they are
/// supplied in does not matter.
pub fn cache_key<I, K, V>(query: &str, category: Category, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let sorted: BTreeMap<String, String> = params
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    // a map of strings always serializes
    let encoded = serde_json::to_string(&sorted).unwrap_or_default();
    let digest = md5::compute(format!("{}:{}:{}", query, category, encoded));

    format!("search:{:x}", digest)
}

/// Which backend serves the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheKind {
    Disabled,
    Memory,
    Redis,
}

/// Cache store health as reported by `/health`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Caching switched off
    Disabled,
    /// In-process map, no external store configured
    Memory,
    Healthy,
    Unreachable,
}

#[derive(Clone)]
enum Backend {
    Disabled,
    Memory,
    External(Arc<dyn CacheStore>),
}

/// Response cache injected into the search service
#[derive(Clone)]
pub struct ResponseCache {
    backend: Backend,
    local: MemoryStore,
    /// An external store was configured but could not be reached at startup
    external_lost: bool,
}

impl ResponseCache {
    /// Cache that never stores anything
    pub fn disabled() -> Self {
        Self {
            backend: Backend::Disabled,
            local: MemoryStore::new(),
            external_lost: false,
        }
    }

    /// In-process cache
    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory,
            local: MemoryStore::new(),
            external_lost: false,
        }
    }

    /// Cache backed by an external store, with the in-process map as fallback
    pub fn with_store(store: Arc<dyn CacheStore>) -> Self {
        Self {
            backend: Backend::External(store),
            local: MemoryStore::new(),
            external_lost: false,
        }
    }

    /// Build the cache described by the settings.
    ///
    /// An unreachable Redis is logged and replaced by the in-process map.
    pub async fn connect(settings: &CacheSettings) -> Self {
        if !settings.enabled {
            info!("Response caching disabled");
            return Self::disabled();
        }

        let Some(url) = settings.redis_url.as_deref() else {
            info!("Using in-memory response cache");
            return Self::memory();
        };

        match RedisStore::connect(url, settings.connect_timeout()).await {
            Ok(store) => {
                info!("Using Redis response cache");
                Self::with_store(Arc::new(store))
            }
            Err(e) => {
                warn!("Redis unavailable, falling back to in-memory cache: {}", e);
                Self {
                    external_lost: true,
                    ..Self::memory()
                }
            }
        }
    }

    pub fn kind(&self) -> CacheKind {
        match self.backend {
            Backend::Disabled => CacheKind::Disabled,
            Backend::Memory => CacheKind::Memory,
            Backend::External(_) => CacheKind::Redis,
        }
    }

    /// Get a cached value
    pub async fn get(&self, key: &str) -> Option<String> {
        match &self.backend {
            Backend::Disabled => None,
            Backend::Memory => self.local.value(key).await,
            Backend::External(store) => match store.get(key).await {
                Ok(value) => value,
                Err(e) => {
                    warn!("Cache read failed, using in-memory cache: {}", e);
                    self.local.value(key).await
                }
            },
        }
    }

    /// Store a value with a time-to-live
    pub async fn set(&self, key: &str, value: &str, ttl: Duration) {
        match &self.backend {
            Backend::Disabled => {}
            Backend::Memory => self.local.insert(key, value, ttl).await,
            Backend::External(store) => {
                if let Err(e) = store.set(key, value, ttl).await {
                    warn!("Cache write failed, using in-memory cache: {}", e);
                    self.local.insert(key, value, ttl).await;
                }
            }
        }
    }

    /// Probe the configured store
    pub async fn status(&self) -> CacheStatus {
        match &self.backend {
            Backend::Disabled => CacheStatus::Disabled,
            Backend::Memory if self.external_lost => CacheStatus::Unreachable,
            Backend::Memory => CacheStatus::Memory,
            Backend::External(store) => match store.ping().await {
                Ok(()) => CacheStatus::Healthy,
                Err(e) => {
                    warn!("Cache store ping failed: {}", e);
                    CacheStatus::Unreachable
                }
            },
        }
    }
}

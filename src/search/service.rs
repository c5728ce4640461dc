//! Cached search execution

use super::dispatcher::FallbackDispatcher;
use super::error::SearchError;
use super::format::build_response;
use super::models::{SearchQuery, SearchResponse};
use crate::cache::ResponseCache;
use std::time::Duration;
use tracing::{debug, warn};

/// Runs searches through the response cache and the fallback dispatcher
pub struct SearchService {
    dispatcher: FallbackDispatcher,
    cache: ResponseCache,
    ttl: Duration,
}

impl SearchService {
    pub fn new(dispatcher: FallbackDispatcher, cache: ResponseCache, ttl: Duration) -> Self {
        Self {
            dispatcher,
            cache,
            ttl,
        }
    }

    pub fn dispatcher(&self) -> &FallbackDispatcher {
        &self.dispatcher
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Answer a query from cache, or from upstream on a miss
    pub async fn execute(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError> {
        let key = query.cache_key();

        if let Some(mut hit) = self.lookup(&key).await {
            debug!("Cache hit for '{}' ({})", query.query, key);
            self.dispatcher.metrics().inc_cache_hit();
            hit.cached = true;
            return Ok(hit);
        }

        let dispatched = self.dispatcher.dispatch(query).await?;
        self.dispatcher.metrics().inc_search();

        let response = build_response(query, &dispatched.response, dispatched.elapsed);
        match serde_json::to_string(&response) {
            Ok(json) => self.cache.set(&key, &json, self.ttl).await,
            Err(e) => warn!("Failed to serialize response for caching: {}", e),
        }

        Ok(response)
    }

    async fn lookup(&self, key: &str) -> Option<SearchResponse> {
        let raw = self.cache.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(response) => Some(response),
            Err(e) => {
                warn!("Ignoring unreadable cache entry {}: {}", key, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Category;
    use crate::upstream::{UpstreamClient, UpstreamInstance};
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn searxng_with(results: usize, expected_calls: u64) -> MockServer {
        let server = MockServer::start().await;
        let results: Vec<_> = (0..results)
            .map(|i| json!({"title": format!("r{}", i), "url": format!("https://e.org/{}", i), "engine": "bing"}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "number_of_results": results.len(),
                "results": results,
            })))
            .expect(expected_calls)
            .mount(&server)
            .await;
        server
    }

    fn service(server: &MockServer, cache: ResponseCache) -> SearchService {
        let pool = vec![UpstreamInstance::parse(&server.uri()).unwrap()];
        let dispatcher = FallbackDispatcher::new(Arc::new(UpstreamClient::new().unwrap()), pool);
        SearchService::new(dispatcher, cache, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_second_call_is_cached() {
        let server = searxng_with(5, 1).await;
        let service = service(&server, ResponseCache::memory());
        let query = SearchQuery::new("cache test", Category::General).with_limit(1);

        let first = service.execute(&query).await.unwrap();
        let second = service.execute(&query).await.unwrap();

        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(first.results, second.results);
        assert_eq!(second.results.len(), 1);

        let stats = service.dispatcher().metrics().snapshot();
        assert_eq!(stats.total_searches, 1);
        assert_eq!(stats.cache_hits, 1);
    }

    #[tokio::test]
    async fn test_different_limit_misses_cache() {
        let server = searxng_with(5, 2).await;
        let service = service(&server, ResponseCache::memory());

        let a = SearchQuery::new("q", Category::General).with_limit(2);
        let b = SearchQuery::new("q", Category::General).with_limit(3);
        assert!(!service.execute(&a).await.unwrap().cached);
        let second = service.execute(&b).await.unwrap();
        assert!(!second.cached);
        assert_eq!(second.results.len(), 3);
    }

    #[tokio::test]
    async fn test_disabled_cache_always_queries_upstream() {
        let server = searxng_with(1, 2).await;
        let service = service(&server, ResponseCache::disabled());
        let query = SearchQuery::new("q", Category::News);

        assert!(!service.execute(&query).await.unwrap().cached);
        assert!(!service.execute(&query).await.unwrap().cached);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let server = searxng_with(1, 1).await;
        let cache = ResponseCache::memory();
        let query = SearchQuery::new("q", Category::General);
        cache
            .set(&query.cache_key(), "not json", Duration::from_secs(60))
            .await;

        let service = service(&server, cache);
        assert!(!service.execute(&query).await.unwrap().cached);
    }
}

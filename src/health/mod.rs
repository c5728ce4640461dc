//! Health reporting
//!
//! Probes every upstream instance and the cache store.

use crate::cache::{CacheStatus, ResponseCache};
use crate::upstream::{InstanceStatus, UpstreamClient, UpstreamInstance};
use chrono::{SecondsFormat, Utc};
use futures::future::join_all;
use serde::Serialize;

/// Overall service health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    /// At least one upstream instance answers its probe
    Healthy,
    /// The service is up but no upstream instance answered
    Degraded,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstanceHealth {
    pub url: UpstreamInstance,
    pub status: InstanceStatus,
}

/// Body of the `/health` endpoint
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: OverallStatus,
    /// Best status across all instances
    pub searxng: InstanceStatus,
    pub redis: CacheStatus,
    pub instances: Vec<InstanceHealth>,
    pub timestamp: String,
}

/// Probes upstream instances and the cache store
pub struct HealthChecker {
    client: UpstreamClient,
    pool: Vec<UpstreamInstance>,
    cache: ResponseCache,
}

impl HealthChecker {
    pub fn new(client: UpstreamClient, pool: Vec<UpstreamInstance>, cache: ResponseCache) -> Self {
        Self {
            client,
            pool,
            cache,
        }
    }

    /// Probe everything concurrently
    pub async fn check(&self) -> HealthReport {
        let probes = join_all(self.pool.iter().map(|instance| async move {
            InstanceHealth {
                url: instance.clone(),
                status: self.client.probe(instance).await,
            }
        }));
        let (instances, redis) = futures::join!(probes, self.cache.status());

        let searxng = instances
            .iter()
            .map(|i| i.status)
            .max()
            .unwrap_or(InstanceStatus::Unreachable);

        let status = if searxng == InstanceStatus::Healthy {
            OverallStatus::Healthy
        } else {
            OverallStatus::Degraded
        };

        HealthReport {
            status,
            searxng,
            redis,
            instances,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamSettings;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> UpstreamClient {
        UpstreamClient::with_settings(&UpstreamSettings {
            health_timeout: 1.0,
            ..Default::default()
        })
        .unwrap()
    }

    async fn searxng(status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/healthz"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_healthy_when_probe_succeeds() {
        let server = searxng(200).await;
        let pool = vec![UpstreamInstance::parse(&server.uri()).unwrap()];
        let report = HealthChecker::new(client(), pool, ResponseCache::memory())
            .check()
            .await;

        assert_eq!(report.status, OverallStatus::Healthy);
        assert_eq!(report.searxng, InstanceStatus::Healthy);
        assert_eq!(report.redis, CacheStatus::Memory);
    }

    #[tokio::test]
    async fn test_degraded_when_probe_fails() {
        let server = searxng(503).await;
        let pool = vec![
            UpstreamInstance::parse(&server.uri()).unwrap(),
            UpstreamInstance::parse("http://127.0.0.1:1").unwrap(),
        ];
        let report = HealthChecker::new(client(), pool, ResponseCache::disabled())
            .check()
            .await;

        assert_eq!(report.status, OverallStatus::Degraded);
        assert_eq!(report.searxng, InstanceStatus::Unhealthy);
        assert_eq!(report.instances[1].status, InstanceStatus::Unreachable);
        assert_eq!(report.redis, CacheStatus::Disabled);
    }

    #[tokio::test]
    async fn test_one_healthy_instance_is_enough() {
        let good = searxng(200).await;
        let pool = vec![
            UpstreamInstance::parse("http://127.0.0.1:1").unwrap(),
            UpstreamInstance::parse(&good.uri()).unwrap(),
        ];
        let report = HealthChecker::new(client(), pool, ResponseCache::memory())
            .check()
            .await;

        assert_eq!(report.status, OverallStatus::Healthy);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["instances"][0]["status"], "unreachable");
    }
}

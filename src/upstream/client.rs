//! HTTP client for SearXNG instances

use super::{InstanceStatus, RawResponse, Upstream, UpstreamError, UpstreamInstance};
use crate::config::UpstreamSettings;
use crate::search::SearchQuery;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// HTTP client wrapper speaking SearXNG's JSON API
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    search_timeout: Duration,
    health_timeout: Duration,
}

impl UpstreamClient {
    /// Create a new client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&UpstreamSettings::default())
    }

    /// Create a new client with custom settings
    pub fn with_settings(settings: &UpstreamSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("searxng-api/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(20)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            search_timeout: settings.search_timeout(),
            health_timeout: settings.health_timeout(),
        })
    }

    /// Query parameters sent to `/search`
    fn search_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
        vec![
            ("q", query.query.clone()),
            ("format", "json".to_string()),
            ("categories", query.category.as_str().to_string()),
            ("language", query.language.clone()),
            ("safesearch", query.safesearch.to_string()),
            ("pageno", "1".to_string()),
        ]
    }

    /// Probe an instance's `/healthz` endpoint
    pub async fn probe(&self, instance: &UpstreamInstance) -> InstanceStatus {
        let url = match instance.endpoint("healthz") {
            Ok(url) => url,
            Err(_) => return InstanceStatus::Unreachable,
        };

        match self
            .client
            .get(url)
            .timeout(self.health_timeout)
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::OK => InstanceStatus::Healthy,
            Ok(response) => {
                debug!("Health probe for {} returned {}", instance, response.status());
                InstanceStatus::Unhealthy
            }
            Err(e) => {
                debug!("Health probe for {} failed: {}", instance, e);
                InstanceStatus::Unreachable
            }
        }
    }
}

#[async_trait]
impl Upstream for UpstreamClient {
    async fn search(
        &self,
        instance: &UpstreamInstance,
        query: &SearchQuery,
    ) -> Result<RawResponse, UpstreamError> {
        let url = instance
            .endpoint("search")
            .map_err(|source| UpstreamError::Endpoint {
                instance: instance.to_string(),
                source,
            })?;

        let response = self
            .client
            .get(url)
            .timeout(self.search_timeout)
            .header("Accept", "application/json")
            .query(&Self::search_params(query))
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(instance.to_string(), e))?;

        if response.status() != StatusCode::OK {
            return Err(UpstreamError::Status {
                instance: instance.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .json::<RawResponse>()
            .await
            .map_err(|e| UpstreamError::from_reqwest(instance.to_string(), e))
    }
}

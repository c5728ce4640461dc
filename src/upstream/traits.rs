//! Upstream trait

use super::{RawResponse, UpstreamError, UpstreamInstance};
use crate::search::SearchQuery;
use async_trait::async_trait;

/// Anything able to run a search against a single upstream instance
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Query one instance, failing on any non-successful outcome
    async fn search(
        &self,
        instance: &UpstreamInstance,
        query: &SearchQuery,
    ) -> Result<RawResponse, UpstreamError>;
}

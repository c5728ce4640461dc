//! Upstream SearXNG access
//!
//! Provides the HTTP client for SearXNG's JSON API and the types describing
//! upstream instances and their raw responses.

mod client;
mod error;
mod instance;
mod models;
mod traits;

pub use client::UpstreamClient;
pub use error::UpstreamError;
pub use instance::{InstanceUrlError, UpstreamInstance};
pub use models::{InstanceStatus, RawResponse, RawResult};
pub use traits::Upstream;

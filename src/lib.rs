//! SearXNG-API: a JSON search API in front of SearXNG
//!
//! Forwards queries to one or more SearXNG instances, falls back across
//! instances on failure, normalizes the response shape and caches results.

pub mod cache;
pub mod config;
pub mod health;
pub mod metrics;
pub mod search;
pub mod upstream;
pub mod web;

pub use cache::ResponseCache;
pub use config::Settings;
pub use search::{Category, SearchQuery, SearchResponse, SearchResult, SearchService};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Search module
//!
//! Query models, the multi-instance fallback dispatcher and the cached
//! search service built on top of it.

mod candidates;
mod dispatcher;
mod error;
mod format;
mod models;
mod service;

pub use candidates::CandidateList;
pub use dispatcher::{Dispatched, FallbackDispatcher, DEFAULT_MAX_ATTEMPTS};
pub use error::SearchError;
pub use format::{build_response, format_result, format_results};
pub use models::*;
pub use service::SearchService;

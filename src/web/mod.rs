//! Web server module
//!
//! Provides the HTTP API for SearXNG-API.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use handlers::SearchParams;
pub use routes::create_router;
pub use state::AppState;

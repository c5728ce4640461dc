//! HTTP request handlers

use super::error::ApiError;
use super::state::AppState;
use crate::config::SearchSettings;
use crate::health::HealthReport;
use crate::metrics::StatsSnapshot;
use crate::search::{Category, SearchQuery, SearchResponse};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

/// Query parameters shared by every search endpoint
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Search query
    pub q: Option<String>,
    /// Number of results
    pub limit: Option<u32>,
    /// 0 = off, 1 = moderate, 2 = strict
    pub safesearch: Option<u8>,
    /// Language code (en, de, fr, ...)
    pub language: Option<String>,
}

impl SearchParams {
    /// Validate and apply per-category defaults
    pub fn into_query(
        self,
        category: Category,
        settings: &SearchSettings,
    ) -> Result<SearchQuery, ApiError> {
        let text = match self.q {
            Some(q) if !q.trim().is_empty() => q,
            _ => return Err(ApiError::Validation("Query parameter 'q' is required".into())),
        };

        let default_limit = match category {
            Category::Images => settings.default_images_limit,
            _ => settings.default_limit,
        };
        let limit = self.limit.unwrap_or(default_limit);
        if limit < 1 || limit > settings.max_results {
            return Err(ApiError::Validation(format!(
                "'limit' must be between 1 and {}",
                settings.max_results
            )));
        }

        let safesearch = self.safesearch.unwrap_or(settings.default_safesearch);
        if safesearch > 2 {
            return Err(ApiError::Validation(
                "'safesearch' must be 0 (off), 1 (moderate) or 2 (strict)".into(),
            ));
        }

        let language = self
            .language
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| settings.default_language.clone());

        Ok(SearchQuery::new(text, category)
            .with_limit(limit)
            .with_safesearch(safesearch)
            .with_language(language))
    }
}

async fn run_search(
    state: AppState,
    params: SearchParams,
    category: Category,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = params.into_query(category, &state.settings.search)?;
    let response = state.search.execute(&query).await?;
    Ok(Json(response))
}

/// General web search across all engines
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    run_search(state, params, Category::General).await
}

/// Search news articles
pub async fn news(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    run_search(state, params, Category::News).await
}

/// Search images
pub async fn images(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    run_search(state, params, Category::Images).await
}

/// Search videos
pub async fn videos(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    run_search(state, params, Category::Videos).await
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.health.check().await)
}

/// Per-instance statistics
pub async fn stats(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.metrics().snapshot())
}

/// Service metadata
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "name": "SearXNG Search API",
        "version": crate::VERSION,
        "cache": state.search.cache().kind(),
        "instances": state.search.dispatcher().pool().len(),
        "endpoints": [
            "/search - Web search",
            "/news - News search",
            "/images - Image search",
            "/videos - Video search",
            "/health - Health check",
            "/stats - Upstream instance statistics",
        ],
    }))
}

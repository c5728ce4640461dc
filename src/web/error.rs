//! HTTP error responses

use crate::search::SearchError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request parameters rejected before any upstream call
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Search(#[from] SearchError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Search(SearchError::AllInstancesFailed { .. }) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation(detail) => json!({ "detail": detail }),
            Self::Search(e) => json!({
                "detail": "Search service unavailable",
                "errors": e.failure_messages(),
            }),
        };
        (status, Json(body)).into_response()
    }
}

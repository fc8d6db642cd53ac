//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to API clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Search API key is not set on the server.")]
    SearchNotConfigured,
    #[error("An error occurred: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::SearchNotConfigured | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::BadRequest(_) => json!({ "error": self.to_string() }),
            ApiError::SearchNotConfigured => json!({
                "error": self.to_string(),
                "summary": "The server is missing its search configuration. Please contact the administrator.",
            }),
            ApiError::Internal(detail) => {
                tracing::error!("Error in search route: {}", detail);
                json!({
                    "error": self.to_string(),
                    "title": "Error",
                    "link": null,
                    "snippet": "",
                    "summary": format!("Error processing your request: {}", detail),
                    "sources": [],
                })
            }
        };

        (self.status(), Json(body)).into_response()
    }
}

//! HTTP request handlers

use super::error::ApiError;
use super::state::AppState;
use crate::pipeline::{Outcome, PriorTurn, Query, SearchHit};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Sources listed when no page could be fetched
const MAX_UNFETCHED_SOURCES: usize = 5;

/// Body of `POST /search`
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// The question; strings are used as-is, non-zero numbers and `true` are coerced
    #[serde(default)]
    pub query: Option<Value>,
    /// Whether this question follows up on `previous_context`
    #[serde(default)]
    pub followup: bool,
    /// The previous exchange, supplied by the front-end
    #[serde(default)]
    pub previous_context: Option<PreviousContext>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PreviousContext {
    pub query: String,
    pub summary: String,
}

impl SearchRequest {
    /// The question text, if one was supplied
    fn query_text(&self) -> Result<String, ApiError> {
        let text = match &self.query {
            Some(Value::String(s)) => s.clone(),
            // Zero and false count as "no query"
            Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
            Some(Value::Bool(true)) => "true".to_string(),
            Some(Value::Number(_)) | Some(Value::Bool(false)) => String::new(),
            Some(Value::Array(_)) | Some(Value::Object(_)) => {
                return Err(ApiError::BadRequest("Query must be a string.".to_string()))
            }
            Some(Value::Null) | None => String::new(),
        };

        if text.trim().is_empty() {
            return Err(ApiError::BadRequest("No query provided.".to_string()));
        }
        Ok(text)
    }

    fn prior_turn(&self) -> Option<PriorTurn> {
        if !self.followup {
            return None;
        }
        self.previous_context
            .as_ref()
            .filter(|ctx| !ctx.query.is_empty() || !ctx.summary.is_empty())
            .map(|ctx| PriorTurn::new(&ctx.query, &ctx.summary))
    }
}

/// A source as shown to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceResponse {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

impl From<SearchHit> for SourceResponse {
    fn from(hit: SearchHit) -> Self {
        Self {
            title: hit.title,
            link: hit.link,
            snippet: hit.snippet,
        }
    }
}

/// Body of a successful `POST /search`
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub title: String,
    pub link: Option<String>,
    pub snippet: String,
    /// Markdown answer, or an explanation of why there is none
    pub summary: String,
    pub sources: Vec<SourceResponse>,
    pub queries_used: Vec<Query>,
}

impl From<Outcome> for SearchResponse {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::NoResults { queries } => Self {
                title: "No Results Found".to_string(),
                link: None,
                snippet: "Could not find any results for your query.".to_string(),
                summary: "No search results were found. Please try rephrasing your question."
                    .to_string(),
                sources: Vec::new(),
                queries_used: queries,
            },
            Outcome::NothingFetched { hits, queries } => {
                let first = hits.first().cloned();
                Self {
                    title: first.as_ref().map(|h| h.title.clone()).unwrap_or_default(),
                    link: first.as_ref().map(|h| h.link.clone()),
                    snippet: first.map(|h| h.snippet).unwrap_or_default(),
                    summary: "Could not fetch content from the search results.".to_string(),
                    sources: hits
                        .into_iter()
                        .take(MAX_UNFETCHED_SOURCES)
                        .map(SourceResponse::from)
                        .collect(),
                    queries_used: queries,
                }
            }
            Outcome::Answered(result) => {
                let first = result.sources_used.first().cloned();
                Self {
                    title: first
                        .as_ref()
                        .map(|h| h.title.clone())
                        .unwrap_or_else(|| "Search Results".to_string()),
                    link: first.as_ref().map(|h| h.link.clone()),
                    snippet: first.map(|h| h.snippet).unwrap_or_default(),
                    summary: result.answer,
                    sources: result
                        .sources_used
                        .into_iter()
                        .map(SourceResponse::from)
                        .collect(),
                    queries_used: result.queries_used,
                }
            }
        }
    }
}

/// Liveness handler
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    format!("{} server is running.", state.instance_name())
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

/// Answer a question from the web
pub async fn search(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    if !state.search_configured() {
        return Err(ApiError::SearchNotConfigured);
    }

    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let query = request.query_text()?;
    let prior = request.prior_turn();
    let followup = request.followup;

    let span = info_span!("search", request_id = %Uuid::new_v4());
    let service = state.service.clone();

    let outcome = tokio::spawn(
        async move {
            info!("Answering '{}' (followup: {})", query, followup);
            service.answer(&query, followup, prior.as_ref()).await
        }
        .instrument(span),
    )
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(SearchResponse::from(outcome)))
}

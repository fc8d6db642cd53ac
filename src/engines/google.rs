//! Google Programmable Search (Custom Search JSON API) provider

use super::traits::SearchProvider;
use crate::config::SearchApiSettings;
use crate::network::{HttpClient, HttpResponse};
use crate::pipeline::SearchHit;
use anyhow::Result as AnyhowResult;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Largest page size the API accepts
const MAX_NUM: u32 = 10;

#[derive(Debug, Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Debug, Deserialize)]
struct CseItem {
    link: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Deserialize)]
struct CseError {
    error: CseErrorBody,
}

#[derive(Debug, Deserialize)]
struct CseErrorBody {
    #[serde(default)]
    message: String,
}

/// Keyed web search against a Programmable Search Engine corpus
pub struct GoogleCustomSearch {
    client: HttpClient,
    base_url: String,
    api_key: String,
    engine_id: String,
}

impl GoogleCustomSearch {
    pub fn new(client: HttpClient, settings: &SearchApiSettings) -> Self {
        Self {
            client,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            engine_id: settings.engine_id.clone(),
        }
    }

    /// Query parameters for one search call
    fn request_params(&self, query: &str, result_cap: u32) -> Vec<(&'static str, String)> {
        vec![
            ("key", self.api_key.clone()),
            ("cx", self.engine_id.clone()),
            ("q", query.to_string()),
            ("num", result_cap.clamp(1, MAX_NUM).to_string()),
        ]
    }

    /// Parse the HTTP response into hits
    fn parse_response(response: &HttpResponse) -> AnyhowResult<Vec<SearchHit>> {
        if !response.is_success() {
            let detail = response
                .json::<CseError>()
                .map(|e| e.error.message)
                .unwrap_or_default();
            return Err(anyhow::anyhow!("HTTP error {}: {}", response.status, detail));
        }

        let body: CseResponse = response.json()?;
        Ok(body
            .items
            .into_iter()
            .map(|item| SearchHit::new(item.link, item.title, item.snippet))
            .collect())
    }

    async fn try_search(&self, query: &str, result_cap: u32) -> AnyhowResult<Vec<SearchHit>> {
        let params = self.request_params(query, result_cap);
        let response = self.client.get_json(&self.base_url, &params).await?;
        let mut hits = Self::parse_response(&response)?;
        hits.truncate(result_cap as usize);
        Ok(hits)
    }
}

#[async_trait]
impl SearchProvider for GoogleCustomSearch {
    fn name(&self) -> &str {
        "google_cse"
    }

    async fn search(&self, query: &str, result_cap: u32) -> Vec<SearchHit> {
        info!("Searching {} for '{}'", self.name(), query);

        match self.try_search(query, result_cap).await {
            Ok(hits) => {
                for hit in &hits {
                    debug!("Found: {} ({})", hit.title, hit.link);
                }
                hits
            }
            Err(e) => {
                warn!("Search failed for '{}': {}", query, e);
                Vec::new()
            }
        }
    }
}

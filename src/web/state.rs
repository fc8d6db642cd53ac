//! Application state shared across handlers

use crate::config::Settings;
use crate::engines::GoogleCustomSearch;
use crate::llm::Gemini;
use crate::network::HttpClient;
use crate::pipeline::{AnswerService, PageFetcher};
use std::sync::Arc;
use std::time::Duration;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Question answering pipeline
    pub service: Arc<AnswerService>,
}

impl AppState {
    /// Create application state wired to the live providers
    pub fn new(settings: Settings, client: HttpClient) -> Self {
        let model = Arc::new(Gemini::new(client.clone(), &settings.llm));
        let search = Arc::new(GoogleCustomSearch::new(client.clone(), &settings.search_api));
        let fetcher = Arc::new(
            PageFetcher::new(client)
                .with_timeout(Duration::from_secs_f64(settings.outgoing.request_timeout)),
        );

        Self::with_service(settings, AnswerService::new(model, search, fetcher))
    }

    /// Create application state around an existing pipeline
    pub fn with_service(settings: Settings, service: AnswerService) -> Self {
        Self {
            settings: Arc::new(settings),
            service: Arc::new(service),
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }

    /// Whether search credentials are present
    pub fn search_configured(&self) -> bool {
        self.settings.search_api.is_configured()
    }
}

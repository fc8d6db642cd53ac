//! Page fetching

use crate::extract::TextExtractor;
use crate::network::HttpClient;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Per-page network timeout
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Capability that turns a link into extracted page text.
/// `None` means the page could not be retrieved; the failure is logged.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, link: &str) -> Option<String>;
}

/// Fetches pages over HTTP and extracts their visible text
pub struct PageFetcher {
    client: HttpClient,
    extractor: TextExtractor,
    timeout: Duration,
}

impl PageFetcher {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            extractor: TextExtractor::new(),
            timeout: FETCH_TIMEOUT,
        }
    }

    /// Override the per-page timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ContentFetcher for PageFetcher {
    async fn fetch(&self, link: &str) -> Option<String> {
        let url = match Url::parse(link) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            _ => {
                warn!("Skipping unfetchable link '{}'", link);
                return None;
            }
        };

        info!("Fetching content from {}", url);

        let response = match self.client.get_page(url.as_str(), self.timeout).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Error fetching {}: {}", url, e);
                return None;
            }
        };

        if !response.is_success() {
            warn!("Error fetching {}: HTTP {}", url, response.status);
            return None;
        }

        Some(self.extractor.extract(&response.text))
    }
}

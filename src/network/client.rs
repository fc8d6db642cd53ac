//! HTTP client shared by the search adapter, the page fetcher and the LLM client

use super::user_agent::{accept_html, accept_json, accept_language, generate_user_agent};
use crate::config::OutgoingSettings;
use anyhow::Result;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;

/// HTTP response with the body already read
#[derive(Debug)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
}

impl HttpResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client wrapper with browser-like defaults
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings.
    /// No client-wide timeout is set: page fetches carry their own, and
    /// language model calls wait for the provider.
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            user_agent: generate_user_agent(),
        })
    }

    /// Fetch an HTML page the way a browser would
    pub async fn get_page(&self, url: &str, timeout: Duration) -> Result<HttpResponse> {
        let req_builder = self
            .client
            .get(url)
            .timeout(timeout)
            .header("User-Agent", &self.user_agent)
            .header("Accept", accept_html())
            .header("Accept-Language", accept_language("en"))
            .header("DNT", "1")
            .header("Upgrade-Insecure-Requests", "1");

        Self::send(req_builder).await
    }

    /// GET a JSON API with query parameters
    pub async fn get_json(&self, url: &str, params: &[(&str, String)]) -> Result<HttpResponse> {
        let req_builder = self.api_request(self.client.get(url)).query(params);
        Self::send(req_builder).await
    }

    /// POST a JSON body to an API with query parameters
    pub async fn post_json(
        &self,
        url: &str,
        params: &[(&str, String)],
        json: &serde_json::Value,
    ) -> Result<HttpResponse> {
        let req_builder = self
            .api_request(self.client.post(url))
            .query(params)
            .json(json);
        Self::send(req_builder).await
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn api_request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("User-Agent", concat!("askweb/", env!("CARGO_PKG_VERSION")))
            .header("Accept", accept_json())
    }

    async fn send(req_builder: RequestBuilder) -> Result<HttpResponse> {
        let response = req_builder.send().await?;
        Self::parse_response(response).await
    }

    /// Read the response into an HttpResponse
    async fn parse_response(response: Response) -> Result<HttpResponse> {
        let status = response.status().as_u16();
        let text = response.text().await?;

        Ok(HttpResponse { status, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_get_page_sends_browser_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(header_exists("user-agent"))
            .and(header_exists("accept-language"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let response = client
            .get_page(&format!("{}/page", server.uri()), Duration::from_secs(5))
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(response.text, "<html></html>");
        assert!(client.user_agent().starts_with("Mozilla/5.0"));
    }

    #[tokio::test]
    async fn test_get_json_passes_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(query_param("q", "rust lang"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let response = client
            .get_json(
                &format!("{}/api", server.uri()),
                &[("q", "rust lang".to_string())],
            )
            .await
            .unwrap();

        let body: serde_json::Value = response.json().unwrap();
        assert_eq!(body["ok"], true);
    }
}

//! Gemini `generateContent` client

use super::traits::{GenerationConfig, LanguageModel, LlmError};
use crate::config::LlmSettings;
use crate::network::HttpClient;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// Gemini REST client
pub struct Gemini {
    client: HttpClient,
    base_url: String,
    model: String,
    api_key: String,
}

impl Gemini {
    pub fn new(client: HttpClient, settings: &LlmSettings) -> Self {
        Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn request_body(prompt: &str, config: &GenerationConfig) -> serde_json::Value {
        json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": config,
        })
    }

    /// Concatenated text of the first candidate
    fn parse_text(body: GenerateResponse) -> Result<String, LlmError> {
        if let Some(reason) = body.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::Blocked(reason));
        }

        let candidate = body
            .candidates
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.unwrap_or_default();
            let blocked = matches!(reason.as_str(), "SAFETY" | "RECITATION" | "BLOCKLIST");
            return Err(if blocked {
                LlmError::Blocked(reason)
            } else {
                LlmError::EmptyResponse
            });
        }

        Ok(text)
    }
}

#[async_trait]
impl LanguageModel for Gemini {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String, LlmError> {
        if self.api_key.is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        debug!("Calling {} with {} prompt chars", self.model, prompt.chars().count());

        let response = self
            .client
            .post_json(
                &self.endpoint(),
                &[("key", self.api_key.clone())],
                &Self::request_body(prompt, config),
            )
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        if !response.is_success() {
            let message = response
                .json::<ApiError>()
                .map(|e| e.error.message)
                .unwrap_or_else(|_| response.text.clone());
            return Err(LlmError::Status {
                status: response.status,
                message,
            });
        }

        let body: GenerateResponse = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Self::parse_text(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutgoingSettings;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gemini(server: &MockServer, key: &str) -> Gemini {
        let settings = LlmSettings {
            api_key: key.to_string(),
            model: "gemini-test".to_string(),
            base_url: server.uri(),
        };
        Gemini::new(HttpClient::new().unwrap(), &settings)
    }

    #[tokio::test]
    async fn test_generate_sends_config_and_joins_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-test:generateContent"))
            .and(query_param("key", "secret"))
            .and(body_partial_json(json!({
                "generationConfig": {
                    "temperature": 0.7,
                    "topK": 40,
                    "maxOutputTokens": 4096
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"parts": [{"text": "Hello "}, {"text": "world"}]},
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = gemini(&server, "secret")
            .generate("hi", &GenerationConfig::synthesis())
            .await
            .unwrap();
        assert_eq!(text, "Hello world");
    }

    #[tokio::test]
    async fn test_slow_reply_outlasts_page_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "candidates": [{"content": {"parts": [{"text": "late answer"}]}}]
                    }))
                    .set_delay(Duration::from_millis(600)),
            )
            .mount(&server)
            .await;

        let outgoing = OutgoingSettings {
            request_timeout: 0.2,
            ..OutgoingSettings::default()
        };
        let settings = LlmSettings {
            api_key: "k".to_string(),
            model: "gemini-test".to_string(),
            base_url: server.uri(),
        };
        let gemini = Gemini::new(HttpClient::with_settings(&outgoing).unwrap(), &settings);

        let text = gemini
            .generate("hi", &GenerationConfig::synthesis())
            .await
            .unwrap();
        assert_eq!(text, "late answer");
    }

    #[tokio::test]
    async fn test_http_error_carries_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": 400, "message": "API key not valid"}
            })))
            .mount(&server)
            .await;

        let err = gemini(&server, "bad")
            .generate("hi", &GenerationConfig::expansion())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Status { status: 400, .. }));
        assert!(err.to_string().contains("API key not valid"));
    }

    #[tokio::test]
    async fn test_blocked_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let err = gemini(&server, "k")
            .generate("hi", &GenerationConfig::expansion())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Blocked(_)));
    }

    #[tokio::test]
    async fn test_missing_key_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = gemini(&server, "")
            .generate("hi", &GenerationConfig::expansion())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[test]
    fn test_expansion_config_omits_sampling_caps() {
        let value = serde_json::to_value(GenerationConfig::expansion()).unwrap();
        assert_eq!(value["maxOutputTokens"], 300);
        assert!(value.get("topP").is_none());
    }
}

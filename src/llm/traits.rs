//! Language model traits and types

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Errors from a generative language call
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("language model API key is not configured")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("provider returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("response was blocked: {0}")]
    Blocked(String),
    #[error("response contained no text")]
    EmptyResponse,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Sampling parameters for one call
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    /// Tuning used for search query expansion
    pub const fn expansion() -> Self {
        Self {
            temperature: 0.8,
            top_p: None,
            top_k: None,
            max_output_tokens: 300,
        }
    }

    /// Tuning used for answer synthesis
    pub const fn synthesis() -> Self {
        Self {
            temperature: 0.7,
            top_p: Some(0.9),
            top_k: Some(40),
            max_output_tokens: 4096,
        }
    }
}

/// Generative language capability
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate text for a prompt
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String, LlmError>;
}

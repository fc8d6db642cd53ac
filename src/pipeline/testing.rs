//! In-process fakes for the pipeline capabilities

use super::fetcher::ContentFetcher;
use super::models::SearchHit;
use crate::engines::SearchProvider;
use crate::llm::{GenerationConfig, LanguageModel, LlmError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Hit for `https://<name>.example`
pub fn hit(name: &str, title: &str) -> SearchHit {
    SearchHit::new(
        format!("https://{}.example", name),
        title,
        format!("{} snippet", title),
    )
}

/// Language model with canned expansion and synthesis replies
pub struct FakeModel {
    expansion: Result<String, String>,
    synthesis: Result<String, String>,
    prompts: Mutex<Vec<String>>,
    configs: Mutex<Vec<GenerationConfig>>,
}

impl FakeModel {
    pub fn new() -> Self {
        Self {
            expansion: Err("no expansion reply configured".to_string()),
            synthesis: Ok("synthesized answer".to_string()),
            prompts: Mutex::new(Vec::new()),
            configs: Mutex::new(Vec::new()),
        }
    }

    pub fn expansion(mut self, reply: impl Into<String>) -> Self {
        self.expansion = Ok(reply.into());
        self
    }

    pub fn expansion_error(mut self, message: impl Into<String>) -> Self {
        self.expansion = Err(message.into());
        self
    }

    pub fn synthesis(mut self, reply: impl Into<String>) -> Self {
        self.synthesis = Ok(reply.into());
        self
    }

    pub fn synthesis_error(mut self, message: impl Into<String>) -> Self {
        self.synthesis = Err(message.into());
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn configs(&self) -> Vec<GenerationConfig> {
        self.configs.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.configs.lock().unwrap().push(*config);

        let reply = if *config == GenerationConfig::expansion() {
            &self.expansion
        } else {
            &self.synthesis
        };
        reply.clone().map_err(LlmError::Transport)
    }
}

/// Search provider answering from a fixed query → hits table
#[derive(Default)]
pub struct FakeSearch {
    responses: HashMap<String, Vec<SearchHit>>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl FakeSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, query: &str, hits: Vec<SearchHit>) -> Self {
        self.responses.insert(query.to_string(), hits);
        self
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    fn name(&self) -> &str {
        "fake"
    }

    async fn search(&self, query: &str, result_cap: u32) -> Vec<SearchHit> {
        self.calls.lock().unwrap().push((query.to_string(), result_cap));
        self.responses.get(query).cloned().unwrap_or_default()
    }
}

/// Fetcher returning `content of <link>` unless told otherwise
#[derive(Default)]
pub struct FakeFetcher {
    failing: HashSet<String>,
    contents: HashMap<String, String>,
    descending_delays: bool,
    started: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, link: &str) -> Self {
        self.failing.insert(link.to_string());
        self
    }

    pub fn content(mut self, link: &str, text: &str) -> Self {
        self.contents.insert(link.to_string(), text.to_string());
        self
    }

    /// Make each later call complete sooner than the one before it
    pub fn with_descending_delays(mut self) -> Self {
        self.descending_delays = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentFetcher for FakeFetcher {
    async fn fetch(&self, link: &str) -> Option<String> {
        self.calls.lock().unwrap().push(link.to_string());
        let nth = self.started.fetch_add(1, Ordering::SeqCst);

        if self.descending_delays {
            let delay = 10usize.saturating_sub(nth) as u64 * 10;
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if self.failing.contains(link) {
            return None;
        }
        Some(
            self.contents
                .get(link)
                .cloned()
                .unwrap_or_else(|| format!("content of {}", link)),
        )
    }
}

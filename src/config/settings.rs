//! Settings structures for AskWeb configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub search_api: SearchApiSettings,
    pub llm: LlmSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (ASKWEB_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    /// Merge overrides from an arbitrary variable source
    pub fn merge_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("ASKWEB_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = lookup("ASKWEB_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("ASKWEB_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = lookup("ASKWEB_SEARCH_API_KEY") {
            self.search_api.api_key = val;
        }
        if let Some(val) = lookup("ASKWEB_SEARCH_ENGINE_ID") {
            self.search_api.engine_id = val;
        }
        if let Some(val) = lookup("ASKWEB_LLM_API_KEY") {
            self.llm.api_key = val;
        }
        if let Some(val) = lookup("ASKWEB_LLM_MODEL") {
            self.llm.model = val;
        }

        // One Google key commonly serves both APIs
        if self.llm.api_key.is_empty() {
            self.llm.api_key = self.search_api.api_key.clone();
        }
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name reported by the liveness endpoints
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "AskWeb".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 5000,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Outgoing HTTP request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Per-page fetch timeout in seconds
    pub request_timeout: f64,
    /// Connection pool size per host
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            pool_maxsize: 10,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub all: Option<String>,
    pub http: Option<String>,
    pub https: Option<String>,
}

/// Keyed web search API settings (Google Programmable Search)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchApiSettings {
    /// API key
    pub api_key: String,
    /// Search engine (corpus) id, the `cx` parameter
    pub engine_id: String,
    /// API endpoint
    pub base_url: String,
}

impl Default for SearchApiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            engine_id: String::new(),
            base_url: "https://www.googleapis.com/customsearch/v1".to_string(),
        }
    }
}

impl SearchApiSettings {
    /// Whether both credentials are present
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.engine_id.trim().is_empty()
    }
}

/// Generative language model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// API key
    pub api_key: String,
    /// Model name
    pub model: String,
    /// API root
    pub base_url: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

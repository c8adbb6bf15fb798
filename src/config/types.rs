//! Configuration data model.
//!
//! This module holds struct definitions plus default values. Loading and
//! source resolution live in `config::mod` and its siblings.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::defaults::{
    DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_SECS, DEFAULT_CONFIRM_TIMEOUT_SECS,
    DEFAULT_CONTEXT_TIMEOUT_SECS, DEFAULT_DOCS_SITE, DEFAULT_FETCH_TIMEOUT_SECS,
    DEFAULT_KUBECTL_PROGRAM, DEFAULT_KUBECTL_TIMEOUT_SECS, DEFAULT_LOG_FILE, DEFAULT_LOG_LEVEL,
    DEFAULT_MAX_ITERATIONS, DEFAULT_MODEL_ID, DEFAULT_SEARCH_ENGINE_ID, DEFAULT_SITEMAP_URL,
    DEFAULT_TURN_TIMEOUT_SECS,
};

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub agent: AgentConfig,
    pub kubectl: KubectlConfig,
    pub docs: DocsConfig,
    pub confirm: ConfirmConfig,
    pub display: DisplayConfig,
    pub log: LogConfig,
}

/// Model API connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Inline key. Usually empty; prefer `api_key_env`.
    pub api_key: String,
    /// Environment variable holding the key.
    pub api_key_env: Option<String>,
    pub model: String,
    /// Timeout for one HTTP request to the model API.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.into(),
            api_key: String::new(),
            api_key_env: None,
            model: DEFAULT_MODEL_ID.into(),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}

/// Conversation behavior settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Extra operator instructions appended to the built-in system prompt.
    pub system_prompt: String,
    pub max_iterations: usize,
    pub turn_timeout_secs: u64,
    pub temperature: Option<f64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: String::new(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            turn_timeout_secs: DEFAULT_TURN_TIMEOUT_SECS,
            temperature: None,
        }
    }
}

impl AgentConfig {
    pub fn turn_timeout(&self) -> Duration {
        Duration::from_secs(self.turn_timeout_secs.max(1))
    }
}

/// Cluster CLI settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KubectlConfig {
    pub program: String,
    pub timeout_secs: u64,
    /// Timeout for each of the read-only context lookups.
    pub context_timeout_secs: u64,
}

impl Default for KubectlConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_KUBECTL_PROGRAM.into(),
            timeout_secs: DEFAULT_KUBECTL_TIMEOUT_SECS,
            context_timeout_secs: DEFAULT_CONTEXT_TIMEOUT_SECS,
        }
    }
}

/// Documentation lookup settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Custom Search API key. Empty disables the keyed search tier.
    pub search_api_key: String,
    pub search_engine_id: String,
    pub search_endpoint: String,
    pub site: String,
    pub sitemap_url: String,
    pub fetch_timeout_secs: u64,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            search_api_key: String::new(),
            search_engine_id: DEFAULT_SEARCH_ENGINE_ID.into(),
            search_endpoint: "https://www.googleapis.com/customsearch/v1".into(),
            site: DEFAULT_DOCS_SITE.into(),
            sitemap_url: DEFAULT_SITEMAP_URL.into(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

/// Confirmation gate policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConfirmConfig {
    /// Seconds before an unanswered confirmation is auto-denied. `0` waits forever.
    pub timeout_secs: u64,
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_CONFIRM_TIMEOUT_SECS,
        }
    }
}

impl ConfirmConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Display / rendering preferences.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Diagnostic log settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub file: PathBuf,
    /// Filter directive used when `KUBEMATE_LOG` is unset.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_LOG_FILE),
            level: DEFAULT_LOG_LEVEL.into(),
        }
    }
}

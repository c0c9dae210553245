//! Runtime configuration for the digest pipeline.
//!
//! [`DigestConfig`] can be loaded from a YAML file and is then overridden by
//! command-line flags (see [`crate::cli::Cli`]). Every value is injected into
//! the components at construction; nothing is cached process-wide.
//!
//! ```yaml
//! search_base_url: https://newsapi.org/v2
//! api_key: "..."
//! page_size: 5
//! max_pages: 5
//! workers: 10
//! summarizer:
//!   endpoint: http://localhost:11434/v1
//!   model: qwen2.5:7b
//! ```

use crate::error::NewsError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_SEARCH_BASE_URL: &str = "https://newsapi.org/v2";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Settings for the search, fetch and pagination stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    /// Base URL of the search API; `/everything` is appended.
    pub search_base_url: String,
    /// Search API key. Required.
    pub api_key: Option<String>,
    /// Results requested per page.
    pub page_size: u32,
    /// Pages tried per keyword before giving up.
    pub max_pages: u32,
    /// Width of the per-page fetch pool.
    pub workers: usize,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub search_timeout_secs: u64,
    /// Sent on probes and document fetches.
    pub user_agent: String,
    pub summarizer: SummarizerConfig,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            search_base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            api_key: None,
            page_size: 5,
            max_pages: 5,
            workers: 10,
            connect_timeout_secs: 10,
            read_timeout_secs: 10,
            search_timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            summarizer: SummarizerConfig::default(),
        }
    }
}

/// Settings for the OpenAI-compatible summarizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Base URL; `/chat/completions` is appended.
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434/v1".to_string(),
            model: "qwen2.5:7b".to_string(),
            api_key: None,
            timeout_secs: 120,
            max_retries: 3,
        }
    }
}

impl DigestConfig {
    /// Load a configuration file. Absent keys keep their defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, NewsError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| NewsError::config(format!("cannot read {}: {e}", path.display())))?;
        let config = Self::from_yaml_str(&raw)?;
        info!("Loaded configuration file");
        Ok(config)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, NewsError> {
        serde_yaml::from_str(raw).map_err(|e| NewsError::config(format!("invalid config: {e}")))
    }

    /// The search API key, or a configuration error if it is missing or blank.
    pub fn require_api_key(&self) -> Result<&str, NewsError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(NewsError::config(
                "news API key is missing (set NEWS_API_KEY or pass --api-key)",
            )),
        }
    }

    /// Reject values that would make the pipeline meaningless.
    pub fn validate(&self) -> Result<(), NewsError> {
        self.require_api_key()?;
        if self.page_size == 0 {
            return Err(NewsError::config("page_size must be at least 1"));
        }
        if self.max_pages == 0 {
            return Err(NewsError::config("max_pages must be at least 1"));
        }
        if self.workers == 0 {
            return Err(NewsError::config("workers must be at least 1"));
        }
        url::Url::parse(&self.search_base_url)
            .map_err(|e| NewsError::config(format!("invalid search_base_url: {e}")))?;
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }
}

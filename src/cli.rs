//! Command-line interface definitions for News Digest.
//!
//! Every option can also come from the YAML config file passed with
//! `--config`; flags and environment variables win over the file.

use crate::config::DigestConfig;
use crate::digest::{DEFAULT_LANGUAGE, DEFAULT_SORT_BY, DigestRequest};
use crate::error::NewsError;
use crate::utils::last_week;
use clap::Parser;

/// Command-line arguments for the News Digest application.
///
/// # Examples
///
/// ```sh
/// # Last seven days, English, by relevancy
/// news_digest rust "climate change"
///
/// # Explicit window and a JSON copy of the digest
/// news_digest --from 2025-05-01 --to 2025-05-06 --sort-by popularity -j ./json ai
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Keywords to search for; one article is picked per keyword
    #[arg(required = true)]
    pub keywords: Vec<String>,

    /// Oldest publication date (YYYY-MM-DD); defaults to seven days ago
    #[arg(long)]
    pub from: Option<String>,

    /// Newest publication date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub to: Option<String>,

    /// Language code of the articles
    #[arg(short, long, default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Sort mode: relevancy, popularity or publishedAt
    #[arg(short, long, default_value = DEFAULT_SORT_BY)]
    pub sort_by: String,

    /// News search API key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Number of article pages fetched in parallel
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Base URL of an OpenAI-compatible API used for summaries
    #[arg(long, env = "SUMMARIZER_ENDPOINT")]
    pub summarizer_endpoint: Option<String>,

    /// Model name passed to the summarizer
    #[arg(long, env = "SUMMARIZER_MODEL")]
    pub summarizer_model: Option<String>,

    /// Bearer token for the summarizer API
    #[arg(long, env = "SUMMARIZER_API_KEY", hide_env_values = true)]
    pub summarizer_api_key: Option<String>,

    /// Also write the digest as JSON under this directory
    #[arg(short, long)]
    pub json_output_dir: Option<String>,
}

impl Cli {
    /// Load the config file (if any) and apply command-line overrides.
    pub fn digest_config(&self) -> Result<DigestConfig, NewsError> {
        let mut config = match &self.config {
            Some(path) => DigestConfig::from_yaml_file(path)?,
            None => DigestConfig::default(),
        };

        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(endpoint) = &self.summarizer_endpoint {
            config.summarizer.endpoint = endpoint.clone();
        }
        if let Some(model) = &self.summarizer_model {
            config.summarizer.model = model.clone();
        }
        if let Some(key) = &self.summarizer_api_key {
            config.summarizer.api_key = Some(key.clone());
        }
        Ok(config)
    }

    /// The digest request described by the arguments.
    pub fn digest_request(&self) -> DigestRequest {
        let (week_ago, today) = last_week();
        DigestRequest::new(
            self.keywords.clone(),
            self.from.clone().unwrap_or(week_ago),
            self.to.clone().unwrap_or(today),
            self.language.clone(),
            self.sort_by.clone(),
        )
    }
}

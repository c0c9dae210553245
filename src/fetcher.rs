//! Reachability probe and document fetcher for candidate article URLs.
//!
//! Both operations share one [`reqwest::Client`] configured once with fixed
//! connect/read timeouts, a redirect policy and a browser-like `User-Agent`.
//! The client carries no per-call state, so a single [`ContentFetcher`] is
//! reused for every candidate of every page.

use crate::config::DigestConfig;
use crate::error::NewsError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{redirect, Client};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

/// Maximum number of redirects followed for one request.
const MAX_REDIRECTS: usize = 10;

/// Why a probe or fetch did not produce a document.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL {0:?}")]
    InvalidUrl(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("empty response body")]
    EmptyBody,

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// HTTP transport for article pages.
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    client: Client,
}

impl ContentFetcher {
    /// Build a fetcher from the pipeline configuration.
    pub fn new(config: &DigestConfig) -> Result<Self, NewsError> {
        Self::with_timeouts(
            &config.user_agent,
            config.connect_timeout(),
            config.read_timeout(),
        )
    }

    /// Build a fetcher with explicit timeouts.
    pub fn with_timeouts(
        user_agent: &str,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self, NewsError> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(user_agent)
            .map_err(|e| NewsError::config(format!("invalid user agent: {e}")))?;
        headers.insert(USER_AGENT, agent);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(connect_timeout)
            .read_timeout(read_timeout)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self { client })
    }

    /// Check that `url` answers a `HEAD` request with a success status.
    #[instrument(level = "debug", skip(self))]
    pub async fn probe(&self, url: &str) -> Result<(), FetchError> {
        let url = parse_url(url)?;
        let response = self.client.head(url).send().await?;
        let status = response.status();
        debug!(%status, "Probe answered");
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(())
    }

    /// Download the markup at `url`, following redirects.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch_document(&self, url: &str) -> Result<String, FetchError> {
        let url = parse_url(url)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        if body.is_empty() {
            return Err(FetchError::EmptyBody);
        }
        debug!(bytes = body.len(), "Fetched document");
        Ok(body)
    }
}

fn parse_url(raw: &str) -> Result<url::Url, FetchError> {
    match url::Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
        _ => Err(FetchError::InvalidUrl(raw.to_string())),
    }
}

//! Client for the news search API (`/v2/everything`).
//!
//! One call fetches one page of candidate metadata. Unlike document fetches,
//! failures here are not tolerated: a transport error or a non-2xx answer is
//! returned to the caller, which aborts the digest run.

use crate::config::DigestConfig;
use crate::error::NewsError;
use crate::models::{Candidate, PageRequest, SearchResponse};
use crate::utils::truncate_for_log;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, error, info, instrument};

/// Search API client holding its injected API key.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl SearchClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Fails fast with [`NewsError::Config`] when no API key is configured.
    pub fn new(config: &DigestConfig) -> Result<Self, NewsError> {
        let api_key = config.require_api_key()?.to_string();
        let client = Client::builder().timeout(config.search_timeout()).build()?;
        let endpoint = format!("{}/everything", config.search_base_url.trim_end_matches('/'));

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// Fetch one page of candidates, in the order the API returned them.
    ///
    /// # Errors
    ///
    /// - [`NewsError::Transport`] when the request fails or the body is not JSON
    /// - [`NewsError::Api`] when the API answers with a non-2xx status
    #[instrument(level = "info", skip_all, fields(keyword = %request.keyword, page = request.page))]
    pub async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Candidate>, NewsError> {
        let t0 = Instant::now();
        let page = request.page.to_string();
        let page_size = request.page_size.to_string();
        let query: [(&str, &str); 8] = [
            ("q", request.keyword.as_str()),
            ("from", request.from_date.as_str()),
            ("to", request.to_date.as_str()),
            ("language", request.language.as_str()),
            ("sortBy", request.sort_by.as_str()),
            ("page", page.as_str()),
            ("pageSize", page_size.as_str()),
            ("apiKey", self.api_key.as_str()),
        ];

        let response = self
            .client
            .get(&self.endpoint)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .query(&query)
            .send()
            .await
            .inspect_err(|e| error!(error = %e, "Search request failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "No response body".to_string());
            error!(
                status = status.as_u16(),
                body = %truncate_for_log(&body, 300),
                "Search API returned an error"
            );
            return Err(NewsError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = response.json().await?;
        info!(
            candidates = parsed.articles.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched search page"
        );
        debug!(urls = ?parsed.articles.iter().map(|c| &c.url).collect::<Vec<_>>(), "Candidate URLs");
        Ok(parsed.articles)
    }
}

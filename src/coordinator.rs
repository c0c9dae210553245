//! Parallel probe → fetch → extract over one page of candidates.
//!
//! Every candidate is processed by an independent task. At most `workers`
//! tasks are in flight at once; results come back in submission order no
//! matter which task finishes first. The stream is fully drained before
//! [`FetchCoordinator::fetch_articles`] returns, so no task outlives the call.
//!
//! A failing candidate is logged and skipped without touching its siblings;
//! the coordinator itself never fails.

use crate::extract::extract_main_content;
use crate::fetcher::ContentFetcher;
use crate::models::{Article, Candidate, FetchOutcome, SkipReason};
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_WORKERS: usize = 10;

/// Bounded fan-out/fan-in over the candidates of one search page.
#[derive(Debug, Clone)]
pub struct FetchCoordinator {
    fetcher: ContentFetcher,
    workers: usize,
}

impl FetchCoordinator {
    /// Create a coordinator over a shared fetcher.
    ///
    /// # Arguments
    ///
    /// * `fetcher` - HTTP client used for the probe and the document download
    /// * `workers` - Maximum number of candidates in flight; `0` is treated as `1`
    pub fn new(fetcher: ContentFetcher, workers: usize) -> Self {
        Self {
            fetcher,
            workers: workers.max(1),
        }
    }

    /// Effective pool width.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Turn candidates into articles, dropping the ones that fail.
    ///
    /// The returned articles keep the relative order of their candidates. An
    /// empty result is a normal outcome.
    #[instrument(level = "info", skip_all, fields(candidates = candidates.len(), workers = self.workers))]
    pub async fn fetch_articles(&self, candidates: Vec<Candidate>) -> Vec<Article> {
        let t0 = Instant::now();
        let total = candidates.len();

        let outcomes: Vec<FetchOutcome> = stream::iter(candidates.into_iter().enumerate())
            .map(|(index, candidate)| self.process_candidate(index, candidate))
            .buffered(self.workers)
            .collect()
            .await;

        let articles: Vec<Article> = outcomes
            .into_iter()
            .filter_map(FetchOutcome::into_article)
            .collect();

        info!(
            total,
            produced = articles.len(),
            skipped = total - articles.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Completed candidate batch"
        );
        articles
    }

    /// Run one candidate through probe, fetch and extraction.
    pub async fn process_candidate(&self, index: usize, candidate: Candidate) -> FetchOutcome {
        let url = candidate.url.clone();

        if let Err(e) = self.fetcher.probe(&url).await {
            return skip(index, &url, SkipReason::Unreachable, &e);
        }

        let html = match self.fetcher.fetch_document(&url).await {
            Ok(html) => html,
            Err(e) => return skip(index, &url, SkipReason::FetchFailed, &e),
        };

        let content = extract_main_content(&html);
        if content.trim().is_empty() {
            return skip(index, &url, SkipReason::EmptyContent, &"no visible text");
        }

        debug!(index, %url, chars = content.len(), "Extracted article content");
        FetchOutcome::Produced(Article::from_candidate(candidate, content))
    }
}

fn skip(index: usize, url: &str, reason: SkipReason, cause: &dyn std::fmt::Display) -> FetchOutcome {
    warn!(index, %url, %reason, cause = %cause, "Skipping candidate");
    FetchOutcome::Skipped(reason)
}

//! Keyword digest: one summarized article per keyword.
//!
//! Keywords are processed one after another. A keyword whose pages are all
//! empty is skipped; any search transport or API error aborts the whole run
//! before summarization starts, so callers see either a complete digest or a
//! single failure, never a mix of both.

use crate::config::DigestConfig;
use crate::coordinator::FetchCoordinator;
use crate::error::NewsError;
use crate::fetcher::ContentFetcher;
use crate::models::Article;
use crate::pagination::{KeywordQuery, PaginationRetryLoop};
use crate::search::SearchClient;
use crate::summarizer::Summarize;
use crate::utils::last_week;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// Description used when an article could not be summarized.
pub const SUMMARY_PLACEHOLDER: &str = "Error in summarizing article";

/// Message handed to the failure view when searching failed.
pub const FETCH_FAILURE_MESSAGE: &str = "Error in fetching articles";

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_SORT_BY: &str = "relevancy";

/// Input of one digest run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestRequest {
    pub keywords: Vec<String>,
    pub from_date: String,
    pub to_date: String,
    pub language: String,
    pub sort_by: String,
}

impl DigestRequest {
    pub fn new(
        keywords: Vec<String>,
        from_date: impl Into<String>,
        to_date: impl Into<String>,
        language: impl Into<String>,
        sort_by: impl Into<String>,
    ) -> Self {
        Self {
            keywords,
            from_date: from_date.into(),
            to_date: to_date.into(),
            language: language.into(),
            sort_by: sort_by.into(),
        }
    }

    /// The last seven days up to today, English, sorted by relevancy.
    pub fn for_keywords(keywords: Vec<String>) -> Self {
        let (from, to) = last_week();
        Self::new(keywords, from, to, DEFAULT_LANGUAGE, DEFAULT_SORT_BY)
    }

    fn query(&self, keyword: &str) -> KeywordQuery {
        KeywordQuery {
            keyword: keyword.to_string(),
            from_date: self.from_date.clone(),
            to_date: self.to_date.clone(),
            language: self.language.clone(),
            sort_by: self.sort_by.clone(),
        }
    }
}

/// Receives the result of [`DigestPipeline::execute`].
///
/// Exactly one of the two methods is called per run.
pub trait DigestPresenter {
    fn prepare_success_view(&mut self, articles: Vec<Article>);
    fn prepare_fail_view(&mut self, message: &str);
}

/// Search, fetch and summarize one article per keyword.
#[derive(Debug)]
pub struct DigestPipeline<S> {
    pages: PaginationRetryLoop,
    summarizer: S,
}

impl<S> DigestPipeline<S>
where
    S: Summarize,
{
    /// Create a pipeline from already built stages.
    ///
    /// # Arguments
    ///
    /// * `pages` - Per-keyword pagination loop over search and fetch
    /// * `summarizer` - Produces the description of each kept article
    pub fn new(pages: PaginationRetryLoop, summarizer: S) -> Self {
        Self { pages, summarizer }
    }

    /// Wire up the search, fetch and pagination stages from configuration.
    ///
    /// # Errors
    ///
    /// Fails fast with [`NewsError::Config`] on invalid configuration,
    /// including a missing API key.
    pub fn from_config(config: &DigestConfig, summarizer: S) -> Result<Self, NewsError> {
        config.validate()?;
        let search = SearchClient::new(config)?;
        let coordinator = FetchCoordinator::new(ContentFetcher::new(config)?, config.workers);
        let pages =
            PaginationRetryLoop::with_limits(search, coordinator, config.page_size, config.max_pages);
        Ok(Self::new(pages, summarizer))
    }

    /// Build the digest.
    ///
    /// # Errors
    ///
    /// The first search transport or API error is returned as-is and no
    /// article of the run is kept.
    #[instrument(level = "info", skip_all, fields(keywords = request.keywords.len()))]
    pub async fn run(&self, request: &DigestRequest) -> Result<Vec<Article>, NewsError> {
        let t0 = Instant::now();
        let mut articles = self.collect_articles(request).await?;
        self.summarize_all(&mut articles).await;

        info!(
            articles = articles.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Digest complete"
        );
        Ok(articles)
    }

    /// Run the digest and report the outcome to `presenter`.
    pub async fn execute<P>(&self, request: &DigestRequest, presenter: &mut P)
    where
        P: DigestPresenter + ?Sized,
    {
        match self.run(request).await {
            Ok(articles) => presenter.prepare_success_view(articles),
            Err(e) => {
                error!(error = %e, "Digest failed");
                presenter.prepare_fail_view(FETCH_FAILURE_MESSAGE);
            }
        }
    }

    async fn collect_articles(&self, request: &DigestRequest) -> Result<Vec<Article>, NewsError> {
        let mut articles = Vec::with_capacity(request.keywords.len());

        for keyword in &request.keywords {
            match self.pages.fetch_first_article(&request.query(keyword)).await {
                Ok(article) => articles.push(article),
                Err(e) if !e.is_hard() => {
                    warn!(%keyword, error = %e, "No article for keyword; skipping");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(articles)
    }

    async fn summarize_all(&self, articles: &mut [Article]) {
        for article in articles.iter_mut() {
            article.description = match self.summarizer.summarize(&article.content).await {
                Ok(summary) => summary,
                Err(e) => {
                    warn!(url = %article.url, error = %e, "Summarization failed; using placeholder");
                    SUMMARY_PLACEHOLDER.to_string()
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SummarizeError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Fails for any text containing "unlucky".
    #[derive(Debug)]
    struct Picky;

    /// Counts every summarization request.
    #[derive(Debug, Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl Summarize for Counting {
        async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(text.to_string())
        }
    }

    impl Summarize for Picky {
        async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
            if text.contains("unlucky") {
                Err(SummarizeError::EmptyResponse)
            } else {
                Ok(format!("Summary: {text}"))
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        success: Option<Vec<Article>>,
        failure: Option<String>,
    }

    impl DigestPresenter for Recorder {
        fn prepare_success_view(&mut self, articles: Vec<Article>) {
            self.success = Some(articles);
        }

        fn prepare_fail_view(&mut self, message: &str) {
            self.failure = Some(message.to_string());
        }
    }

    fn pipeline(server: &MockServer) -> DigestPipeline<Picky> {
        let config = DigestConfig {
            search_base_url: server.uri(),
            api_key: Some("key".to_string()),
            ..DigestConfig::default()
        };
        DigestPipeline::from_config(&config, Picky).unwrap()
    }

    fn request(keywords: &[&str]) -> DigestRequest {
        DigestRequest::new(
            keywords.iter().map(|k| k.to_string()).collect(),
            "2024-10-01",
            "2024-10-08",
            "en",
            "relevancy",
        )
    }

    /// Every page for `keyword` lists the same single document.
    async fn mount_keyword(server: &MockServer, keyword: &str, doc: Option<&str>, calls: u64) {
        let articles = match doc {
            Some(slug) => json!([{
                "title": format!("{keyword} title"),
                "url": format!("{}/docs/{slug}", server.uri()),
                "description": "original teaser"
            }]),
            None => json!([]),
        };
        Mock::given(method("GET"))
            .and(path("/everything"))
            .and(query_param("q", keyword))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"articles": articles})))
            .expect(calls)
            .mount(server)
            .await;
    }

    async fn mount_document(server: &MockServer, slug: &str, html: &str) {
        Mock::given(method("HEAD"))
            .and(path(format!("/docs/{slug}")))
            .respond_with(ResponseTemplate::new(200))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/docs/{slug}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(server)
            .await;
    }

    #[test]
    fn test_for_keywords_defaults() {
        let request = DigestRequest::for_keywords(vec!["ai".to_string()]);
        assert_eq!(request.language, "en");
        assert_eq!(request.sort_by, "relevancy");
        assert_eq!(request.from_date.len(), 10);
        assert!(request.from_date < request.to_date);
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        let err = DigestPipeline::from_config(&DigestConfig::default(), Picky).unwrap_err();
        assert!(matches!(err, NewsError::Config(_)));
    }

    #[tokio::test]
    async fn test_not_found_keyword_is_skipped() {
        let server = MockServer::start().await;
        mount_document(&server, "b", "<article>Story about B</article>").await;
        mount_keyword(&server, "alpha", None, 5).await;
        mount_keyword(&server, "beta", Some("b"), 1).await;

        let mut presenter = Recorder::default();
        pipeline(&server)
            .execute(&request(&["alpha", "beta"]), &mut presenter)
            .await;

        assert!(presenter.failure.is_none());
        let articles = presenter.success.expect("success view");
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "beta title");
        assert_eq!(articles[0].description, "Summary: Story about B");
    }

    #[tokio::test]
    async fn test_api_error_fails_whole_run() {
        let server = MockServer::start().await;
        mount_document(&server, "b", "<article>Story about B</article>").await;
        Mock::given(method("GET"))
            .and(path("/everything"))
            .and(query_param("q", "alpha"))
            .respond_with(ResponseTemplate::new(401).set_body_string("apiKeyInvalid"))
            .expect(1)
            .mount(&server)
            .await;
        mount_keyword(&server, "beta", Some("b"), 0).await;

        let mut presenter = Recorder::default();
        pipeline(&server)
            .execute(&request(&["alpha", "beta"]), &mut presenter)
            .await;

        assert!(presenter.success.is_none());
        assert_eq!(presenter.failure.as_deref(), Some(FETCH_FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn test_transport_error_fails_whole_run_without_summaries() {
        let config = DigestConfig {
            search_base_url: "http://127.0.0.1:9".to_string(),
            api_key: Some("key".to_string()),
            ..DigestConfig::default()
        };
        let pipeline = DigestPipeline::from_config(&config, Counting::default()).unwrap();

        let err = pipeline.run(&request(&["alpha", "beta"])).await.unwrap_err();
        assert!(matches!(err, NewsError::Transport(_)));

        let mut presenter = Recorder::default();
        pipeline
            .execute(&request(&["alpha", "beta"]), &mut presenter)
            .await;

        assert!(presenter.success.is_none());
        assert_eq!(presenter.failure.as_deref(), Some(FETCH_FAILURE_MESSAGE));
        assert_eq!(pipeline.summarizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_api_error_after_success_discards_partial_results() {
        let server = MockServer::start().await;
        mount_document(&server, "a", "<article>Story about A</article>").await;
        mount_keyword(&server, "alpha", Some("a"), 1).await;
        Mock::given(method("GET"))
            .and(path("/everything"))
            .and(query_param("q", "beta"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = pipeline(&server)
            .run(&request(&["alpha", "beta"]))
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_summary_failures_are_isolated() {
        let server = MockServer::start().await;
        mount_document(&server, "a", "<article>An unlucky story</article>").await;
        mount_document(&server, "b", "<article>A fine story</article>").await;
        mount_keyword(&server, "alpha", Some("a"), 1).await;
        mount_keyword(&server, "beta", Some("b"), 1).await;

        let articles = pipeline(&server)
            .run(&request(&["alpha", "beta"]))
            .await
            .unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].description, SUMMARY_PLACEHOLDER);
        assert_eq!(articles[0].content, "An unlucky story");
        assert_eq!(articles[1].description, "Summary: A fine story");
    }

    #[tokio::test]
    async fn test_no_keywords_is_empty_success() {
        let server = MockServer::start().await;
        let mut presenter = Recorder::default();
        pipeline(&server).execute(&request(&[]), &mut presenter).await;

        assert_eq!(presenter.success, Some(vec![]));
        assert!(presenter.failure.is_none());
    }
}

//! Page-by-page search for the first extractable article of a keyword.

use crate::coordinator::FetchCoordinator;
use crate::error::NewsError;
use crate::models::{Article, PageRequest};
use crate::search::SearchClient;
use tracing::{info, instrument};

pub const DEFAULT_PAGE_SIZE: u32 = 5;
pub const DEFAULT_MAX_PAGES: u32 = 5;

/// Query parameters shared by every page of one keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordQuery {
    pub keyword: String,
    pub from_date: String,
    pub to_date: String,
    pub language: String,
    pub sort_by: String,
}

impl KeywordQuery {
    fn page(&self, page: u32, page_size: u32) -> PageRequest {
        PageRequest {
            keyword: self.keyword.clone(),
            from_date: self.from_date.clone(),
            to_date: self.to_date.clone(),
            language: self.language.clone(),
            sort_by: self.sort_by.clone(),
            page,
            page_size,
        }
    }
}

/// Walks result pages until one of them yields an article.
#[derive(Debug, Clone)]
pub struct PaginationRetryLoop {
    search: SearchClient,
    coordinator: FetchCoordinator,
    page_size: u32,
    max_pages: u32,
}

impl PaginationRetryLoop {
    /// Create a loop with the default limits of 5 results per page and 5 pages.
    pub fn new(search: SearchClient, coordinator: FetchCoordinator) -> Self {
        Self::with_limits(search, coordinator, DEFAULT_PAGE_SIZE, DEFAULT_MAX_PAGES)
    }

    /// Create a loop with explicit limits.
    ///
    /// # Arguments
    ///
    /// * `search` - Client issuing one search request per page
    /// * `coordinator` - Turns the candidates of a page into articles
    /// * `page_size` - Results requested per page
    /// * `max_pages` - Pages tried before giving up with [`NewsError::NotFound`]
    pub fn with_limits(
        search: SearchClient,
        coordinator: FetchCoordinator,
        page_size: u32,
        max_pages: u32,
    ) -> Self {
        Self {
            search,
            coordinator,
            page_size,
            max_pages,
        }
    }

    /// Return the first article of the first page that produces any.
    ///
    /// Stops at the first productive page, so at most `max_pages` searches are
    /// issued.
    ///
    /// # Errors
    ///
    /// - [`NewsError::NotFound`] when every page up to the limit is empty
    /// - search errors are returned as soon as they happen
    #[instrument(level = "info", skip_all, fields(keyword = %query.keyword))]
    pub async fn fetch_first_article(&self, query: &KeywordQuery) -> Result<Article, NewsError> {
        for page in 1..=self.max_pages {
            let candidates = self.search.fetch_page(&query.page(page, self.page_size)).await?;
            let mut articles = self.coordinator.fetch_articles(candidates).await;

            if !articles.is_empty() {
                info!(page, url = %articles[0].url, "Found article");
                return Ok(articles.swap_remove(0));
            }
            info!(page, max_pages = self.max_pages, "Page produced no article");
        }

        Err(NewsError::NotFound {
            keyword: query.keyword.clone(),
            pages: self.max_pages,
        })
    }
}

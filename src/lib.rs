//! # News Digest
//!
//! Builds a short digest of current news: for each keyword, search a news API,
//! fetch and extract the first readable article, then summarize it with an
//! OpenAI-compatible LLM.
//!
//! ## Architecture
//!
//! The pipeline runs leaf-first:
//! 1. **Search**: [`search::SearchClient`] fetches one page of candidates
//! 2. **Fetch**: [`coordinator::FetchCoordinator`] probes, downloads and extracts
//!    every candidate of the page in parallel (10 at a time)
//! 3. **Paginate**: [`pagination::PaginationRetryLoop`] moves to the next page
//!    until one yields an article
//! 4. **Digest**: [`digest::DigestPipeline`] repeats this per keyword and
//!    summarizes the results
//! 5. **Output**: [`outputs`] renders Markdown and writes JSON

pub mod cli;
pub mod config;
pub mod coordinator;
pub mod digest;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod models;
pub mod outputs;
pub mod pagination;
pub mod search;
pub mod summarizer;
pub mod utils;

pub use digest::{DigestPipeline, DigestPresenter, DigestRequest};
pub use error::{NewsError, SummarizeError};
pub use models::{Article, Candidate};

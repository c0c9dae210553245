//! Error types for the digest pipeline.
//!
//! Two families of failure exist:
//!
//! - [`NewsError`]: failures of the search side of the pipeline. Transport and
//!   API errors are *hard* and abort a digest run; [`NewsError::NotFound`] is
//!   *soft* and only drops the keyword that produced it.
//! - [`SummarizeError`]: failures of the external summarizer. These are always
//!   caught per article and never leave the pipeline.
//!
//! Per-candidate probe, fetch and extraction problems are not errors at all;
//! they are reported as [`crate::models::SkipReason`]s.

use thiserror::Error;

/// Errors raised while searching for articles.
#[derive(Debug, Error)]
pub enum NewsError {
    /// The search API could not be reached or its body could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The search API answered with a non-2xx status.
    #[error("search API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// No page up to the limit produced an extractable article.
    #[error("no articles found for keyword {keyword:?} after {pages} page(s)")]
    NotFound { keyword: String, pages: u32 },

    /// Invalid or missing configuration, detected before any network call.
    #[error("configuration error: {0}")]
    Config(String),
}

impl NewsError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error aborts the whole digest run.
    ///
    /// Only [`NewsError::NotFound`] is tolerated by the keyword loop.
    pub fn is_hard(&self) -> bool {
        !matches!(self, Self::NotFound { .. })
    }
}

/// Errors raised by a [`crate::summarizer::Summarize`] implementation.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("summarizer transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("summarizer returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("summarizer returned an empty summary")]
    EmptyResponse,
}

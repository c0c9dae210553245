//! Data models for search candidates and digest articles.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`PageRequest`]: Query parameters for one page of search results
//! - [`Candidate`]: Unvalidated article metadata from a search result
//! - [`Article`]: An article whose body text was fetched and extracted
//! - [`FetchOutcome`] / [`SkipReason`]: Per-candidate result of the fetch stage
//!
//! The search API speaks camelCase JSON, hence the `rename` attributes on
//! `publishedAt`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Immutable query parameters for one page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Search keyword (sent as `q`).
    pub keyword: String,
    /// Oldest publication date, `YYYY-MM-DD`.
    pub from_date: String,
    /// Newest publication date, `YYYY-MM-DD`.
    pub to_date: String,
    /// Two-letter language code, e.g. `"en"`.
    pub language: String,
    /// Sort mode: `"relevancy"`, `"popularity"` or `"publishedAt"`.
    pub sort_by: String,
    /// 1-based page index.
    pub page: u32,
    /// Number of results per page.
    pub page_size: u32,
}

/// Article metadata parsed from one search-result entry.
///
/// Missing, `null` or structured fields become empty strings; numbers and
/// booleans are kept as text. Candidates never carry a
/// category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Candidate {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub author: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, rename = "publishedAt", deserialize_with = "lenient_string")]
    pub published_at: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

/// Strings pass through, numbers and booleans are stringified, anything else
/// becomes empty. One odd entry must not fail the whole page.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// Body of a search API response. Only the `articles` array is read.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub articles: Vec<Candidate>,
}

/// A news article with confirmed, non-empty body text.
///
/// Every field is fixed at construction except `description`, which starts as
/// the search metadata's description and is later replaced by the summary
/// (or by a placeholder if summarization failed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub author: String,
    /// Always empty; the search API has no categories.
    pub category: String,
    /// Readable body text extracted from the article page.
    pub content: String,
    pub url: String,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    pub description: String,
}

impl Article {
    /// Build an article from its search metadata and extracted body text.
    pub fn from_candidate(candidate: Candidate, content: String) -> Self {
        Self {
            title: candidate.title,
            author: candidate.author,
            category: String::new(),
            content,
            url: candidate.url,
            published_at: candidate.published_at,
            description: candidate.description,
        }
    }

    /// The host the article was fetched from, without a leading `www.`.
    pub fn source_host(&self) -> Option<String> {
        let parsed = url::Url::parse(&self.url).ok()?;
        let host = parsed.host_str()?;
        Some(host.trim_start_matches("www.").to_string())
    }
}

/// Why a candidate did not become an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The probe failed or returned a non-success status.
    Unreachable,
    /// The document fetch failed, returned a non-success status or no body.
    FetchFailed,
    /// Extraction produced only whitespace.
    EmptyContent,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Unreachable => "unreachable",
            Self::FetchFailed => "fetch failed",
            Self::EmptyContent => "empty content",
        };
        f.write_str(reason)
    }
}

/// Per-candidate result of the fetch stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Produced(Article),
    Skipped(SkipReason),
}

impl FetchOutcome {
    pub fn into_article(self) -> Option<Article> {
        match self {
            Self::Produced(article) => Some(article),
            Self::Skipped(_) => None,
        }
    }
}

//! Presentation of a finished digest.
//!
//! # Submodules
//!
//! - [`json`]: Writes a [`Digest`] to a dated JSON file
//! - [`markdown`]: Renders a [`Digest`] as Markdown for reading
//!
//! [`DigestViewModel`] is the presenter handed to
//! [`crate::digest::DigestPipeline::execute`]; it ends up holding either the
//! finished digest or a failure message.

pub mod json;
pub mod markdown;

use crate::digest::DigestPresenter;
use crate::models::Article;
use chrono::Local;
use serde::{Deserialize, Serialize};

/// A finished digest, stamped with the local date and time it was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digest {
    /// The date of publication in `YYYY-MM-DD` format.
    pub local_date: String,
    /// Local time of publication, `HH:MM:SS`.
    pub local_time: String,
    pub keywords: Vec<String>,
    pub articles: Vec<Article>,
}

impl Digest {
    pub fn new(keywords: Vec<String>, articles: Vec<Article>) -> Self {
        let now = Local::now();
        Self {
            local_date: now.format("%Y-%m-%d").to_string(),
            local_time: now.format("%H:%M:%S").to_string(),
            keywords,
            articles,
        }
    }
}

/// What the user gets to see: a digest or one error message, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigestView {
    Success(Digest),
    Failure(String),
}

/// Presenter that keeps the last view for the caller to render.
#[derive(Debug, Default)]
pub struct DigestViewModel {
    keywords: Vec<String>,
    view: Option<DigestView>,
}

impl DigestViewModel {
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            keywords,
            view: None,
        }
    }

    pub fn view(&self) -> Option<&DigestView> {
        self.view.as_ref()
    }

    pub fn into_view(self) -> Option<DigestView> {
        self.view
    }
}

impl DigestPresenter for DigestViewModel {
    fn prepare_success_view(&mut self, articles: Vec<Article>) {
        let digest = Digest::new(self.keywords.clone(), articles);
        self.view = Some(DigestView::Success(digest));
    }

    fn prepare_fail_view(&mut self, message: &str) {
        self.view = Some(DigestView::Failure(message.to_string()));
    }
}

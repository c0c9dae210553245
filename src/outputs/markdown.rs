//! Markdown rendering of a digest.

use super::Digest;
use crate::models::Article;
use std::fmt::Write;

/// Render the whole digest as one Markdown document.
pub fn digest_to_markdown(digest: &Digest) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "# News Digest for {}\n", digest.local_date);
    let _ = writeln!(md, "_Generated at {}._\n", digest.local_time);

    if digest.articles.is_empty() {
        md.push_str("No articles found.\n");
        return md;
    }

    for article in &digest.articles {
        md.push_str(&article_to_markdown(article));
        md.push('\n');
    }
    md
}

fn article_to_markdown(article: &Article) -> String {
    let mut md = String::new();
    let title = if article.title.is_empty() {
        "Untitled"
    } else {
        article.title.as_str()
    };
    let _ = writeln!(md, "## {title}\n");

    let mut byline = Vec::new();
    if !article.author.is_empty() {
        byline.push(format!("By {}", article.author));
    }
    if !article.published_at.is_empty() {
        byline.push(article.published_at.clone());
    }
    if let Some(host) = article.source_host() {
        byline.push(format!("`{host}`"));
    }
    if !byline.is_empty() {
        let _ = writeln!(md, "{}\n", byline.join(" · "));
    }

    let _ = writeln!(md, "{}\n", article.description);
    let _ = writeln!(md, "[Read the full article]({})", article.url);
    md
}

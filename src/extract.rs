//! Readable-text extraction from arbitrary article markup.
//!
//! Article pages come from thousands of publishers, so extraction is a fixed
//! fallback chain over generic containers rather than per-site selectors.
//! After ignoring `script`, `style` and `noscript` subtrees, the first rule
//! that matches at least one element wins:
//!
//! | Order | Rule |
//! |-------|------|
//! | 1 | `<article>` elements |
//! | 2 | `<main>` elements |
//! | 3 | elements whose `class` or `id` contains `content` or `article` (case-sensitive) |
//! | 4 | the whole `<body>` |
//!
//! The text of every matched element is concatenated. If the winning rule
//! yields nothing but whitespace, the body text is used instead. The order of
//! these rules is part of the observable behaviour and must not change.

use crate::utils::normalize_whitespace;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static ARTICLE: Lazy<Selector> = Lazy::new(|| selector("article"));
static MAIN: Lazy<Selector> = Lazy::new(|| selector("main"));
static CONTENT_LIKE: Lazy<Selector> = Lazy::new(|| {
    selector("[class*=content], [class*=article], [id*=content], [id*=article]")
});
static BODY: Lazy<Selector> = Lazy::new(|| selector("body"));

const NON_RENDERED: &[&str] = &["script", "style", "noscript"];
const INLINE: &[&str] = &[
    "a", "abbr", "b", "bdi", "cite", "code", "em", "font", "i", "kbd", "mark", "q", "s", "small",
    "span", "strong", "sub", "sup", "time", "u",
];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Extract readable body text from an HTML document.
///
/// Returns an empty string when the document has no visible text; callers
/// treat that as "no content".
pub fn extract_main_content(html: &str) -> String {
    let document = Html::parse_document(html);
    extract_from_document(&document)
}

/// Same as [`extract_main_content`] for an already parsed document.
pub fn extract_from_document(document: &Html) -> String {
    let chain: [&Selector; 3] = [&*ARTICLE, &*MAIN, &*CONTENT_LIKE];

    for rule in chain {
        let matched: Vec<ElementRef<'_>> = document
            .select(rule)
            .filter(|el| !inside_non_rendered(*el))
            .collect();
        if matched.is_empty() {
            continue;
        }
        let text = matched.iter().map(|el| visible_text(*el)).join(" ");
        let text = normalize_whitespace(&text);
        if !text.is_empty() {
            return text;
        }
        break;
    }

    body_text(document)
}

fn body_text(document: &Html) -> String {
    document
        .select(&BODY)
        .next()
        .map(|body| normalize_whitespace(&visible_text(body)))
        .unwrap_or_default()
}

/// Text of `element`, skipping non-rendered subtrees.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    out
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            let name = child.value().name();
            if NON_RENDERED.contains(&name) {
                continue;
            }
            // block boundaries must not glue words together
            let block = !INLINE.contains(&name);
            if block {
                out.push(' ');
            }
            collect_text(child, out);
            if block {
                out.push(' ');
            }
        }
    }
}

/// True when `element` is itself a non-rendered tag or sits inside one.
fn inside_non_rendered(element: ElementRef<'_>) -> bool {
    NON_RENDERED.contains(&element.value().name())
        || element.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| NON_RENDERED.contains(&el.name()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_wins_over_everything() {
        let html = r#"<html><body>
            <nav>Menu</nav>
            <main>Main text</main>
            <div class="content">Div content</div>
            <article><h1>Headline</h1><p>Story body.</p></article>
        </body></html>"#;
        assert_eq!(extract_main_content(html), "Headline Story body.");
    }

    #[test]
    fn test_multiple_articles_are_concatenated() {
        let html = "<body><article>First</article><p>x</p><article>Second</article></body>";
        assert_eq!(extract_main_content(html), "First Second");
    }

    #[test]
    fn test_main_when_no_article() {
        let html = r#"<body>
            <header>Site header</header>
            <main><p>Only main</p></main>
            <div id="content">Not chosen</div>
        </body>"#;
        assert_eq!(extract_main_content(html), "Only main");
    }

    #[test]
    fn test_class_or_id_substring_match() {
        let html = r#"<body>
            <div class="sidebar">Side</div>
            <div class="post-content-wrapper">Wrapped story</div>
            <section id="main-article">Second block</section>
        </body>"#;
        assert_eq!(extract_main_content(html), "Wrapped story Second block");
    }

    #[test]
    fn test_substring_match_is_case_sensitive() {
        let html = r#"<body><div class="Content">Upper</div><p>Body text</p></body>"#;
        assert_eq!(extract_main_content(html), "Upper Body text");
    }

    #[test]
    fn test_body_fallback() {
        let html = "<html><body><h1>Plain</h1><p>page</p></body></html>";
        assert_eq!(extract_main_content(html), "Plain page");
    }

    #[test]
    fn test_scripts_and_styles_are_ignored() {
        let html = r#"<body>
            <article>
                <script>var tracking = 1;</script>
                <style>.x { color: red }</style>
                <p>Visible</p>
                <noscript>Enable JS</noscript>
            </article>
        </body>"#;
        assert_eq!(extract_main_content(html), "Visible");
    }

    #[test]
    fn test_json_ld_script_with_article_id_is_not_content() {
        let html = r#"<body><script id="article-data" type="application/ld+json">{"headline":"x"}</script><p>Real body</p></body>"#;
        assert_eq!(extract_main_content(html), "Real body");
    }

    #[test]
    fn test_style_with_content_class_is_not_content() {
        let html = r#"<body><style class="content-css">.a{color:red}</style><p>Real body</p></body>"#;
        assert_eq!(extract_main_content(html), "Real body");
    }

    #[test]
    fn test_noscript_with_content_id_skipped_but_real_match_kept() {
        let html = r#"<body><noscript id="content-fallback">Enable JS</noscript><div class="article-body">Story</div></body>"#;
        assert_eq!(extract_main_content(html), "Story");
    }

    #[test]
    fn test_empty_article_falls_back_to_body() {
        let html = "<body><article>   </article><p>Outside</p></body>";
        assert_eq!(extract_main_content(html), "Outside");
    }

    #[test]
    fn test_script_only_page_is_empty() {
        let html = "<html><head><title>T</title></head><body><script>x()</script></body></html>";
        assert_eq!(extract_main_content(html), "");
    }

    #[test]
    fn test_inline_elements_do_not_split_words() {
        let html = "<body><main><p>Ru<b>st</b>aceans <a href='/x'>unite</a></p></main></body>";
        assert_eq!(extract_main_content(html), "Rustaceans unite");
    }

    #[test]
    fn test_malformed_markup_degrades_gracefully() {
        let html = "<div><article><p>Unclosed <b>bold text";
        assert_eq!(extract_main_content(html), "Unclosed bold text");
        assert_eq!(extract_main_content(""), "");
    }
}

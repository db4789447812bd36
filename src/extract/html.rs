//! DOM-walking fallback extraction strategy.
//!
//! Used when a page carries no usable JSON-LD block. Tries a list of known
//! article containers in order and takes the first that yields paragraphs.

use scraper::{ElementRef, Html, Selector};

use super::clean::{dedup_tags, is_boilerplate};
use super::Extracted;

/// Content selectors tried in order after the primary article container;
/// the flag marks selectors that already target paragraph elements.
const FALLBACK_SELECTORS: [(&str, bool); 5] = [
    ("article.article-content", false),
    ("div.article-body", false),
    ("div.content-body", false),
    ("div[class*='article'] p", true),
    ("main p", true),
];

/// Directly-selected paragraphs at or under this length are navigation noise
const MIN_DIRECT_PARAGRAPH_LEN: usize = 50;

/// Tag link text at or above this length is not a real tag
const MAX_TAG_LEN: usize = 50;

/// Extract article fields by walking the rendered DOM
pub(super) fn extract_fallback(page: &str) -> Extracted {
    let document = Html::parse_document(page);

    Extracted {
        content: body_paragraphs(&document).join("\n\n"),
        image_url: og_image(&document),
        category: String::new(),
        tags: dedup_tags(tag_links(&document)),
    }
}

fn body_paragraphs(document: &Html) -> Vec<String> {
    let mut paragraphs = container_paragraphs(document, "div.postBody");

    if paragraphs.is_empty() {
        for (selector, targets_paragraphs) in FALLBACK_SELECTORS {
            paragraphs = if targets_paragraphs {
                direct_paragraphs(document, selector)
            } else {
                container_paragraphs(document, selector)
            };
            if !paragraphs.is_empty() {
                break;
            }
        }
    }

    paragraphs
}

/// Collect the text of every `<p>` inside the matched containers
fn container_paragraphs(document: &Html, container: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    if let (Ok(container), Ok(paragraph)) = (Selector::parse(container), Selector::parse("p")) {
        for block in document.select(&container) {
            for element in block.select(&paragraph) {
                if let Some(text) = paragraph_text(element, 0) {
                    paragraphs.push(text);
                }
            }
        }
    }
    paragraphs
}

/// Collect the text of directly matched paragraph elements, dropping short
/// matches that are usually menus or captions
fn direct_paragraphs(document: &Html, selector: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    if let Ok(selector) = Selector::parse(selector) {
        for element in document.select(&selector) {
            if let Some(text) = paragraph_text(element, MIN_DIRECT_PARAGRAPH_LEN) {
                paragraphs.push(text);
            }
        }
    }
    paragraphs
}

fn paragraph_text(element: ElementRef<'_>, min_len: usize) -> Option<String> {
    let text = element.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() || text.len() <= min_len || is_boilerplate(text) {
        return None;
    }
    Some(text.to_string())
}

/// First non-empty `og:image` meta tag on the page
fn og_image(document: &Html) -> String {
    if let Ok(selector) = Selector::parse("meta[property='og:image']") {
        for meta in document.select(&selector) {
            if let Some(url) = meta.value().attr("content") {
                if !url.is_empty() {
                    return url.to_string();
                }
            }
        }
    }
    String::new()
}

/// Tag and category links anywhere on the page
fn tag_links(document: &Html) -> Vec<String> {
    let mut tags = Vec::new();
    if let Ok(selector) = Selector::parse("a[href*='/tag/'], a[href*='/category/'], span.tag") {
        for link in document.select(&selector) {
            let tag = link.text().collect::<String>();
            let tag = tag.trim();
            if !tag.is_empty() && tag.len() < MAX_TAG_LEN {
                tags.push(tag.to_string());
            }
        }
    }
    tags
}

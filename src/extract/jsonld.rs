//! Structured-data extraction strategy.
//!
//! News sites embed `schema.org` NewsArticle metadata as JSON-LD script
//! blocks. When present this is far more reliable than walking the rendered
//! DOM, so it is tried first.

use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

use super::clean::{clean_article_body, dedup_tags, is_generic_tag};
use super::Extracted;

/// Extract article fields from the first JSON-LD block carrying a body
///
/// Blocks without an `articleBody` are skipped; malformed JSON is ignored.
/// Returns a default (empty) result when no usable block exists.
pub(super) fn extract_structured(page: &str) -> Extracted {
    let document = Html::parse_document(page);
    let mut result = Extracted::default();

    if let Ok(selector) = Selector::parse("script[type='application/ld+json']") {
        for script in document.select(&selector) {
            let raw = script.text().collect::<String>();
            let data: Value = match serde_json::from_str(&raw) {
                Ok(data) => data,
                Err(e) => {
                    debug!("Skipping malformed JSON-LD block: {}", e);
                    continue;
                }
            };

            let body = data
                .get("articleBody")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if body.is_empty() {
                continue;
            }

            result.content = clean_article_body(body);

            if let Some(section) = data.get("articleSection").and_then(Value::as_str) {
                result.category = section.to_string();
            }
            if let Some(image) = image_url(&data) {
                result.image_url = image;
            }
            result.tags = dedup_tags(keywords(&data));

            break;
        }
    }

    result
}

/// The `image` property is either a plain URL string or an array of URLs
fn image_url(data: &Value) -> Option<String> {
    match data.get("image") {
        Some(Value::String(url)) => Some(url.clone()),
        Some(Value::Array(items)) => items
            .iter()
            .find_map(Value::as_str)
            .map(ToString::to_string),
        _ => None,
    }
}

/// The `keywords` property is either an array of strings or one
/// comma-separated string; generic taxonomy terms are dropped either way.
fn keywords(data: &Value) -> Vec<String> {
    let raw: Vec<String> = match data.get("keywords") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(ToString::to_string)
            .collect(),
        Some(Value::String(joined)) => joined.split(',').map(ToString::to_string).collect(),
        _ => Vec::new(),
    };

    raw.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty() && !is_generic_tag(tag))
        .collect()
}

//! Article content extraction from fetched pages.
//!
//! Two strategies run in priority order: structured data (JSON-LD article
//! blocks embedded in the page) and a heuristic HTML fallback over known
//! content-container selectors. Extraction is a pure function of the page
//! text; malformed input degrades to empty results rather than erroring, so
//! articles whose pages defeat both strategies stay queued for a later
//! re-extraction pass.

mod clean;
mod html;
mod jsonld;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use clean::{clean_article_body, is_boilerplate, is_generic_tag};

use crate::db::{Article, NewArticle};

/// Result of extracting article data from a fetched page
///
/// All fields may be empty; `content == ""` means both strategies failed
/// to find an article body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Extracted {
    /// Normalized article body, paragraphs joined by blank lines
    pub content: String,
    /// Lead image URL
    pub image_url: String,
    /// Category from the page's own taxonomy
    pub category: String,
    /// Per-article tags, deduplicated, first occurrence order
    pub tags: Vec<String>,
}

/// Extract article data from raw page HTML
///
/// Tries the structured-data strategy first; when no JSON-LD block carries an
/// article body, falls back to heuristic HTML scraping.
pub fn extract(page: &str) -> Extracted {
    let structured = jsonld::extract_structured(page);
    if !structured.content.is_empty() {
        return structured;
    }

    html::extract_fallback(page)
}

impl Extracted {
    /// Apply the merge policy to a stored article (re-extraction path)
    ///
    /// Content overwrites only when extraction found some; image and category
    /// fill in only when the article's field is empty; tags replace only when
    /// the article has none.
    pub fn merge_into(&self, article: &mut Article) {
        self.merge_fields(
            &mut article.content,
            &mut article.image_url,
            &mut article.category,
            &mut article.tags,
        );
    }

    /// Apply the merge policy to an article being assembled at ingestion time
    pub fn merge_into_new(&self, article: &mut NewArticle) {
        self.merge_fields(
            &mut article.content,
            &mut article.image_url,
            &mut article.category,
            &mut article.tags,
        );
    }

    fn merge_fields(
        &self,
        content: &mut String,
        image_url: &mut String,
        category: &mut String,
        tags: &mut Vec<String>,
    ) {
        if !self.content.is_empty() {
            *content = self.content.trim().to_string();
        }
        if image_url.is_empty() && !self.image_url.is_empty() {
            image_url.clone_from(&self.image_url);
        }
        if category.is_empty() && !self.category.is_empty() {
            category.clone_from(&self.category);
        }
        if tags.is_empty() && !self.tags.is_empty() {
            tags.clone_from(&self.tags);
        }
    }
}

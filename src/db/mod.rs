//! Database layer for newsflow
//!
//! Handles SQLite persistence for ingested articles and their translation
//! and publication state.
//!
//! ## Submodules
//!
//! Methods on [`Database`] are organized by domain:
//! - [`migrations`] — Database lifecycle, schema migrations
//! - [`articles`] — Article CRUD and pipeline selection queries

use crate::types::ArticleId;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, sqlite::SqlitePool};
use utoipa::ToSchema;

mod articles;
mod migrations;

/// New article to be inserted into the database
///
/// Translation and publication columns start at their defaults (empty
/// translations, `translated_at` NULL, unpublished); only ingestion-time
/// data is supplied here.
#[derive(Debug, Clone)]
pub struct NewArticle {
    /// Canonical URL of the article on the source site
    pub source_url: String,
    /// Name of the source this article was ingested from
    pub source_site: String,
    /// Original title
    pub title: String,
    /// Feed summary/description (may contain HTML)
    pub description: String,
    /// Extracted article body ("" when extraction failed)
    pub content: String,
    /// Author name ("" when the feed carries none)
    pub author: String,
    /// Primary category ("" when the feed carries none)
    pub category: String,
    /// Tags from the feed item
    pub tags: Vec<String>,
    /// Lead image URL ("" when none was found)
    pub image_url: String,
    /// Publication timestamp from the feed
    pub published_at: DateTime<Utc>,
    /// URL slug derived from the title
    pub slug: String,
}

/// Article record from database (raw from SQLite)
///
/// Timestamps are stored as unix seconds and tags as a JSON array string;
/// [`Article`] is the converted public model.
#[derive(Debug, Clone, FromRow)]
pub struct ArticleRow {
    /// Unique database ID
    pub id: i64,
    /// Canonical URL of the article on the source site
    pub source_url: String,
    /// Name of the source this article was ingested from
    pub source_site: String,
    /// Original title
    pub title: String,
    /// Translated title ("" until translated)
    pub title_translated: String,
    /// Feed summary/description
    pub description: String,
    /// Extracted article body ("" when extraction failed)
    pub content: String,
    /// Translated article body ("" until translated)
    pub content_translated: String,
    /// Author name
    pub author: String,
    /// Primary category
    pub category: String,
    /// Tags as a JSON array string
    pub tags: String,
    /// Lead image URL
    pub image_url: String,
    /// Publication timestamp from the feed (unix seconds)
    pub published_at: i64,
    /// Unix timestamp when the article was ingested
    pub fetched_at: i64,
    /// Unix timestamp when translation completed (NULL until then)
    pub translated_at: Option<i64>,
    /// Whether the article has been published to the site
    pub published: bool,
    /// URL slug derived from the title
    pub slug: String,
}

/// An ingested article with its translation and publication state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Article {
    /// Unique article identifier
    pub id: ArticleId,
    /// Canonical URL of the article on the source site
    pub source_url: String,
    /// Name of the source this article was ingested from
    pub source_site: String,
    /// Original title
    pub title: String,
    /// Translated title ("" until translated)
    pub title_translated: String,
    /// Feed summary/description (may contain HTML)
    pub description: String,
    /// Extracted article body ("" when extraction failed)
    pub content: String,
    /// Translated article body ("" until translated)
    pub content_translated: String,
    /// Author name ("" when the feed carries none)
    pub author: String,
    /// Primary category ("" when the feed carries none)
    pub category: String,
    /// Tags from the feed item
    pub tags: Vec<String>,
    /// Lead image URL ("" when none was found)
    pub image_url: String,
    /// Publication timestamp from the feed
    pub published_at: DateTime<Utc>,
    /// When the article was ingested
    pub fetched_at: DateTime<Utc>,
    /// When translation completed (None until both title and body are stored)
    pub translated_at: Option<DateTime<Utc>>,
    /// Whether the article has been published to the site
    pub published: bool,
    /// URL slug derived from the title
    pub slug: String,
}

impl Article {
    /// Both translations are stored and the completion timestamp is set
    pub fn is_translated(&self) -> bool {
        self.translated_at.is_some() && !self.content_translated.is_empty()
    }

    /// Has extracted content but no translation yet
    ///
    /// Articles with empty content never qualify; they wait for a
    /// re-extraction pass instead.
    pub fn needs_translation(&self) -> bool {
        !self.content.is_empty() && self.content_translated.is_empty()
    }

    /// Translated but not yet published
    pub fn needs_publishing(&self) -> bool {
        self.is_translated() && !self.published
    }
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Article {
            id: ArticleId::new(row.id),
            source_url: row.source_url,
            source_site: row.source_site,
            title: row.title,
            title_translated: row.title_translated,
            description: row.description,
            content: row.content,
            content_translated: row.content_translated,
            author: row.author,
            category: row.category,
            tags: serde_json::from_str(&row.tags).unwrap_or_default(),
            image_url: row.image_url,
            published_at: Utc
                .timestamp_opt(row.published_at, 0)
                .single()
                .unwrap_or_else(Utc::now),
            fetched_at: Utc
                .timestamp_opt(row.fetched_at, 0)
                .single()
                .unwrap_or_else(Utc::now),
            translated_at: row
                .translated_at
                .and_then(|t| Utc.timestamp_opt(t, 0).single()),
            published: row.published,
            slug: row.slug,
        }
    }
}

/// Database handle for newsflow
pub struct Database {
    pool: SqlitePool,
}

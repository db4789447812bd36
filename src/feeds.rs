//! Feed ingestion: fetching RSS/Atom feeds and mapping entries to feed items.
//!
//! Supports both RSS 2.0 and Atom feed formats. Content is fetched over HTTP,
//! parsed as RSS first with an Atom fallback, and each entry is mapped to a
//! [`FeedItem`] carrying the metadata the pipeline stores at ingestion time.

use crate::error::{Error, FeedError, Result};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Enclosure MIME types accepted as a lead image
const IMAGE_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// One entry from an RSS or Atom feed, normalized for ingestion
#[derive(Clone, Debug, PartialEq)]
pub struct FeedItem {
    /// Canonical article URL
    pub source_url: String,

    /// Entry title
    pub title: String,

    /// Entry summary/description ("" when the feed carries none)
    pub description: String,

    /// Author name ("" when the feed carries none)
    pub author: String,

    /// First category ("" when the feed carries none)
    pub category: String,

    /// All categories
    pub tags: Vec<String>,

    /// Lead image URL from an image enclosure ("" when none)
    pub image_url: String,

    /// Publication timestamp; falls back to the updated timestamp, then to now
    pub published_at: DateTime<Utc>,
}

/// Fetches and parses article feeds
pub struct FeedClient {
    http_client: reqwest::Client,
}

impl FeedClient {
    /// Create a new feed client
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("newsflow feed reader")
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }

    /// Fetch a feed and return its entries
    ///
    /// This method:
    /// 1. Fetches the feed content via HTTP
    /// 2. Attempts to parse as RSS, falls back to Atom if that fails
    /// 3. Maps entries to [`FeedItem`]s, skipping entries without a link
    ///
    /// # Errors
    /// Returns error if the HTTP request fails, the server responds with a
    /// non-success status, or the content parses as neither RSS nor Atom.
    pub async fn fetch_feed(&self, url: &str) -> Result<Vec<FeedItem>> {
        debug!(url = %url, "Fetching feed");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| FeedError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        // Check HTTP status before trying to parse the response body
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let content = response.text().await.map_err(|e| FeedError::Fetch {
            url: url.to_string(),
            reason: format!("Failed to read feed content: {}", e),
        })?;

        // Try parsing as RSS first, then Atom
        match Self::parse_as_rss(&content) {
            Ok(items) => {
                debug!(url = %url, count = items.len(), "Parsed feed as RSS");
                Ok(items)
            }
            Err(rss_err) => match Self::parse_as_atom(&content) {
                Ok(items) => {
                    debug!(url = %url, count = items.len(), "Parsed feed as Atom");
                    Ok(items)
                }
                Err(atom_err) => Err(FeedError::Parse {
                    url: url.to_string(),
                    reason: format!(
                        "not RSS ({}) and not Atom ({})",
                        rss_err, atom_err
                    ),
                }
                .into()),
            },
        }
    }

    /// Parse feed content as RSS 2.0
    fn parse_as_rss(content: &str) -> std::result::Result<Vec<FeedItem>, rss::Error> {
        let channel = content.parse::<rss::Channel>()?;

        let items = channel
            .items()
            .iter()
            .filter_map(|item| {
                // Entries without a link can't be deduplicated or scraped
                let source_url = match item.link() {
                    Some(link) if !link.is_empty() => link.to_string(),
                    _ => {
                        debug!(
                            title = item.title().unwrap_or(""),
                            "Skipping feed entry without link"
                        );
                        return None;
                    }
                };

                let published_at = item
                    .pub_date()
                    .and_then(|date_str| {
                        DateTime::parse_from_rfc2822(date_str)
                            .ok()
                            .map(|dt| dt.with_timezone(&Utc))
                    })
                    .unwrap_or_else(Utc::now);

                let tags: Vec<String> = item
                    .categories()
                    .iter()
                    .map(|c| c.name().to_string())
                    .collect();
                let category = tags.first().cloned().unwrap_or_default();

                // Lead image from an image-typed enclosure
                let image_url = item
                    .enclosure()
                    .filter(|enc| IMAGE_MIME_TYPES.contains(&enc.mime_type()))
                    .map(|enc| enc.url().to_string())
                    .unwrap_or_default();

                Some(FeedItem {
                    source_url,
                    title: item.title().unwrap_or("").to_string(),
                    description: item.description().unwrap_or("").to_string(),
                    author: item.author().unwrap_or("").to_string(),
                    category,
                    tags,
                    image_url,
                    published_at,
                })
            })
            .collect();

        Ok(items)
    }

    /// Parse feed content as Atom
    fn parse_as_atom(content: &str) -> std::result::Result<Vec<FeedItem>, atom_syndication::Error> {
        let feed = atom_syndication::Feed::read_from(content.as_bytes())?;

        let items = feed
            .entries()
            .iter()
            .filter_map(|entry| {
                // Prefer the alternate link, fall back to the first link
                let source_url = entry
                    .links()
                    .iter()
                    .find(|link| link.rel() == "alternate")
                    .or_else(|| entry.links().first())
                    .map(|link| link.href().to_string())?;

                // Publication date (prefer published, fallback to updated)
                let published_at = entry
                    .published()
                    .unwrap_or_else(|| entry.updated())
                    .with_timezone(&Utc);

                let tags: Vec<String> = entry
                    .categories()
                    .iter()
                    .map(|c| c.term().to_string())
                    .collect();
                let category = tags.first().cloned().unwrap_or_default();

                let author = entry
                    .authors()
                    .first()
                    .map(|a| a.name().to_string())
                    .unwrap_or_default();

                let description = entry
                    .summary()
                    .map(|s| s.as_str().to_string())
                    .or_else(|| {
                        entry
                            .content()
                            .and_then(|c| c.value().map(|v| v.to_string()))
                    })
                    .unwrap_or_default();

                // Lead image from an image-typed enclosure link
                let image_url = entry
                    .links()
                    .iter()
                    .find(|link| {
                        link.rel() == "enclosure"
                            && link
                                .mime_type()
                                .is_some_and(|t| IMAGE_MIME_TYPES.contains(&t))
                    })
                    .map(|link| link.href().to_string())
                    .unwrap_or_default();

                Some(FeedItem {
                    source_url,
                    title: entry.title().as_str().to_string(),
                    description,
                    author,
                    category,
                    tags,
                    image_url,
                    published_at,
                })
            })
            .collect();

        Ok(items)
    }
}

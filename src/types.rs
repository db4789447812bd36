//! Core types for newsflow

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unique identifier for an article
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct ArticleId(pub i64);

impl ArticleId {
    /// Create a new ArticleId
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ArticleId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ArticleId> for i64 {
    fn from(id: ArticleId) -> Self {
        id.0
    }
}

impl PartialEq<i64> for ArticleId {
    fn eq(&self, other: &i64) -> bool {
        self.0 == *other
    }
}

impl PartialEq<ArticleId> for i64 {
    fn eq(&self, other: &ArticleId) -> bool {
        *self == other.0
    }
}

impl std::fmt::Display for ArticleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ArticleId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

// Implement sqlx Type, Encode, and Decode for database operations
impl sqlx::Type<sqlx::Sqlite> for ArticleId {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <i64 as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for ArticleId {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync>> {
        sqlx::Encode::<sqlx::Sqlite>::encode_by_ref(&self.0, buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for ArticleId {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let id = <i64 as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(Self(id))
    }
}

/// Summary of one ingestion pass over the configured feed sources
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngestReport {
    /// Articles newly inserted during this pass
    pub ingested: usize,
    /// Items skipped because their source URL was already stored
    pub skipped: usize,
    /// Per-item and per-source failures (feed unreachable, insert failed)
    pub errors: usize,
}

/// Summary of one translation pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TranslateReport {
    /// Articles fully translated (title and body) and persisted
    pub translated: usize,
    /// Articles selected as needing translation at the start of the pass
    pub selected: usize,
    /// Articles whose translation failed (no partial state persisted)
    pub errors: usize,
}

/// Summary of one publication pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PublishReport {
    /// Articles published and marked as such (all-or-nothing per batch)
    pub published: usize,
    /// Articles selected as needing publication at the start of the pass
    pub selected: usize,
    /// Batch failures; equals `selected` when the commit was rejected
    pub errors: usize,
}

/// Summary of one re-extraction pass over empty-content articles
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RescrapeReport {
    /// Articles whose content was recovered and persisted
    pub updated: usize,
    /// Empty-content articles selected at the start of the pass
    pub selected: usize,
    /// Articles whose re-extraction still produced no content, or failed
    pub errors: usize,
}

/// Combined report of one full pipeline cycle (ingest, translate, publish)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RunReport {
    /// The ingestion pass summary
    pub ingest: IngestReport,
    /// The translation pass summary
    pub translate: TranslateReport,
    /// The publication pass summary
    pub publish: PublishReport,
}

/// Aggregate article counts from the store
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StoreStats {
    /// Total number of stored articles
    pub total: i64,
    /// Articles with a non-empty translated body
    pub translated: i64,
    /// Articles marked published
    pub published: i64,
}

impl StoreStats {
    /// Articles not yet translated (includes empty-content ones)
    pub fn pending(&self) -> i64 {
        self.total - self.translated
    }

    /// Translated articles awaiting publication
    pub fn unpublished(&self) -> i64 {
        self.translated - self.published
    }
}

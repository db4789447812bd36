//! Error types for newsflow
//!
//! This module provides comprehensive error handling for the library, including:
//! - Domain-specific error types (Database, Feed, Translate, Publish)
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes
//! - Context information (source URL, publish step, backend name, etc.)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for newsflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for newsflow
///
/// This is the primary error type used throughout the library. Each variant includes
/// contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "site.github_repo")
        key: Option<String>,
    },

    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// SQLx database error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Feed fetching or parsing error
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),

    /// Translation backend error
    #[error("translation error: {0}")]
    Translate(#[from] TranslateError),

    /// Publication error
    #[error("publish error: {0}")]
    Publish(#[from] PublishError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Article not found
    #[error("article not found: {0}")]
    NotFound(String),

    /// Duplicate article (source URL already stored)
    #[error("duplicate article: {0}")]
    Duplicate(String),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to connect to database
    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to run migrations
    #[error("failed to run migrations: {0}")]
    MigrationFailed(String),

    /// Query failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Record not found
    #[error("record not found: {0}")]
    NotFound(String),

    /// Constraint violation (e.g., duplicate source URL)
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Feed fetching and parsing errors
#[derive(Debug, Error)]
pub enum FeedError {
    /// Could not reach the feed endpoint
    #[error("failed to fetch feed {url}: {reason}")]
    Fetch {
        /// The feed URL that could not be fetched
        url: String,
        /// The transport-level reason
        reason: String,
    },

    /// Feed endpoint returned a non-success status
    #[error("feed {url} returned HTTP {status}")]
    Status {
        /// The feed URL that returned the error status
        url: String,
        /// The HTTP status code returned
        status: u16,
    },

    /// Response body parsed as neither RSS nor Atom
    #[error("failed to parse feed {url}: {reason}")]
    Parse {
        /// The feed URL whose body could not be parsed
        url: String,
        /// Why parsing failed (RSS error, Atom fallback error)
        reason: String,
    },
}

/// Translation backend errors
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Backend request failed or returned an error payload
    #[error("{provider} translation failed: {reason}")]
    Backend {
        /// The backend that failed (e.g., "ollama", "deepl")
        provider: String,
        /// The failure reason
        reason: String,
    },

    /// The API key was rejected by the backend
    #[error("{provider} rejected the API key")]
    InvalidApiKey {
        /// The backend that rejected the key
        provider: String,
    },

    /// The backend's usage quota is exhausted
    #[error("{provider} translation quota exceeded")]
    QuotaExceeded {
        /// The backend whose quota is exhausted
        provider: String,
    },

    /// Backend unreachable (connection check or request transport failure)
    #[error("{provider} is unavailable: {reason}")]
    Unavailable {
        /// The backend that is unreachable
        provider: String,
        /// The transport-level reason
        reason: String,
    },

    /// Backend answered with an empty translation
    #[error("{provider} returned an empty translation")]
    EmptyResult {
        /// The backend that returned nothing
        provider: String,
    },
}

/// Publication errors
#[derive(Debug, Error)]
pub enum PublishError {
    /// Repository specification could not be parsed into owner/repo
    #[error("invalid repository spec '{spec}'")]
    RepoSpec {
        /// The unparseable repository string
        spec: String,
    },

    /// A remote API step failed
    #[error("publish step '{step}' failed with HTTP {status}: {body}")]
    Api {
        /// The protocol step that failed (e.g., "get ref", "create tree")
        step: String,
        /// The HTTP status code returned
        status: u16,
        /// The (truncated) response body
        body: String,
    },

    /// The branch reference moved between read and update; the batch must be retried
    #[error("branch '{branch}' moved during publish; batch not applied")]
    Conflict {
        /// The branch whose tip changed concurrently
        branch: String,
    },

    /// A local git operation failed
    #[error("git {operation} failed: {reason}")]
    Git {
        /// The git operation that failed (e.g., "commit", "pull")
        operation: String,
        /// stderr or exit-status description
        reason: String,
    },

    /// Refused to remove a path that contains the current working directory
    #[error("refusing to remove unsafe path {path:?}")]
    UnsafePath {
        /// The path that was refused
        path: PathBuf,
    },
}

/// API error response format
///
/// This structure is returned by API endpoints when an error occurs.
/// It follows a standard format with machine-readable error codes,
/// human-readable messages, and optional contextual details.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "not_found",
///     "message": "Article 123 not found",
///     "details": {
///       "article_id": 123
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "not_found", "validation_error")
    ///
    /// Clients can use this for programmatic error handling.
    pub code: String,

    /// Human-readable error message
    ///
    /// This is suitable for displaying to end users.
    pub message: String,

    /// Optional additional context about the error
    ///
    /// This can include fields like article_id, publish step, backend name, etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create an API error with additional details
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    /// Create a "not found" error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new("not_found", format!("{} not found", resource.into()))
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    /// Create a "conflict" error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("conflict", message)
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }

    /// Create a "service unavailable" error
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new("service_unavailable", message)
    }
}

/// Convert errors to HTTP status codes for API responses
///
/// This trait maps domain errors to appropriate HTTP status codes.
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client error (invalid input)
            Error::Config { .. } => 400,
            Error::Publish(PublishError::RepoSpec { .. }) => 400,

            // 404 Not Found
            Error::NotFound(_) => 404,
            Error::Database(DatabaseError::NotFound(_)) => 404,

            // 409 Conflict
            Error::Duplicate(_) => 409,
            Error::Publish(PublishError::Conflict { .. }) => 409,
            Error::Database(DatabaseError::ConstraintViolation(_)) => 409,

            // 500 Internal Server Error - Server-side issues
            Error::Database(_) => 500,
            Error::Sqlx(_) => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Publish(PublishError::Git { .. }) => 500,
            Error::Publish(PublishError::UnsafePath { .. }) => 500,
            Error::Other(_) => 500,

            // 502 Bad Gateway - External service errors
            Error::Feed(_) => 502,
            Error::Network(_) => 502,
            Error::Publish(PublishError::Api { .. }) => 502,
            Error::Translate(TranslateError::Backend { .. }) => 502,
            Error::Translate(TranslateError::InvalidApiKey { .. }) => 502,
            Error::Translate(TranslateError::EmptyResult { .. }) => 502,

            // 503 Service Unavailable - Upstream capacity problems
            Error::Translate(TranslateError::Unavailable { .. }) => 503,
            Error::Translate(TranslateError::QuotaExceeded { .. }) => 503,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Database(e) => match e {
                DatabaseError::NotFound(_) => "record_not_found",
                DatabaseError::ConstraintViolation(_) => "constraint_violation",
                _ => "database_error",
            },
            Error::Sqlx(_) => "database_error",
            Error::Feed(e) => match e {
                FeedError::Fetch { .. } => "feed_fetch_failed",
                FeedError::Status { .. } => "feed_status_error",
                FeedError::Parse { .. } => "feed_parse_failed",
            },
            Error::Translate(e) => match e {
                TranslateError::Backend { .. } => "translate_failed",
                TranslateError::InvalidApiKey { .. } => "translator_invalid_key",
                TranslateError::QuotaExceeded { .. } => "translator_quota_exceeded",
                TranslateError::Unavailable { .. } => "translator_unavailable",
                TranslateError::EmptyResult { .. } => "translate_empty_result",
            },
            Error::Publish(e) => match e {
                PublishError::RepoSpec { .. } => "invalid_repo_spec",
                PublishError::Api { .. } => "publish_api_error",
                PublishError::Conflict { .. } => "publish_conflict",
                PublishError::Git { .. } => "git_error",
                PublishError::UnsafePath { .. } => "unsafe_path",
            },
            Error::Io(_) => "io_error",
            Error::NotFound(_) => "not_found",
            Error::Duplicate(_) => "duplicate",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        // Add contextual details for specific error types
        let details = match &error {
            Error::Feed(FeedError::Status { url, status }) => Some(serde_json::json!({
                "url": url,
                "status": status,
            })),
            Error::Translate(TranslateError::Backend { provider, .. })
            | Error::Translate(TranslateError::InvalidApiKey { provider })
            | Error::Translate(TranslateError::QuotaExceeded { provider })
            | Error::Translate(TranslateError::Unavailable { provider, .. })
            | Error::Translate(TranslateError::EmptyResult { provider }) => {
                Some(serde_json::json!({
                    "provider": provider,
                }))
            }
            Error::Publish(PublishError::Api { step, status, .. }) => Some(serde_json::json!({
                "step": step,
                "status": status,
            })),
            Error::Publish(PublishError::Conflict { branch }) => Some(serde_json::json!({
                "branch": branch,
            })),
            Error::Publish(PublishError::Git { operation, .. }) => Some(serde_json::json!({
                "operation": operation,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}

//! Site publication strategies.
//!
//! Rendered pages leave the pipeline as a batch of [`PublishFile`]s and a
//! [`Publisher`] lands the whole batch as one commit. Two strategies exist:
//!
//! - [`GitHubPublisher`]: commits through the GitHub Git Data API, no local
//!   checkout needed; a push to the site repository triggers its deploy
//!   workflow
//! - [`LocalPublisher`]: writes into a local working copy and drives the
//!   `git` binary
//!
//! [`create_publisher`] picks the API strategy when a repository and token
//! are configured, the local strategy otherwise.

mod github;
mod local;


pub use github::GitHubPublisher;
pub use local::LocalPublisher;

use async_trait::async_trait;

use crate::Result;
use crate::config::Config;

/// A rendered file awaiting publication
#[derive(Clone, Debug, PartialEq)]
pub struct PublishFile {
    /// Destination path relative to the repository root, forward slashes
    pub path: String,
    /// Rendered file contents
    pub content: String,
}

impl PublishFile {
    /// Convenience constructor
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Interface for landing a batch of rendered files as one commit
///
/// A batch lands completely or not at all; callers mark articles as
/// published only after the publisher returns success.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish the batch under a single commit message
    ///
    /// # Errors
    ///
    /// Returns an error when any file cannot be landed; in that case no
    /// part of the batch is observable on the published site.
    async fn publish_batch(&self, files: &[PublishFile], message: &str) -> Result<()>;

    /// Human-readable strategy name for logging
    fn name(&self) -> &'static str;
}

/// Select the publication strategy for the configuration
///
/// The API strategy needs both `site.github_repo` and a token (from the
/// configuration or the `GITHUB_TOKEN` environment variable); without them
/// publication goes through the local working copy.
///
/// # Errors
///
/// Returns an error when a configured repository spec cannot be parsed.
pub fn create_publisher(config: &Config) -> Result<Box<dyn Publisher>> {
    if let (Some(repo), Some(token)) = (config.site.github_repo.as_deref(), config.github_token()) {
        let publisher = GitHubPublisher::new(repo, token, &config.site)?;
        return Ok(Box::new(publisher));
    }
    Ok(Box::new(LocalPublisher::new(config.site.clone())))
}

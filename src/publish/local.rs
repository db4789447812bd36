//! Publication into a local git working copy.
//!
//! Files are written under the configured repository path and, when
//! auto-commit is enabled, committed through the `git` binary. The batch is
//! marked published only after the commit returns, so a failed commit leaves
//! nothing marked.

use std::process::Output;

use tracing::{debug, info};

use super::{PublishFile, Publisher};
use crate::config::SiteConfig;
use crate::error::PublishError;
use crate::{Error, Result};

/// Publisher that writes into a local checkout and drives the `git` binary
pub struct LocalPublisher {
    site: SiteConfig,
}

impl LocalPublisher {
    /// Create a publisher for the given site configuration
    pub fn new(site: SiteConfig) -> Self {
        Self { site }
    }

    async fn git(&self, operation: &'static str, args: &[&str]) -> Result<Output> {
        let output = tokio::process::Command::new("git")
            .args(args)
            .current_dir(&self.site.repo_path)
            .output()
            .await
            .map_err(|e| {
                Error::Publish(PublishError::Git {
                    operation: operation.to_string(),
                    reason: format!("failed to run git: {}", e),
                })
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let reason = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(Error::Publish(PublishError::Git {
                operation: operation.to_string(),
                reason,
            }));
        }
        Ok(output)
    }

    /// Stage everything and commit; a clean tree is not an error
    ///
    /// # Errors
    ///
    /// Returns an error when a git invocation fails.
    pub async fn commit(&self, message: &str) -> Result<()> {
        self.git("add", &["add", "-A"]).await?;
        let status = self.git("status", &["status", "--porcelain"]).await?;
        if status.stdout.is_empty() {
            debug!("No changes to commit in {:?}", self.site.repo_path);
            return Ok(());
        }
        self.git("commit", &["commit", "-m", message]).await?;
        info!("Committed changes to {:?}", self.site.repo_path);
        Ok(())
    }

    /// Update the working copy from the remote, cloning it when absent
    ///
    /// # Errors
    ///
    /// Returns an error when the checkout cannot be cloned or pulled, or
    /// when the remote configuration is incomplete.
    pub async fn pull(&self) -> Result<()> {
        if !self.site.repo_path.join(".git").exists() {
            return self.clone_repo().await;
        }
        let (remote, branch) = self.remote_branch()?;
        self.git("pull", &["pull", remote, branch]).await?;
        info!("Pulled {} {} into {:?}", remote, branch, self.site.repo_path);
        Ok(())
    }

    /// Push local commits to the remote
    ///
    /// # Errors
    ///
    /// Returns an error when the push fails or the remote configuration is
    /// incomplete.
    pub async fn push(&self) -> Result<()> {
        let (remote, branch) = self.remote_branch()?;
        self.git("push", &["push", remote, branch]).await?;
        info!("Pushed {:?} to {} {}", self.site.repo_path, remote, branch);
        Ok(())
    }

    fn remote_branch(&self) -> Result<(&str, &str)> {
        if self.site.git_remote.is_empty() || self.site.git_branch.is_empty() {
            return Err(Error::Config {
                message: "git remote and branch must be set".to_string(),
                key: Some("site.git_remote".to_string()),
            });
        }
        Ok((&self.site.git_remote, &self.site.git_branch))
    }

    async fn clone_repo(&self) -> Result<()> {
        let spec = self.site.github_repo.as_deref().filter(|s| !s.is_empty());
        let Some(spec) = spec else {
            return Err(Error::Config {
                message: "cannot clone site repository without site.github_repo".to_string(),
                key: Some("site.github_repo".to_string()),
            });
        };
        if self.site.repo_path.exists() {
            self.remove_stale_checkout().await?;
        }
        let url = clone_url(spec);
        let target = self.site.repo_path.to_string_lossy();
        // The target directory does not exist yet, so no current_dir here.
        let output = tokio::process::Command::new("git")
            .args(["clone", url.as_str(), target.as_ref()])
            .output()
            .await
            .map_err(|e| {
                Error::Publish(PublishError::Git {
                    operation: "clone".to_string(),
                    reason: format!("failed to run git: {}", e),
                })
            })?;
        if !output.status.success() {
            return Err(Error::Publish(PublishError::Git {
                operation: "clone".to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }));
        }
        info!("Cloned {} into {:?}", url, self.site.repo_path);
        Ok(())
    }

    async fn remove_stale_checkout(&self) -> Result<()> {
        let target = self.site.repo_path.canonicalize()?;
        let cwd = std::env::current_dir()?;
        if cwd.starts_with(&target) {
            return Err(Error::Publish(PublishError::UnsafePath { path: target }));
        }
        debug!("Removing stale checkout at {:?}", target);
        tokio::fs::remove_dir_all(&target).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Publisher for LocalPublisher {
    async fn publish_batch(&self, files: &[PublishFile], message: &str) -> Result<()> {
        if files.is_empty() {
            return Ok(());
        }
        if self.site.repo_path.as_os_str().is_empty() {
            return Err(Error::Config {
                message: "site repository path must be set".to_string(),
                key: Some("site.repo_path".to_string()),
            });
        }
        for file in files {
            let path = self.site.repo_path.join(&file.path);
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, &file.content).await?;
        }
        if self.site.auto_commit {
            self.commit(message).await?;
        }
        info!(
            "Wrote {} files into {:?}",
            files.len(),
            self.site.repo_path
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "local-git"
    }
}

/// Expand an `owner/repo` shorthand into a clone URL, passing full URLs
/// and SSH specs through unchanged
pub(super) fn clone_url(spec: &str) -> String {
    if spec.contains("://") || spec.starts_with("git@") {
        return spec.to_string();
    }
    format!("https://github.com/{}.git", spec)
}

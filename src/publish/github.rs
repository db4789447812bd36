//! Publication through the GitHub Git Data API.
//!
//! A batch lands as exactly one commit built in five steps: resolve the
//! branch head, read its tree, create a new tree containing every file,
//! create a commit on top of the head, then move the branch ref. Only the
//! final ref update is observable; a failure at any step leaves the branch
//! untouched.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::{PublishFile, Publisher};
use crate::config::SiteConfig;
use crate::error::PublishError;
use crate::utils::truncate_response_body;
use crate::{Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const API_ROOT: &str = "https://api.github.com";
const USER_AGENT: &str = "newsflow-publisher";
const BLOB_MODE: &str = "100644";

#[derive(serde::Deserialize)]
struct RefResponse {
    object: RefObject,
}

#[derive(serde::Deserialize)]
struct RefObject {
    sha: String,
}

#[derive(serde::Deserialize)]
struct CommitResponse {
    tree: TreeRef,
}

#[derive(serde::Deserialize)]
struct TreeRef {
    sha: String,
}

#[derive(Serialize)]
struct TreeEntry<'a> {
    path: &'a str,
    mode: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct CreateTreeRequest<'a> {
    base_tree: &'a str,
    tree: Vec<TreeEntry<'a>>,
}

#[derive(serde::Deserialize)]
struct CreateTreeResponse {
    sha: String,
}

#[derive(Serialize)]
struct CreateCommitRequest<'a> {
    message: &'a str,
    tree: &'a str,
    parents: [&'a str; 1],
}

#[derive(serde::Deserialize)]
struct CreateCommitResponse {
    sha: String,
}

#[derive(Serialize)]
struct UpdateRefRequest<'a> {
    sha: &'a str,
}

/// Publisher that commits batches through the GitHub Git Data API
pub struct GitHubPublisher {
    owner: String,
    repo: String,
    branch: String,
    token: String,
    api_root: String,
    client: reqwest::Client,
}

impl GitHubPublisher {
    /// Create a publisher for the given repository spec and token
    ///
    /// Accepts `owner/repo` as well as `https://github.com/owner/repo.git`
    /// and `git@github.com:owner/repo.git` forms.
    ///
    /// # Errors
    ///
    /// Returns an error when the repository spec cannot be parsed or the
    /// HTTP client cannot be constructed.
    pub fn new(repo_spec: &str, token: String, site: &SiteConfig) -> Result<Self> {
        let (owner, repo) = parse_repo_spec(repo_spec)?;
        let branch = if site.git_branch.is_empty() {
            "main".to_string()
        } else {
            site.git_branch.clone()
        };
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            owner,
            repo,
            branch,
            token,
            api_root: API_ROOT.to_string(),
            client,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_api_root(mut self, root: &str) -> Self {
        self.api_root = root.trim_end_matches('/').to_string();
        self
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!(
            "{}/repos/{}/{}{}",
            self.api_root, self.owner, self.repo, path
        );
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        step: &'static str,
        builder: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Publish(PublishError::Api {
                step: step.to_string(),
                status: status.as_u16(),
                body: truncate_response_body(&body),
            }));
        }
        serde_json::from_str(&body).map_err(|e| {
            Error::Publish(PublishError::Api {
                step: step.to_string(),
                status: status.as_u16(),
                body: format!("unexpected response: {}: {}", e, truncate_response_body(&body)),
            })
        })
    }

    async fn branch_head(&self) -> Result<String> {
        let path = format!("/git/ref/heads/{}", encode_ref(&self.branch));
        let reference: RefResponse = self
            .execute_json("get ref", self.request(Method::GET, &path))
            .await?;
        Ok(reference.object.sha)
    }

    async fn commit_tree(&self, commit_sha: &str) -> Result<String> {
        let path = format!("/git/commits/{}", commit_sha);
        let commit: CommitResponse = self
            .execute_json("get commit", self.request(Method::GET, &path))
            .await?;
        Ok(commit.tree.sha)
    }

    async fn create_tree(&self, base_tree: &str, files: &[PublishFile]) -> Result<String> {
        let request = CreateTreeRequest {
            base_tree,
            tree: files
                .iter()
                .map(|file| TreeEntry {
                    path: &file.path,
                    mode: BLOB_MODE,
                    kind: "blob",
                    content: &file.content,
                })
                .collect(),
        };
        let tree: CreateTreeResponse = self
            .execute_json(
                "create tree",
                self.request(Method::POST, "/git/trees").json(&request),
            )
            .await?;
        Ok(tree.sha)
    }

    async fn create_commit(&self, message: &str, tree: &str, parent: &str) -> Result<String> {
        let request = CreateCommitRequest {
            message,
            tree,
            parents: [parent],
        };
        let commit: CreateCommitResponse = self
            .execute_json(
                "create commit",
                self.request(Method::POST, "/git/commits").json(&request),
            )
            .await?;
        Ok(commit.sha)
    }

    async fn update_ref(&self, sha: &str) -> Result<()> {
        let path = format!("/git/refs/heads/{}", encode_ref(&self.branch));
        let response = self
            .request(Method::PATCH, &path)
            .json(&UpdateRefRequest { sha })
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await?;
        // 409 and 422 both signal the branch moved under us; the next run
        // retries on the new head.
        if status == StatusCode::CONFLICT || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(Error::Publish(PublishError::Conflict {
                branch: self.branch.clone(),
            }));
        }
        Err(Error::Publish(PublishError::Api {
            step: "update ref".to_string(),
            status: status.as_u16(),
            body: truncate_response_body(&body),
        }))
    }
}

#[async_trait::async_trait]
impl Publisher for GitHubPublisher {
    async fn publish_batch(&self, files: &[PublishFile], message: &str) -> Result<()> {
        if files.is_empty() {
            return Ok(());
        }
        let parent_sha = self.branch_head().await?;
        debug!("Branch {} at {}", self.branch, parent_sha);
        let base_tree = self.commit_tree(&parent_sha).await?;
        let tree_sha = self.create_tree(&base_tree, files).await?;
        let commit_sha = self.create_commit(message, &tree_sha, &parent_sha).await?;
        self.update_ref(&commit_sha).await?;
        info!(
            "Committed {} files to {}/{}@{} ({})",
            files.len(),
            self.owner,
            self.repo,
            self.branch,
            commit_sha
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "github-api"
    }
}

/// Percent-encode each segment of a ref name, keeping `/` separators
///
/// Branch names like `releases/2026` stay hierarchical in the URL while
/// anything else in a segment is escaped.
pub(super) fn encode_ref(branch: &str) -> String {
    branch
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Split a repository spec into owner and repository name
pub(super) fn parse_repo_spec(spec: &str) -> Result<(String, String)> {
    let trimmed = spec.trim().trim_end_matches(".git");
    let path = trimmed
        .strip_prefix("https://github.com/")
        .or_else(|| trimmed.strip_prefix("http://github.com/"))
        .or_else(|| trimmed.strip_prefix("git@github.com:"))
        .unwrap_or(trimmed);
    let mut parts = path.splitn(2, '/');
    let owner = parts.next().unwrap_or_default();
    let repo = parts.next().unwrap_or_default();
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(Error::Publish(PublishError::RepoSpec {
            spec: spec.to_string(),
        }));
    }
    Ok((owner.to_string(), repo.to_string()))
}

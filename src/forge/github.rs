//! forge::github
//!
//! GitHub implementation of [`GitDataApi`] over the REST Git Data endpoints.
//!
//! # Endpoints
//!
//! | Operation         | Request                                         |
//! |-------------------|-------------------------------------------------|
//! | `get_branch_sha`  | `GET   /repos/{o}/{r}/git/ref/heads/{branch}`   |
//! | `create_blob`     | `POST  /repos/{o}/{r}/git/blobs`                |
//! | `get_commit_tree` | `GET   /repos/{o}/{r}/git/commits/{sha}`        |
//! | `create_tree`     | `POST  /repos/{o}/{r}/git/trees`                |
//! | `create_commit`   | `POST  /repos/{o}/{r}/git/commits`              |
//! | `update_branch`   | `PATCH /repos/{o}/{r}/git/refs/heads/{branch}`  |
//!
//! Every request carries `Authorization: token <token>`. Nothing is retried:
//! a failed request is mapped to a [`ForgeError`] and returned.
//!
//! # Example
//!
//! ```ignore
//! use leethub::forge::github::GitHubGitData;
//!
//! let api = GitHubGitData::new();
//! let sha = api.get_branch_sha(&repo, &branch, &token).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::{FileEntry, ForgeError, GitDataApi};
use crate::core::types::{BranchName, RepoSlug};

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "leethub-cli";

/// GitHub Git Data client.
///
/// Holds a reusable `reqwest::Client` and the API base URL. Credentials are
/// supplied per call.
pub struct GitHubGitData {
    /// HTTP client for making requests
    client: Client,
    /// API base URL (configurable for GitHub Enterprise and tests)
    api_base: String,
}

impl std::fmt::Debug for GitHubGitData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubGitData")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Default for GitHubGitData {
    fn default() -> Self {
        Self::new()
    }
}

impl GitHubGitData {
    /// Create a client against `https://api.github.com` with no request timeout.
    pub fn new() -> Self {
        Self::with_client(Client::new(), DEFAULT_API_BASE)
    }

    /// Create a client against a custom API base URL.
    ///
    /// Use this for GitHub Enterprise (`https://github.example.com/api/v3`)
    /// or a local mock server.
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_base)
    }

    /// Create a client with a per-request timeout.
    ///
    /// A request exceeding the timeout fails with `ForgeError::NetworkError`.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::NetworkError` if the HTTP client cannot be built.
    pub fn with_timeout(
        api_base: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ForgeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;
        Ok(Self::with_client(client, api_base))
    }

    /// Create a client from an existing `reqwest::Client`.
    pub fn with_client(client: Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build headers for a request.
    fn headers(token: &str) -> Result<HeaderMap, ForgeError> {
        let auth = HeaderValue::from_str(&format!("token {}", token)).map_err(|_| {
            ForgeError::AuthFailed("token contains characters not allowed in a header".into())
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Build URL for a repository endpoint.
    fn repo_url(&self, repo: &RepoSlug, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base,
            urlencoding::encode(repo.owner()),
            urlencoding::encode(repo.name()),
            path
        )
    }

    /// Branch name as URL path segments.
    ///
    /// Each `/`-separated component is percent-encoded on its own, so `#`,
    /// `%` and `?` stay part of the ref name instead of ending the path.
    fn branch_path(branch: &BranchName) -> String {
        branch
            .as_str()
            .split('/')
            .map(|part| urlencoding::encode(part).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Send a request and decode the JSON body of a successful response.
    async fn send<T: for<'de> Deserialize<'de>>(
        &self,
        request: RequestBuilder,
        token: &str,
    ) -> Result<T, ForgeError> {
        let response = request
            .headers(Self::headers(token)?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;
        Self::handle_response(response).await
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        response: Response,
    ) -> Result<T, ForgeError> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            })
        } else {
            Err(Self::handle_error_response(response, status).await)
        }
    }

    /// Map an error response from the API.
    async fn handle_error_response(response: Response, status: StatusCode) -> ForgeError {
        let required_permissions = response
            .headers()
            .get("X-Accepted-GitHub-Permissions")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN => {
                let mut err_msg = format!("Permission denied: {}", message);
                if let Some(perms) = required_permissions.filter(|p| !p.is_empty()) {
                    err_msg.push_str(&format!(" [required: {}]", perms));
                }
                ForgeError::AuthFailed(err_msg)
            }
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ if status.is_server_error() => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// Encode text content for the blob endpoint.
///
/// The UTF-8 bytes are encoded, so multi-byte characters survive the
/// ASCII-only transport unchanged.
pub fn encode_content(content: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(content.as_bytes())
}

#[async_trait]
impl GitDataApi for GitHubGitData {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn get_branch_sha(
        &self,
        repo: &RepoSlug,
        branch: &BranchName,
        token: &str,
    ) -> Result<String, ForgeError> {
        let url = self.repo_url(repo, &format!("git/ref/heads/{}", Self::branch_path(branch)));
        log::debug!("GET {}", url);

        let reference: GitHubRef = self.send(self.client.get(&url), token).await?;
        Ok(reference.object.sha)
    }

    async fn create_blob(
        &self,
        repo: &RepoSlug,
        content: &str,
        token: &str,
    ) -> Result<String, ForgeError> {
        let url = self.repo_url(repo, "git/blobs");
        log::debug!("POST {} ({} bytes)", url, content.len());

        let body = CreateBlobBody {
            content: encode_content(content),
            encoding: "base64",
        };
        let blob: GitHubSha = self.send(self.client.post(&url).json(&body), token).await?;
        Ok(blob.sha)
    }

    async fn get_commit_tree(
        &self,
        repo: &RepoSlug,
        commit_sha: &str,
        token: &str,
    ) -> Result<String, ForgeError> {
        let url = self.repo_url(repo, &format!("git/commits/{}", commit_sha));
        log::debug!("GET {}", url);

        let commit: GitHubCommit = self.send(self.client.get(&url), token).await?;
        Ok(commit.tree.sha)
    }

    async fn create_tree(
        &self,
        repo: &RepoSlug,
        base_tree: &str,
        entries: &[FileEntry],
        token: &str,
    ) -> Result<String, ForgeError> {
        let url = self.repo_url(repo, "git/trees");
        log::debug!("POST {} ({} entries on {})", url, entries.len(), base_tree);

        let body = CreateTreeBody {
            base_tree,
            tree: entries,
        };
        let tree: GitHubSha = self.send(self.client.post(&url).json(&body), token).await?;
        Ok(tree.sha)
    }

    async fn create_commit(
        &self,
        repo: &RepoSlug,
        message: &str,
        tree_sha: &str,
        parent_sha: &str,
        token: &str,
    ) -> Result<String, ForgeError> {
        let url = self.repo_url(repo, "git/commits");
        log::debug!("POST {} (tree {}, parent {})", url, tree_sha, parent_sha);

        let body = CreateCommitBody {
            message,
            tree: tree_sha,
            parents: [parent_sha],
        };
        let commit: GitHubSha = self.send(self.client.post(&url).json(&body), token).await?;
        Ok(commit.sha)
    }

    async fn update_branch(
        &self,
        repo: &RepoSlug,
        branch: &BranchName,
        commit_sha: &str,
        token: &str,
    ) -> Result<(), ForgeError> {
        let url = self.repo_url(repo, &format!("git/refs/heads/{}", Self::branch_path(branch)));
        log::debug!("PATCH {} -> {}", url, commit_sha);

        let body = UpdateRefBody {
            sha: commit_sha,
            force: false,
        };
        let _: GitHubRef = self
            .send(self.client.patch(&url).json(&body), token)
            .await?;
        Ok(())
    }
}

// =============================================================================
// API Request/Response Types
// =============================================================================

#[derive(Serialize)]
struct CreateBlobBody {
    content: String,
    encoding: &'static str,
}

#[derive(Serialize)]
struct CreateTreeBody<'a> {
    base_tree: &'a str,
    tree: &'a [FileEntry],
}

#[derive(Serialize)]
struct CreateCommitBody<'a> {
    message: &'a str,
    tree: &'a str,
    parents: [&'a str; 1],
}

#[derive(Serialize)]
struct UpdateRefBody<'a> {
    sha: &'a str,
    force: bool,
}

/// Any response carrying a top-level `sha` (blob, tree, commit).
#[derive(Deserialize)]
struct GitHubSha {
    sha: String,
}

/// Reference response (`ref` read and update).
#[derive(Deserialize)]
struct GitHubRef {
    object: GitHubSha,
}

/// Commit read response; only the tree is needed.
#[derive(Deserialize)]
struct GitHubCommit {
    tree: GitHubSha,
}

#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

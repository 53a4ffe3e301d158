//! forge::traits
//!
//! Trait definition for the Git Data operations a commit is assembled from.
//!
//! # Design
//!
//! The `GitDataApi` trait is async because every operation is one HTTP
//! round trip. Each method maps to exactly one remote endpoint and returns
//! the SHA the remote assigned; no method retries or caches.
//!
//! The token is passed per call rather than held by the implementation,
//! so one client can serve whichever credential the caller read from
//! the local store.
//!
//! # Example
//!
//! ```ignore
//! use leethub::forge::{GitDataApi, ForgeError};
//! use leethub::core::types::{BranchName, RepoSlug};
//!
//! async fn tip(api: &dyn GitDataApi, token: &str) -> Result<String, ForgeError> {
//!     let repo = RepoSlug::parse("octocat/solutions").unwrap();
//!     let branch = BranchName::new("main").unwrap();
//!     api.get_branch_sha(&repo, &branch, token).await
//! }
//! ```

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::core::types::{BranchName, RepoSlug, TreePath};

/// Errors from remote Git Data operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForgeError {
    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found (missing repo, branch or object).
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error, or a body that could not be parsed.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error, including timeouts.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// File mode of a regular, non-executable file.
pub const MODE_FILE: &str = "100644";

/// Object type of a file entry.
pub const TYPE_BLOB: &str = "blob";

/// One file to place in the new tree.
///
/// Mode and type are fixed: every entry is a regular file blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Path inside the tree, `{directory}/{filename}`
    pub path: String,
    /// Git file mode
    pub mode: &'static str,
    /// Git object type
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// SHA of the blob holding the content
    pub sha: String,
}

impl FileEntry {
    /// Create a regular-file entry for an uploaded blob.
    pub fn blob(path: &TreePath, sha: impl Into<String>) -> Self {
        Self {
            path: path.as_str().to_string(),
            mode: MODE_FILE,
            kind: TYPE_BLOB,
            sha: sha.into(),
        }
    }
}

/// The Git Data operations needed to commit files without a local clone.
///
/// # Ordering
///
/// A commit is only visible once [`update_branch`] succeeds, so callers
/// must invoke it last. Objects created by earlier calls are harmless
/// orphans when a later call fails.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// [`update_branch`]: GitDataApi::update_branch
#[async_trait]
pub trait GitDataApi: Send + Sync {
    /// Get the implementation name (e.g., "github", "mock").
    fn name(&self) -> &'static str;

    /// Resolve a branch to the SHA of the commit at its tip.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the repository or branch does not exist
    async fn get_branch_sha(
        &self,
        repo: &RepoSlug,
        branch: &BranchName,
        token: &str,
    ) -> Result<String, ForgeError>;

    /// Upload `content` as a new blob and return its SHA.
    ///
    /// The content is sent base64 encoded. Identical content still
    /// produces a new upload.
    async fn create_blob(
        &self,
        repo: &RepoSlug,
        content: &str,
        token: &str,
    ) -> Result<String, ForgeError>;

    /// Read a commit and return the SHA of its tree.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the commit does not exist
    async fn get_commit_tree(
        &self,
        repo: &RepoSlug,
        commit_sha: &str,
        token: &str,
    ) -> Result<String, ForgeError>;

    /// Create a tree from `base_tree` plus `entries` and return its SHA.
    ///
    /// Paths absent from the base tree are added, present ones replaced.
    async fn create_tree(
        &self,
        repo: &RepoSlug,
        base_tree: &str,
        entries: &[FileEntry],
        token: &str,
    ) -> Result<String, ForgeError>;

    /// Create a single-parent commit and return its SHA.
    async fn create_commit(
        &self,
        repo: &RepoSlug,
        message: &str,
        tree_sha: &str,
        parent_sha: &str,
        token: &str,
    ) -> Result<String, ForgeError>;

    /// Move the branch to `commit_sha` without forcing.
    ///
    /// # Errors
    ///
    /// - `ApiError` with status 422 if the update is not a fast-forward
    async fn update_branch(
        &self,
        repo: &RepoSlug,
        branch: &BranchName,
        commit_sha: &str,
        token: &str,
    ) -> Result<(), ForgeError>;
}

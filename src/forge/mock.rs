//! forge::mock
//!
//! In-memory Git Data implementation for deterministic testing.
//!
//! # Design
//!
//! The mock keeps a tiny object database (blobs, trees, commits, branches)
//! so a commit assembled through it can be inspected afterwards. Every call
//! is recorded, which lets tests assert the exact request sequence. Object
//! SHAs are derived from a per-kind counter, so the same sequence of calls
//! always produces the same SHAs.
//!
//! Branch updates enforce fast-forward: the new commit's parent must be the
//! current tip, otherwise the call fails with a 422 like GitHub does.
//!
//! # Example
//!
//! ```
//! use leethub::forge::mock::MockGitData;
//! use leethub::forge::GitDataApi;
//! use leethub::core::types::{BranchName, RepoSlug};
//!
//! # tokio_test::block_on(async {
//! let api = MockGitData::new().with_branch("main");
//! let repo = RepoSlug::parse("o/r").unwrap();
//! let main = BranchName::new("main").unwrap();
//!
//! let tip = api.get_branch_sha(&repo, &main, "token").await.unwrap();
//! assert_eq!(tip, api.branch_tip("main").unwrap());
//! # });
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::Engine as _;
use sha2::{Digest, Sha256};

use super::github::encode_content;
use super::traits::{FileEntry, ForgeError, GitDataApi};
use crate::core::types::{BranchName, RepoSlug};

/// Mock Git Data API for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockGitData {
    inner: Arc<Mutex<MockInner>>,
}

#[derive(Debug, Default)]
struct MockInner {
    /// Blob SHA -> base64 content as it would travel on the wire.
    blobs: HashMap<String, String>,
    /// Tree SHA -> path -> blob SHA.
    trees: HashMap<String, BTreeMap<String, String>>,
    /// Commit SHA -> commit object.
    commits: HashMap<String, MockCommit>,
    /// Branch name -> tip commit SHA.
    branches: HashMap<String, String>,
    /// Per-kind counters used to derive SHAs.
    counters: HashMap<&'static str, u64>,
    fail_on: Option<FailOn>,
    operations: Vec<MockOperation>,
}

/// A commit stored in the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCommit {
    pub message: String,
    pub tree: String,
    pub parents: Vec<String>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    GetBranchSha(ForgeError),
    CreateBlob(ForgeError),
    GetCommitTree(ForgeError),
    CreateTree(ForgeError),
    CreateCommit(ForgeError),
    UpdateBranch(ForgeError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    GetBranchSha {
        branch: String,
    },
    CreateBlob {
        content: String,
    },
    GetCommitTree {
        commit: String,
    },
    CreateTree {
        base_tree: String,
        paths: Vec<String>,
    },
    CreateCommit {
        message: String,
        tree: String,
        parent: String,
    },
    UpdateBranch {
        branch: String,
        sha: String,
    },
}

impl MockOperation {
    /// Short operation name, handy for asserting call order.
    pub fn kind(&self) -> &'static str {
        match self {
            MockOperation::GetBranchSha { .. } => "get_branch_sha",
            MockOperation::CreateBlob { .. } => "create_blob",
            MockOperation::GetCommitTree { .. } => "get_commit_tree",
            MockOperation::CreateTree { .. } => "create_tree",
            MockOperation::CreateCommit { .. } => "create_commit",
            MockOperation::UpdateBranch { .. } => "update_branch",
        }
    }
}

impl MockInner {
    fn next_sha(&mut self, kind: &'static str) -> String {
        let counter = self.counters.entry(kind).or_insert(0);
        *counter += 1;
        let digest = Sha256::digest(format!("{}:{}", kind, counter).as_bytes());
        hex::encode(&digest[..20])
    }
}

impl MockGitData {
    /// Create an empty mock with no branches.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockInner::default())),
        }
    }

    /// Add a branch pointing at a fresh root commit with an empty tree.
    pub fn with_branch(self, branch: &str) -> Self {
        self.with_branch_files(branch, &[])
    }

    /// Add a branch whose root commit already contains `files` (path, content).
    pub fn with_branch_files(self, branch: &str, files: &[(&str, &str)]) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            let mut tree = BTreeMap::new();
            for (path, content) in files {
                let blob = inner.next_sha("blob");
                inner.blobs.insert(blob.clone(), encode_content(content));
                tree.insert(path.to_string(), blob);
            }
            let tree_sha = inner.next_sha("tree");
            inner.trees.insert(tree_sha.clone(), tree);

            let commit_sha = inner.next_sha("commit");
            inner.commits.insert(
                commit_sha.clone(),
                MockCommit {
                    message: "Initial commit".to_string(),
                    tree: tree_sha,
                    parents: Vec::new(),
                },
            );
            inner.branches.insert(branch.to_string(), commit_sha);
        }
        self
    }

    /// Configure the mock to fail on a specific operation.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = None;
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Names of the recorded operations, in call order.
    pub fn operation_kinds(&self) -> Vec<&'static str> {
        self.operations().iter().map(MockOperation::kind).collect()
    }

    /// Clear recorded operations.
    pub fn clear_operations(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.clear();
    }

    /// Current tip of a branch.
    pub fn branch_tip(&self, branch: &str) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        inner.branches.get(branch).cloned()
    }

    /// Move a branch directly, bypassing fast-forward checks.
    ///
    /// Simulates another client pushing to the branch.
    pub fn set_branch_tip(&self, branch: &str, sha: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.branches.insert(branch.to_string(), sha.to_string());
    }

    /// Look up a stored commit.
    pub fn commit(&self, sha: &str) -> Option<MockCommit> {
        let inner = self.inner.lock().unwrap();
        inner.commits.get(sha).cloned()
    }

    /// Decoded content of `path` in the tree of `commit_sha`.
    pub fn file_content(&self, commit_sha: &str, path: &str) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        let commit = inner.commits.get(commit_sha)?;
        let blob = inner.trees.get(&commit.tree)?.get(path)?;
        let encoded = inner.blobs.get(blob)?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .ok()?;
        String::from_utf8(bytes).ok()
    }

    /// All paths in the tree of `commit_sha`.
    pub fn tree_paths(&self, commit_sha: &str) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner
            .commits
            .get(commit_sha)
            .and_then(|c| inner.trees.get(&c.tree))
            .map(|tree| tree.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of stored blobs, orphans included.
    pub fn blob_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.blobs.len()
    }

    fn record(&self, op: MockOperation) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
    }

    fn check_fail(&self, expected: &str) -> Result<(), ForgeError> {
        let inner = self.inner.lock().unwrap();
        let err = match &inner.fail_on {
            Some(FailOn::GetBranchSha(e)) if expected == "get_branch_sha" => e,
            Some(FailOn::CreateBlob(e)) if expected == "create_blob" => e,
            Some(FailOn::GetCommitTree(e)) if expected == "get_commit_tree" => e,
            Some(FailOn::CreateTree(e)) if expected == "create_tree" => e,
            Some(FailOn::CreateCommit(e)) if expected == "create_commit" => e,
            Some(FailOn::UpdateBranch(e)) if expected == "update_branch" => e,
            _ => return Ok(()),
        };
        Err(err.clone())
    }
}

impl Default for MockGitData {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitDataApi for MockGitData {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn get_branch_sha(
        &self,
        _repo: &RepoSlug,
        branch: &BranchName,
        _token: &str,
    ) -> Result<String, ForgeError> {
        self.record(MockOperation::GetBranchSha {
            branch: branch.to_string(),
        });
        self.check_fail("get_branch_sha")?;

        self.branch_tip(branch.as_str())
            .ok_or_else(|| ForgeError::NotFound("Not Found".into()))
    }

    async fn create_blob(
        &self,
        _repo: &RepoSlug,
        content: &str,
        _token: &str,
    ) -> Result<String, ForgeError> {
        self.record(MockOperation::CreateBlob {
            content: content.to_string(),
        });
        self.check_fail("create_blob")?;

        let mut inner = self.inner.lock().unwrap();
        let sha = inner.next_sha("blob");
        inner.blobs.insert(sha.clone(), encode_content(content));
        Ok(sha)
    }

    async fn get_commit_tree(
        &self,
        _repo: &RepoSlug,
        commit_sha: &str,
        _token: &str,
    ) -> Result<String, ForgeError> {
        self.record(MockOperation::GetCommitTree {
            commit: commit_sha.to_string(),
        });
        self.check_fail("get_commit_tree")?;

        self.commit(commit_sha)
            .map(|c| c.tree)
            .ok_or_else(|| ForgeError::NotFound("Not Found".into()))
    }

    async fn create_tree(
        &self,
        _repo: &RepoSlug,
        base_tree: &str,
        entries: &[FileEntry],
        _token: &str,
    ) -> Result<String, ForgeError> {
        self.record(MockOperation::CreateTree {
            base_tree: base_tree.to_string(),
            paths: entries.iter().map(|e| e.path.clone()).collect(),
        });
        self.check_fail("create_tree")?;

        let mut inner = self.inner.lock().unwrap();
        let mut tree = inner.trees.get(base_tree).cloned().ok_or_else(|| {
            ForgeError::ApiError {
                status: 422,
                message: "base_tree is not a valid tree".into(),
            }
        })?;
        for entry in entries {
            if !inner.blobs.contains_key(&entry.sha) {
                return Err(ForgeError::ApiError {
                    status: 422,
                    message: format!("tree.sha {} is not a valid blob", entry.sha),
                });
            }
            tree.insert(entry.path.clone(), entry.sha.clone());
        }

        let sha = inner.next_sha("tree");
        inner.trees.insert(sha.clone(), tree);
        Ok(sha)
    }

    async fn create_commit(
        &self,
        _repo: &RepoSlug,
        message: &str,
        tree_sha: &str,
        parent_sha: &str,
        _token: &str,
    ) -> Result<String, ForgeError> {
        self.record(MockOperation::CreateCommit {
            message: message.to_string(),
            tree: tree_sha.to_string(),
            parent: parent_sha.to_string(),
        });
        self.check_fail("create_commit")?;

        let mut inner = self.inner.lock().unwrap();
        if !inner.trees.contains_key(tree_sha) || !inner.commits.contains_key(parent_sha) {
            return Err(ForgeError::ApiError {
                status: 422,
                message: "tree or parent does not exist".into(),
            });
        }

        let sha = inner.next_sha("commit");
        inner.commits.insert(
            sha.clone(),
            MockCommit {
                message: message.to_string(),
                tree: tree_sha.to_string(),
                parents: vec![parent_sha.to_string()],
            },
        );
        Ok(sha)
    }

    async fn update_branch(
        &self,
        _repo: &RepoSlug,
        branch: &BranchName,
        commit_sha: &str,
        _token: &str,
    ) -> Result<(), ForgeError> {
        self.record(MockOperation::UpdateBranch {
            branch: branch.to_string(),
            sha: commit_sha.to_string(),
        });
        self.check_fail("update_branch")?;

        let mut inner = self.inner.lock().unwrap();
        let tip = inner
            .branches
            .get(branch.as_str())
            .cloned()
            .ok_or_else(|| ForgeError::NotFound("Reference does not exist".into()))?;
        let fast_forward = inner
            .commits
            .get(commit_sha)
            .map(|c| c.parents.contains(&tip))
            .unwrap_or(false);
        if !fast_forward {
            return Err(ForgeError::ApiError {
                status: 422,
                message: "Update is not a fast forward".into(),
            });
        }

        inner
            .branches
            .insert(branch.to_string(), commit_sha.to_string());
        Ok(())
    }
}

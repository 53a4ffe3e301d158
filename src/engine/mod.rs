//! engine
//!
//! Runs the commit pipeline against injected remote and store backends.
//!
//! # Architecture
//!
//! The engine owns no I/O of its own. [`commit_solution_files`] takes a
//! [`GitDataApi`](crate::forge::GitDataApi) and a [`Store`](crate::store::Store)
//! by reference, so the CLI wires in GitHub and the file store while tests
//! wire in the recording mock and the memory store.
//!
//! # Example
//!
//! ```
//! use leethub::core::types::{BranchName, RepoSlug};
//! use leethub::engine::{commit_solution_files, CommitRequest, SolutionFile};
//! use leethub::forge::mock::MockGitData;
//! use leethub::store::{MemoryStore, Store, TOKEN_KEY};
//!
//! # tokio_test::block_on(async {
//! let api = MockGitData::new().with_branch("main");
//! let store = MemoryStore::new();
//! store.set(TOKEN_KEY, serde_json::json!("ghp_xxxx")).unwrap();
//!
//! let request = CommitRequest {
//!     repo: RepoSlug::parse("octocat/solutions").unwrap(),
//!     branch: BranchName::new("main").unwrap(),
//!     problem: "two-sum".to_string(),
//!     directory: "0001-two-sum".to_string(),
//!     files: vec![SolutionFile::new("solution.py", "print(1)")],
//!     difficulty: Some("Easy".to_string()),
//!     message: None,
//! };
//!
//! let sha = commit_solution_files(&api, &store, &request).await.unwrap();
//! assert_eq!(api.branch_tip("main"), Some(sha));
//! # });
//! ```

pub mod commit;

pub use commit::{
    commit_solution_files, CommitError, CommitRequest, SolutionFile, Stage,
};

use std::path::PathBuf;

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Explicit config file path.
    pub config_path: Option<PathBuf>,
    /// Quiet mode (minimal output).
    pub quiet: bool,
    /// Interactive prompts allowed.
    pub interactive: bool,
}

//! engine::commit
//!
//! The commit pipeline: files in, commit SHA out.
//!
//! # Sequence
//!
//! 1. Read the token from the store (fail before any remote call if absent)
//! 2. Resolve the branch tip
//! 3. Upload one blob per file, in input order
//! 4. Read the tip commit's tree
//! 5. Create a tree from that base plus the new entries
//! 6. Create a commit whose only parent is the tip from step 2
//! 7. Fast-forward the branch to the new commit
//! 8. Record the commit SHA in the problem's stats
//!
//! Every step awaits the previous one and nothing is retried. The branch
//! is only moved in step 7, so a failure in steps 2–6 leaves the remote
//! history untouched (at most a few unreferenced objects). A rejected
//! branch update is reported as an error and the stats are left alone.

use std::fmt;

use thiserror::Error;

use crate::core::stats::{Difficulty, Stats};
use crate::core::types::{BranchName, RepoSlug, TreePath, TypeError};
use crate::forge::{FileEntry, ForgeError, GitDataApi};
use crate::store::{Store, StoreError, TOKEN_KEY};

/// Pipeline stage, used to say where a remote failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ReadRef,
    CreateBlob,
    ReadCommit,
    CreateTree,
    CreateCommit,
    UpdateRef,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ReadRef => "reading branch",
            Stage::CreateBlob => "uploading blob",
            Stage::ReadCommit => "reading tip commit",
            Stage::CreateTree => "creating tree",
            Stage::CreateCommit => "creating commit",
            Stage::UpdateRef => "updating branch",
        };
        write!(f, "{}", name)
    }
}

/// Errors from the commit pipeline.
#[derive(Debug, Error)]
pub enum CommitError {
    /// No token in the local store. Raised before any remote call.
    #[error("no GitHub token stored under '{}'; run 'leethub auth' first", TOKEN_KEY)]
    MissingCredential,

    /// The request itself is malformed. Raised before any remote call.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A remote call failed.
    #[error("{stage} failed: {source}")]
    Remote {
        stage: Stage,
        #[source]
        source: ForgeError,
    },

    /// The local store could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The branch moved to `commit` but its stats could not be written.
    #[error("{commit} is on the branch but its stats were not recorded: {source}")]
    StatsNotRecorded {
        commit: String,
        #[source]
        source: StoreError,
    },
}

impl From<TypeError> for CommitError {
    fn from(e: TypeError) -> Self {
        CommitError::InvalidRequest(e.to_string())
    }
}

fn at(stage: Stage) -> impl FnOnce(ForgeError) -> CommitError {
    move |source| CommitError::Remote { stage, source }
}

/// One file to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionFile {
    /// File name inside the target directory
    pub filename: String,
    /// Text content
    pub content: String,
}

impl SolutionFile {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// Everything needed to commit one problem's files.
#[derive(Debug, Clone)]
pub struct CommitRequest {
    /// Target repository
    pub repo: RepoSlug,
    /// Target branch
    pub branch: BranchName,
    /// Problem name; keys the stats record
    pub problem: String,
    /// Directory the files are placed in (empty for the repository root)
    pub directory: String,
    /// Files in commit order
    pub files: Vec<SolutionFile>,
    /// Difficulty label (e.g. "Easy")
    pub difficulty: Option<String>,
    /// Commit message; a default is derived when absent
    pub message: Option<String>,
}

impl CommitRequest {
    /// The commit message to use.
    ///
    /// Falls back to `Add {problem} ({difficulty})`, or `Add {problem}`
    /// without a label.
    pub fn commit_message(&self) -> String {
        if let Some(message) = self.message.as_deref().filter(|m| !m.trim().is_empty()) {
            return message.to_string();
        }
        match self.difficulty.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(label) => format!("Add {} ({})", self.problem, Difficulty::parse(label)),
            None => format!("Add {}", self.problem),
        }
    }

    /// Tree path of every file, in input order.
    fn tree_paths(&self) -> Result<Vec<TreePath>, CommitError> {
        if self.problem.trim().is_empty() {
            return Err(CommitError::InvalidRequest(
                "problem name cannot be empty".into(),
            ));
        }
        if self.files.is_empty() {
            return Err(CommitError::InvalidRequest("no files to commit".into()));
        }

        let paths = self
            .files
            .iter()
            .map(|f| TreePath::join(&self.directory, &f.filename))
            .collect::<Result<Vec<_>, _>>()?;

        for (i, path) in paths.iter().enumerate() {
            if paths[..i].contains(path) {
                return Err(CommitError::InvalidRequest(format!(
                    "'{}' appears more than once",
                    path
                )));
            }
        }
        Ok(paths)
    }
}

/// Commit a problem's files to the target branch and record the commit.
///
/// Returns the SHA of the new commit.
///
/// # Errors
///
/// - `MissingCredential` if the store holds no token (no remote call made)
/// - `InvalidRequest` for an empty file list or bad paths (no remote call made)
/// - `Remote` if any remote call fails, tagged with the failing stage
/// - `Store` if the token or the stats cannot be read (no remote call made)
/// - `StatsNotRecorded` if the branch moved but the stats write failed;
///   the commit is live and must not be pushed again
pub async fn commit_solution_files(
    api: &dyn GitDataApi,
    store: &dyn Store,
    request: &CommitRequest,
) -> Result<String, CommitError> {
    let token = store
        .get_string(TOKEN_KEY)?
        .ok_or(CommitError::MissingCredential)?;
    let paths = request.tree_paths()?;
    Stats::check(store)?;
    let repo = &request.repo;

    log::debug!(
        "committing {} file(s) for '{}' to {}@{} via {}",
        request.files.len(),
        request.problem,
        repo,
        request.branch,
        api.name()
    );

    let tip = api
        .get_branch_sha(repo, &request.branch, &token)
        .await
        .map_err(at(Stage::ReadRef))?;
    log::debug!("branch {} is at {}", request.branch, tip);

    let mut entries = Vec::with_capacity(request.files.len());
    for (file, path) in request.files.iter().zip(&paths) {
        let sha = api
            .create_blob(repo, &file.content, &token)
            .await
            .map_err(at(Stage::CreateBlob))?;
        log::debug!("blob {} for {}", sha, path);
        entries.push(FileEntry::blob(path, sha));
    }

    let base_tree = api
        .get_commit_tree(repo, &tip, &token)
        .await
        .map_err(at(Stage::ReadCommit))?;

    let tree = api
        .create_tree(repo, &base_tree, &entries, &token)
        .await
        .map_err(at(Stage::CreateTree))?;
    log::debug!("tree {} on base {}", tree, base_tree);

    let commit = api
        .create_commit(repo, &request.commit_message(), &tree, &tip, &token)
        .await
        .map_err(at(Stage::CreateCommit))?;

    api.update_branch(repo, &request.branch, &commit, &token)
        .await
        .map_err(at(Stage::UpdateRef))?;
    log::info!("{} now at {} ({})", request.branch, commit, request.problem);

    let difficulty = request.difficulty.as_deref().map(Difficulty::parse);
    if let Err(source) = Stats::record(store, &request.problem, &commit, difficulty.as_ref()) {
        log::warn!("{} committed as {} but stats not recorded", request.problem, commit);
        return Err(CommitError::StatsNotRecorded { commit, source });
    }

    Ok(commit)
}

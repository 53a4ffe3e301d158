//! core::types
//!
//! Strong types for the identifiers that flow into remote calls.
//!
//! # Types
//!
//! - [`RepoSlug`] - GitHub repository identifier (`owner/name`)
//! - [`BranchName`] - Validated Git branch name
//! - [`TreePath`] - Slash-separated path of a file inside the commit tree
//!
//! # Validation
//!
//! These types enforce validity at construction time, so a malformed
//! identifier is rejected locally instead of producing a confusing
//! remote error halfway through a commit.
//!
//! # Examples
//!
//! ```
//! use leethub::core::types::{BranchName, RepoSlug, TreePath};
//!
//! let repo = RepoSlug::parse("octocat/solutions").unwrap();
//! assert_eq!(repo.owner(), "octocat");
//!
//! let branch = BranchName::new("main").unwrap();
//! assert_eq!(branch.as_str(), "main");
//!
//! let path = TreePath::join("0001-two-sum", "README.md").unwrap();
//! assert_eq!(path.as_str(), "0001-two-sum/README.md");
//!
//! assert!(BranchName::new("invalid..name").is_err());
//! assert!(RepoSlug::parse("no-slash").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid repository: {0}")]
    InvalidRepo(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),
}

/// A GitHub repository identifier.
///
/// Accepts the short `owner/name` form as well as GitHub remote URLs:
/// - `git@github.com:owner/repo.git`
/// - `https://github.com/owner/repo.git`
/// - `https://github.com/owner/repo`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoSlug {
    owner: String,
    name: String,
}

impl RepoSlug {
    /// Parse a repository identifier.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRepo` if the value is not `owner/name`
    /// or a recognizable GitHub URL.
    pub fn parse(value: &str) -> Result<Self, TypeError> {
        let value = value.trim();
        if let Some((owner, name)) = parse_github_url(value) {
            return Self::from_parts(&owner, &name);
        }

        let mut parts = value.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) => Self::from_parts(owner, name),
            _ => Err(TypeError::InvalidRepo(format!(
                "expected 'owner/name', got '{}'",
                value
            ))),
        }
    }

    fn from_parts(owner: &str, name: &str) -> Result<Self, TypeError> {
        if owner.is_empty() || name.is_empty() {
            return Err(TypeError::InvalidRepo(
                "owner and name cannot be empty".into(),
            ));
        }
        for part in [owner, name] {
            if part.chars().any(|c| c.is_whitespace() || c.is_ascii_control()) {
                return Err(TypeError::InvalidRepo(format!(
                    "'{}' contains whitespace or control characters",
                    part
                )));
            }
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Repository owner (user or organization).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl TryFrom<String> for RepoSlug {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<RepoSlug> for String {
    fn from(slug: RepoSlug) -> Self {
        slug.to_string()
    }
}

impl std::str::FromStr for RepoSlug {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Parse a GitHub remote URL into (owner, repo).
///
/// Returns `None` for anything that is not a github.com URL.
pub fn parse_github_url(url: &str) -> Option<(String, String)> {
    let path = if let Some(rest) = url.strip_prefix("git@github.com:") {
        rest
    } else if let Some(rest) = url.strip_prefix("https://github.com/") {
        rest
    } else if let Some(rest) = url.strip_prefix("http://github.com/") {
        rest
    } else {
        return None;
    };

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let (owner, repo) = path.split_once('/')?;

    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }

    Some((owner.to_string(), repo.to_string()))
}

/// Branch used when none is configured.
pub const DEFAULT_BRANCH: &str = "main";

/// A validated Git branch name.
///
/// Branch names must conform to Git's refname rules (see `git check-ref-format`):
/// - Cannot be empty
/// - Cannot start with `.` or `-`
/// - Cannot end with `.lock` or `/`
/// - Cannot contain `..`, `@{`, `//`, or ASCII control characters
/// - Cannot contain spaces, `~`, `^`, `:`, `\`, `?`, `*`, `[`
/// - Cannot be exactly `@`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates Git's refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot be empty".into(),
            ));
        }
        if name == "@" {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot be '@' (reserved)".into(),
            ));
        }
        if name.starts_with('.') || name.starts_with('-') {
            return Err(TypeError::InvalidBranchName(format!(
                "branch name cannot start with '{}'",
                &name[..1]
            )));
        }
        if name.ends_with(".lock") || name.ends_with('/') {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot end with '.lock' or '/'".into(),
            ));
        }

        for pattern in ["..", "@{", "//"] {
            if name.contains(pattern) {
                return Err(TypeError::InvalidBranchName(format!(
                    "branch name cannot contain '{pattern}'"
                )));
            }
        }

        const INVALID_CHARS: [char; 8] = [' ', '~', '^', ':', '\\', '?', '*', '['];
        if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
            return Err(TypeError::InvalidBranchName(format!(
                "branch name cannot contain '{c}'"
            )));
        }
        if name.chars().any(|c| c.is_ascii_control()) {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot contain control characters".into(),
            ));
        }

        for component in name.split('/') {
            if component.starts_with('.') {
                return Err(TypeError::InvalidBranchName(
                    "path component cannot start with '.'".into(),
                ));
            }
            if component.ends_with(".lock") {
                return Err(TypeError::InvalidBranchName(
                    "path component cannot end with '.lock'".into(),
                ));
            }
        }

        Ok(())
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BranchName {
    /// The conventional default branch, `main`.
    fn default() -> Self {
        Self(DEFAULT_BRANCH.to_string())
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Path of a file inside the commit tree, `{directory}/{filename}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreePath(String);

impl TreePath {
    /// Join a target directory and a filename.
    ///
    /// Leading and trailing slashes on the directory are dropped, and an
    /// empty directory puts the file at the repository root.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidPath` for an empty filename, a filename
    /// containing `/`, or any `.`/`..`/empty path component.
    pub fn join(directory: &str, filename: &str) -> Result<Self, TypeError> {
        if filename.is_empty() {
            return Err(TypeError::InvalidPath("filename cannot be empty".into()));
        }
        if filename.contains('/') {
            return Err(TypeError::InvalidPath(format!(
                "filename '{}' cannot contain '/'",
                filename
            )));
        }

        let directory = directory.trim_matches('/');
        let path = if directory.is_empty() {
            filename.to_string()
        } else {
            format!("{}/{}", directory, filename)
        };

        for component in path.split('/') {
            if component.is_empty() || component == "." || component == ".." {
                return Err(TypeError::InvalidPath(format!(
                    "'{}' has an empty, '.' or '..' component",
                    path
                )));
            }
        }

        Ok(Self(path))
    }

    /// Get the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TreePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing so a bad repository or branch
//! is reported when the file is loaded, not halfway through a commit.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::{BranchName, RepoSlug};

/// Configuration file contents.
///
/// # Example
///
/// ```toml
/// repo = "octocat/leetcode-solutions"
/// branch = "main"
/// api_base = "https://api.github.com"
/// timeout_secs = 30
///
/// [store]
/// path = "/home/octocat/.leethub/store.json"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Target repository (`owner/name` or GitHub URL)
    pub repo: Option<String>,

    /// Target branch
    pub branch: Option<String>,

    /// GitHub API base URL
    pub api_base: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Local store settings
    pub store: Option<StoreConfig>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(repo) = &self.repo {
            RepoSlug::parse(repo).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        }

        if let Some(branch) = &self.branch {
            BranchName::new(branch).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        }

        if let Some(api_base) = &self.api_base {
            if !(api_base.starts_with("https://") || api_base.starts_with("http://")) {
                return Err(ConfigError::InvalidValue(format!(
                    "api_base '{}' must be an http(s) URL",
                    api_base
                )));
            }
        }

        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Local store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Path to the JSON store file
    pub path: Option<PathBuf>,
}

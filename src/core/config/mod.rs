//! core::config
//!
//! Configuration schema and loading.
//!
//! # Locations
//!
//! Searched in order, first existing file wins:
//! 1. An explicit `--config <path>`
//! 2. `$LEETHUB_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/leethub/config.toml`
//! 4. `~/.leethub/config.toml` (canonical write location)
//!
//! A missing file is not an error; defaults apply.
//!
//! # Example
//!
//! ```no_run
//! use leethub::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("Branch: {}", config.branch());
//! println!("API: {}", config.api_base());
//! ```

pub mod schema;

pub use schema::{ConfigFile, StoreConfig};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::core::types::{BranchName, RepoSlug};
use crate::forge::github::DEFAULT_API_BASE;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Keys accepted by [`Config::get_value`] and [`Config::set_value`].
pub const KEYS: &[&str] = &["repo", "branch", "api_base", "timeout_secs", "store.path"];

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("unknown config key '{0}'")]
    UnknownKey(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Loaded configuration with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Raw file contents
    pub file: ConfigFile,
    /// Path the config was loaded from, if any
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path that does not exist is an error; the implicit
    /// locations are optional.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read,
    /// parsed, or validated.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }

        match Self::discover() {
            Some(path) => Self::from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load and validate a specific config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        log::debug!("loaded config from {}", path.display());
        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// Find the first existing config file in the implicit locations.
    fn discover() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("LEETHUB_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            log::warn!(
                "LEETHUB_CONFIG points at {} which does not exist; ignoring",
                path.display()
            );
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("leethub/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        dirs::home_dir()
            .map(|home| home.join(".leethub/config.toml"))
            .filter(|path| path.exists())
    }

    /// Get the canonical config path, `~/.leethub/config.toml`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".leethub/config.toml"))
    }

    /// Path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write a config file atomically.
    ///
    /// Creates parent directories if needed.
    pub fn write(path: &Path, file: &ConfigFile) -> Result<(), ConfigError> {
        file.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(file).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut tmp = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;
        tmp.write_all(contents.as_bytes())
            .and_then(|_| tmp.sync_all())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    // =========================================================================
    // Accessors with defaults
    // =========================================================================

    /// Configured target repository, if any.
    pub fn repo(&self) -> Option<RepoSlug> {
        self.file
            .repo
            .as_deref()
            .and_then(|r| RepoSlug::parse(r).ok())
    }

    /// Target branch. Defaults to `main`.
    pub fn branch(&self) -> BranchName {
        self.file
            .branch
            .as_deref()
            .and_then(|b| BranchName::new(b).ok())
            .unwrap_or_default()
    }

    /// GitHub API base URL. Defaults to `https://api.github.com`.
    pub fn api_base(&self) -> &str {
        self.file.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    /// Per-request timeout. Defaults to 30 seconds.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Configured store path, if overridden.
    pub fn store_path(&self) -> Option<&Path> {
        self.file.store.as_ref().and_then(|s| s.path.as_deref())
    }

    /// Get a value by key as it appears in the file.
    pub fn get_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let value = match key {
            "repo" => self.file.repo.clone(),
            "branch" => self.file.branch.clone(),
            "api_base" => self.file.api_base.clone(),
            "timeout_secs" => self.file.timeout_secs.map(|t| t.to_string()),
            "store.path" => self.store_path().map(|p| p.display().to_string()),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// Set a value by key, validating the result.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut file = self.file.clone();
        match key {
            "repo" => file.repo = Some(value.to_string()),
            "branch" => file.branch = Some(value.to_string()),
            "api_base" => file.api_base = Some(value.to_string()),
            "timeout_secs" => {
                let secs = value.parse::<u64>().map_err(|_| {
                    ConfigError::InvalidValue(format!("timeout_secs '{}' is not a number", value))
                })?;
                file.timeout_secs = Some(secs);
            }
            "store.path" => {
                file.store = Some(StoreConfig {
                    path: Some(PathBuf::from(value)),
                })
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        file.validate()?;
        self.file = file;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert!(config.repo().is_none());
        assert_eq!(config.branch().as_str(), "main");
        assert_eq!(config.api_base(), "https://api.github.com");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.store_path().is_none());
        assert!(config.loaded_from().is_none());
    }

    #[test]
    fn load_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
            repo = "octocat/solutions"
            branch = "solutions"
            timeout_secs = 5
            "#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.repo().unwrap().to_string(), "octocat/solutions");
        assert_eq!(config.branch().as_str(), "solutions");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.loaded_from(), Some(path.as_path()));
    }

    #[test]
    fn explicit_missing_path_is_error() {
        let temp = TempDir::new().unwrap();
        let result = Config::load(Some(&temp.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn invalid_values_rejected_on_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "branch = \"invalid..name\"").unwrap();

        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "unknown_field = true").unwrap();

        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn write_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/config.toml");

        let mut config = Config::default();
        config.set_value("repo", "o/r").unwrap();
        config.set_value("store.path", "/tmp/leethub.json").unwrap();
        Config::write(&path, &config.file).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.get_value("repo").unwrap().as_deref(), Some("o/r"));
        assert_eq!(
            loaded.store_path(),
            Some(Path::new("/tmp/leethub.json"))
        );
    }

    #[test]
    fn set_value_validates() {
        let mut config = Config::default();
        assert!(config.set_value("branch", "has space").is_err());
        assert!(config.set_value("timeout_secs", "soon").is_err());
        assert!(matches!(
            config.set_value("color", "blue"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(config.file.branch.is_none());
    }

    #[test]
    fn get_value_unset_is_none() {
        let config = Config::default();
        for key in KEYS {
            assert_eq!(config.get_value(key).unwrap(), None, "{key}");
        }
    }
}

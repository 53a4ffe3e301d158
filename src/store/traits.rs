//! store::traits
//!
//! Local key-value store trait definition.
//!
//! # Design
//!
//! The `Store` trait is a flat key -> JSON value map. Two keys are used
//! by the commit pipeline:
//!
//! - [`TOKEN_KEY`] holds the GitHub token as a JSON string
//! - [`STATS_KEY`] holds the per-problem stats object
//!
//! Access is unlocked: concurrent writers race and the last write wins.
//!
//! # Security
//!
//! Implementations MUST never log, print, or include stored values in
//! error messages, since the token lives in the same store.

use serde_json::Value;
use thiserror::Error;

/// Key holding the GitHub token.
pub const TOKEN_KEY: &str = "leethub_token";

/// Key holding the stats object.
pub const STATS_KEY: &str = "stats";

/// Errors from local store operations.
///
/// Note: Error messages intentionally do not include stored values.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read from the store.
    #[error("failed to read store: {0}")]
    ReadError(String),

    /// Failed to write to the store.
    #[error("failed to write store: {0}")]
    WriteError(String),

    /// A value exists but has the wrong shape for its key.
    #[error("invalid value for '{key}': {message}")]
    InvalidValue {
        /// The key whose value is malformed
        key: String,
        /// What was wrong with it
        message: String,
    },
}

/// Trait for local key-value stores.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait Store: Send + Sync {
    /// Get a value by key.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Set a value, overwriting any existing value for the key.
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Delete a value.
    ///
    /// Returns `Ok(())` even if the key did not exist.
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Get a string value.
    ///
    /// A present but empty string is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidValue` if the value is not a string.
    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.get(key)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(StoreError::InvalidValue {
                key: key.to_string(),
                message: "expected a string".into(),
            }),
        }
    }

    /// Check if a key exists.
    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

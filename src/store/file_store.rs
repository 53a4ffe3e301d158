//! store::file_store
//!
//! File-backed key-value store.
//!
//! # Format
//!
//! The whole store is one JSON object at `~/.leethub/store.json`:
//!
//! ```json
//! {
//!   "leethub_token": "ghp_...",
//!   "stats": { "two-sum": { "lastCommitSha": "..." } }
//! }
//! ```
//!
//! # Security
//!
//! - File permissions are set to 0600 on Unix (owner read/write only)
//! - All writes are atomic (write to temp file, then rename)
//! - Values are NEVER logged, printed, or included in error messages

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use serde_json::{Map, Value};

use super::traits::{Store, StoreError};

/// File-backed store.
///
/// Every operation re-reads the file, so separate processes observe each
/// other's writes. There is no locking; the last writer wins.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store at the default location, `~/.leethub/store.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, StoreError> {
        Ok(Self {
            path: Self::default_path()?,
        })
    }

    /// Create a store at a custom path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The default store location.
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let home = dirs::home_dir()
            .ok_or_else(|| StoreError::ReadError("cannot determine home directory".into()))?;
        Ok(home.join(".leethub").join("store.json"))
    }

    /// Get the path to the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>, StoreError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::ReadError(format!("cannot read store file: {}", e)))?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        // Only the error category is reported; serde_json messages can echo input.
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StoreError::ReadError(
                "store file is not a JSON object".into(),
            )),
            Err(e) => Err(StoreError::ReadError(format!(
                "cannot parse store file (line {}, column {})",
                e.line(),
                e.column()
            ))),
        }
    }

    fn write_all(&self, values: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::WriteError(format!("cannot create directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(values)
            .map_err(|e| StoreError::WriteError(format!("cannot serialize store: {}", e)))?;

        let temp_path = self.path.with_extension("json.tmp");
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| StoreError::WriteError(format!("cannot create temp file: {}", e)))?;

            // Restrict permissions before any content is written
            #[cfg(unix)]
            {
                file.set_permissions(fs::Permissions::from_mode(0o600))
                    .map_err(|e| {
                        StoreError::WriteError(format!("cannot set permissions: {}", e))
                    })?;
            }

            file.write_all(content.as_bytes())
                .map_err(|e| StoreError::WriteError(format!("cannot write store: {}", e)))?;
            file.sync_all()
                .map_err(|e| StoreError::WriteError(format!("cannot sync to disk: {}", e)))?;
        }

        fs::rename(&temp_path, &self.path)
            .map_err(|e| StoreError::WriteError(format!("cannot rename temp file: {}", e)))?;

        Ok(())
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value);
        self.write_all(&values)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.read_all()?;
        if values.remove(key).is_none() {
            return Ok(());
        }
        self.write_all(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, FileStore) {
        let temp = TempDir::new().expect("create temp dir");
        let store = FileStore::with_path(temp.path().join("store.json"));
        (temp, store)
    }

    #[test]
    fn get_nonexistent_returns_none() {
        let (_temp, store) = create_test_store();
        assert!(store.get("nonexistent").expect("get").is_none());
    }

    #[test]
    fn set_and_get() {
        let (_temp, store) = create_test_store();
        store.set("leethub_token", json!("ghp_test")).expect("set");
        assert_eq!(
            store.get_string("leethub_token").expect("get").as_deref(),
            Some("ghp_test")
        );
    }

    #[test]
    fn nested_objects_roundtrip() {
        let (_temp, store) = create_test_store();
        let stats = json!({ "two-sum": { "lastCommitSha": "abc" } });
        store.set("stats", stats.clone()).expect("set");
        assert_eq!(store.get("stats").expect("get"), Some(stats));
    }

    #[test]
    fn set_preserves_other_keys() {
        let (_temp, store) = create_test_store();
        store.set("a", json!(1)).expect("set a");
        store.set("b", json!(2)).expect("set b");
        assert_eq!(store.get("a").expect("get"), Some(json!(1)));
    }

    #[test]
    fn delete_existing_and_missing() {
        let (_temp, store) = create_test_store();
        store.set("key", json!("value")).expect("set");
        store.delete("key").expect("delete");
        assert!(store.get("key").expect("get").is_none());
        store.delete("nonexistent").expect("delete nonexistent");
    }

    #[test]
    fn creates_directory_if_missing() {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("subdir").join("store.json");
        let store = FileStore::with_path(path.clone());

        store.set("key", json!("value")).expect("set");
        assert!(path.exists());
    }

    #[test]
    fn empty_file_is_empty_store() {
        let (_temp, store) = create_test_store();
        fs::write(store.path(), "").expect("write");
        assert!(store.get("key").expect("get").is_none());
    }

    #[test]
    fn parse_error_does_not_echo_content() {
        let (_temp, store) = create_test_store();
        fs::write(store.path(), "{\"leethub_token\": \"ghp_secret").expect("write");

        let err = store.get("key").unwrap_err().to_string();
        assert!(err.contains("cannot parse"), "{}", err);
        assert!(!err.contains("ghp_secret"), "{}", err);
    }

    #[test]
    fn non_object_file_rejected() {
        let (_temp, store) = create_test_store();
        fs::write(store.path(), "[1, 2]").expect("write");
        assert!(matches!(store.get("key"), Err(StoreError::ReadError(_))));
    }

    #[cfg(unix)]
    #[test]
    fn permissions_0600_on_unix() {
        let (_temp, store) = create_test_store();
        store.set("key", json!("value")).expect("set");

        let mode = fs::metadata(store.path())
            .expect("metadata")
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(mode, 0o600, "permissions should be 0600");
    }

    #[test]
    fn persistence_across_instances() {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("store.json");

        FileStore::with_path(path.clone())
            .set("key", json!("value"))
            .expect("set");

        let result = FileStore::with_path(path).get("key").expect("get");
        assert_eq!(result, Some(json!("value")));
    }
}

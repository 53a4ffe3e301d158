//! store::memory
//!
//! In-memory store for tests and embedding.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use super::traits::{Store, StoreError};

/// In-memory store.
///
/// Clones share the same map. Reads and writes are counted so tests can
/// assert how the store was used.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    values: HashMap<String, Value>,
    reads: usize,
    writes: usize,
    fail_writes: bool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the given entries.
    pub fn with_values<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let store = Self::new();
        {
            let mut inner = store.inner.lock().unwrap();
            inner.values = values.into_iter().map(|(k, v)| (k.into(), v)).collect();
        }
        store
    }

    /// Make every `set` and `delete` fail with `WriteError`.
    pub fn fail_writes(self) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_writes = true;
        }
        self
    }

    /// Number of `get` calls so far.
    pub fn reads(&self) -> usize {
        self.inner.lock().unwrap().reads
    }

    /// Number of `set`/`delete` calls so far.
    pub fn writes(&self) -> usize {
        self.inner.lock().unwrap().writes
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.reads += 1;
        Ok(inner.values.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.writes += 1;
        if inner.fail_writes {
            return Err(StoreError::WriteError(format!("write to '{}' refused", key)));
        }
        inner.values.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.writes += 1;
        if inner.fail_writes {
            return Err(StoreError::WriteError(format!("delete of '{}' refused", key)));
        }
        inner.values.remove(key);
        Ok(())
    }
}

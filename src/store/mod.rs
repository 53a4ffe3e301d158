//! store
//!
//! Local key-value storage for the token and the stats record.
//!
//! # Architecture
//!
//! Everything the pipeline persists goes through the [`Store`] trait:
//!
//! - [`FileStore`]: one JSON file at `~/.leethub/store.json` (default)
//! - [`MemoryStore`]: in-process map for tests and embedding
//!
//! # Example
//!
//! ```
//! use leethub::store::{MemoryStore, Store, TOKEN_KEY};
//! use serde_json::json;
//!
//! let store = MemoryStore::new();
//! store.set(TOKEN_KEY, json!("ghp_xxxx")).unwrap();
//! assert!(store.get_string(TOKEN_KEY).unwrap().is_some());
//! ```

mod file_store;
mod memory;
mod traits;

pub use file_store::FileStore;
pub use memory::MemoryStore;
pub use traits::{Store, StoreError, STATS_KEY, TOKEN_KEY};

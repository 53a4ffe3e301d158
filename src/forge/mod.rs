//! forge
//!
//! Remote Git Data access (GitHub).
//!
//! # Architecture
//!
//! The [`GitDataApi`] trait is the seam between the commit pipeline and
//! the network. Production code uses [`github::GitHubGitData`]; tests use
//! [`mock::MockGitData`], which records every call and keeps an in-memory
//! object database.
//!
//! # Modules
//!
//! - `traits`: `GitDataApi`, `ForgeError`, and `FileEntry`
//! - [`github`]: REST implementation over reqwest
//! - [`mock`]: deterministic in-memory implementation

pub mod github;
pub mod mock;
mod traits;

pub use traits::*;

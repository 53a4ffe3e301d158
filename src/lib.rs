//! leethub - commit solved coding problems to a GitHub repository
//!
//! leethub takes a problem's solution files, writes them into a GitHub
//! repository as a single commit through the Git Data REST API, moves the
//! target branch to that commit, and records the commit in a per-problem
//! stats object kept in a local key-value store.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - The commit pipeline: blobs, tree, commit, ref update, stats
//! - [`core`] - Domain types, stats records, and configuration
//! - [`forge`] - Git Data API abstraction with GitHub and mock backends
//! - [`store`] - Key-value store for the token and stats
//!
//! # Guarantees
//!
//! 1. No remote call is made without a stored token
//! 2. Each push produces exactly one commit whose parent is the branch tip
//! 3. The branch is only ever fast-forwarded
//! 4. Stats are written only after the branch points at the new commit

pub mod cli;
pub mod core;
pub mod engine;
pub mod forge;
pub mod store;

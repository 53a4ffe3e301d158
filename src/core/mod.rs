//! core
//!
//! Core domain types, records, and configuration.
//!
//! # Modules
//!
//! - [`types`] - Strong types: RepoSlug, BranchName, TreePath
//! - [`stats`] - Per-problem commit records and difficulty counts
//! - [`config`] - Configuration schema and loading

pub mod config;
pub mod stats;
pub mod types;

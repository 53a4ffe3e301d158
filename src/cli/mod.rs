//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Does NOT talk to GitHub directly
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! handlers that wire the GitHub client and the file store into
//! [`crate::engine`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use crate::engine;
use anyhow::Result;

/// Run the CLI application with already-parsed arguments.
///
/// This is the main entry point called from `main.rs`.
pub fn run(cli: Cli) -> Result<()> {
    let ctx = engine::Context {
        config_path: cli.config.clone(),
        quiet: cli.quiet,
        interactive: cli.interactive(),
    };

    commands::dispatch(cli.command, &ctx)
}

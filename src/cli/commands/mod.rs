//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads configuration and opens the store
//! 2. Calls the engine to execute the command
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! `push` is async because it involves network I/O. The handler builds a
//! tokio runtime and blocks on the engine future.

mod auth;
mod completion;
mod config_cmd;
mod push;
mod stats;

pub use auth::{auth, validate_token};
pub use completion::completion;
pub use config_cmd::{get as config_get, list as config_list, set as config_set};
pub use push::push;
pub use stats::stats;

use crate::cli::args::{Command, ConfigAction};
use crate::core::config::Config;
use crate::engine::Context;
use crate::store::FileStore;
use anyhow::{Context as _, Result};

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Auth {
            token,
            status,
            logout,
        } => auth::auth(ctx, token.as_deref(), status, logout),
        Command::Push {
            problem,
            repo,
            branch,
            dir,
            difficulty,
            message,
            files,
        } => push::push(
            ctx,
            push::PushArgs {
                problem,
                repo,
                branch,
                dir,
                difficulty,
                message,
                files,
            },
        ),
        Command::Stats { json } => stats::stats(ctx, json),
        Command::Config { action } => match action {
            ConfigAction::Get { key } => config_cmd::get(ctx, &key),
            ConfigAction::Set { key, value } => config_cmd::set(ctx, &key, &value),
            ConfigAction::List => config_cmd::list(ctx),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Load configuration honoring `--config`.
fn load_config(ctx: &Context) -> Result<Config> {
    Config::load(ctx.config_path.as_deref()).context("Failed to load config")
}

/// Open the file store at the configured path, or the default one.
fn open_store(config: &Config) -> Result<FileStore> {
    match config.store_path() {
        Some(path) => Ok(FileStore::with_path(path)),
        None => FileStore::new().context("Failed to locate store"),
    }
}

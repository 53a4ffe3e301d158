//! cli::commands::auth
//!
//! Stores the GitHub token the push pipeline reads.
//!
//! The token is written under the `leethub_token` store key and is
//! never printed, in full or in part.
//!
//! # Example
//!
//! ```bash
//! # Interactive (prompts for token)
//! leethub auth
//!
//! # Non-interactive
//! leethub auth --token ghp_xxxx
//!
//! # Check status
//! leethub auth --status
//!
//! # Remove stored token
//! leethub auth --logout
//! ```

use super::{load_config, open_store};
use crate::engine::Context;
use crate::store::{Store, TOKEN_KEY};
use anyhow::{bail, Context as _, Result};
use serde_json::Value;
use std::io::{self, Write};

/// Run the auth command.
///
/// # Arguments
///
/// * `ctx` - Engine context with interactive flag
/// * `token` - Optional token provided via --token flag
/// * `status` - If true, show authentication status instead of storing
/// * `logout` - If true, remove stored authentication
pub fn auth(ctx: &Context, token: Option<&str>, status: bool, logout: bool) -> Result<()> {
    let config = load_config(ctx)?;
    let store = open_store(&config)?;

    if status {
        return show_status(&store, ctx.quiet);
    }

    if logout {
        return do_logout(&store, ctx.quiet);
    }

    let token_value = get_token(ctx, token)?;
    validate_token(&token_value)?;

    store
        .set(TOKEN_KEY, Value::String(token_value))
        .context("Failed to store token")?;
    log::debug!("stored token in {}", store.path().display());

    if !ctx.quiet {
        println!("Token saved.");
    }

    Ok(())
}

/// Show authentication status.
fn show_status(store: &dyn Store, quiet: bool) -> Result<()> {
    let exists = store.get_string(TOKEN_KEY)?.is_some();

    if quiet {
        // Machine-readable output
        if exists {
            println!("authenticated");
        } else {
            println!("not_authenticated");
        }
    } else if exists {
        println!("A GitHub token is stored.");
    } else {
        println!("No GitHub token stored.");
        println!("Run 'leethub auth' to add one.");
    }

    Ok(())
}

/// Remove stored authentication.
fn do_logout(store: &dyn Store, quiet: bool) -> Result<()> {
    store
        .delete(TOKEN_KEY)
        .context("Failed to remove stored token")?;

    if !quiet {
        println!("Token removed.");
    }

    Ok(())
}

/// Get token from argument or interactive prompt.
fn get_token(ctx: &Context, token_arg: Option<&str>) -> Result<String> {
    if let Some(t) = token_arg {
        return Ok(t.trim().to_string());
    }

    if ctx.quiet || !ctx.interactive {
        bail!("Token required. Use --token <TOKEN> or run interactively.");
    }

    print!("GitHub Personal Access Token: ");
    io::stdout().flush()?;

    let token = rpassword::read_password().context("Failed to read token")?;
    Ok(token.trim().to_string())
}

/// Basic format checks; the token is not checked against the API.
pub fn validate_token(token: &str) -> Result<()> {
    if token.is_empty() {
        bail!("Token cannot be empty.");
    }

    if token.len() < 10 {
        bail!("Token appears to be too short.");
    }

    if token.contains(char::is_whitespace) {
        bail!("Token should not contain whitespace.");
    }

    Ok(())
}

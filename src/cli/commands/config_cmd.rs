//! config command - Get, set, or list configuration values

use super::load_config;
use crate::core::config::{Config, KEYS};
use crate::engine::Context;
use anyhow::{Context as _, Result};

/// Get a configuration value. Unset keys print nothing.
pub fn get(ctx: &Context, key: &str) -> Result<()> {
    let config = load_config(ctx)?;

    if let Some(value) = config.get_value(key)? {
        println!("{}", value);
    }
    Ok(())
}

/// Set a configuration value and write the file back.
///
/// Writes to the file the config was loaded from, `--config` if given,
/// or `~/.leethub/config.toml`.
pub fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut config = match &ctx.config_path {
        Some(path) if !path.exists() => Config::default(),
        _ => load_config(ctx)?,
    };
    config.set_value(key, value)?;

    let path = match (&ctx.config_path, config.loaded_from()) {
        (Some(explicit), _) => explicit.clone(),
        (None, Some(loaded)) => loaded.to_path_buf(),
        (None, None) => Config::default_path()?,
    };
    Config::write(&path, &config.file).context("Failed to write config")?;
    log::debug!("wrote config to {}", path.display());

    if !ctx.quiet {
        println!("Set {} = {}", key, value);
    }

    Ok(())
}

/// List all configuration values.
pub fn list(ctx: &Context) -> Result<()> {
    let config = load_config(ctx)?;

    if !ctx.quiet {
        match config.loaded_from() {
            Some(path) => println!("# {}", path.display()),
            None => println!("# (no config file, showing defaults)"),
        }
    }

    for key in KEYS {
        let value = match config.get_value(key)? {
            Some(v) => v,
            None => effective_default(&config, key),
        };
        println!("{} = {}", key, value);
    }

    Ok(())
}

fn effective_default(config: &Config, key: &str) -> String {
    match key {
        "branch" => config.branch().to_string(),
        "api_base" => config.api_base().to_string(),
        "timeout_secs" => config.timeout().as_secs().to_string(),
        _ => "(not set)".to_string(),
    }
}

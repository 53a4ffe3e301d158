//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--config <path>`: Use this config file instead of the default locations
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output, no prompts

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// leethub - commit solved problems to a GitHub repository
#[derive(Parser, Debug)]
#[command(name = "leethub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; disables prompts
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Prompts are allowed when not quiet and stdin is a terminal.
    pub fn interactive(&self) -> bool {
        !self.quiet && std::io::stdin().is_terminal()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store, inspect, or remove the GitHub token
    #[command(
        name = "auth",
        after_help = "\
EXAMPLES:
    # Prompt for the token (input is hidden)
    leethub auth

    # Non-interactive
    leethub auth --token ghp_xxxx

    # Check whether a token is stored
    leethub auth --status"
    )]
    Auth {
        /// Token to store (prompted for when omitted)
        #[arg(long, conflicts_with_all = ["status", "logout"])]
        token: Option<String>,

        /// Show whether a token is stored
        #[arg(long, conflicts_with = "logout")]
        status: bool,

        /// Remove the stored token
        #[arg(long)]
        logout: bool,
    },

    /// Commit solution files to the configured repository
    #[command(
        name = "push",
        long_about = "Commit solution files to a GitHub repository.\n\n\
            Each FILE is uploaded under DIR using its file name. The commit is \
            created on top of the branch tip and the branch is fast-forwarded to it. \
            The new commit SHA is printed and recorded in the problem's stats.",
        after_help = "\
EXAMPLES:
    leethub push --problem two-sum --dir 0001-two-sum --difficulty Easy \\
        README.md two_sum.py

    # Explicit repository and branch, custom message
    leethub push --repo octocat/solutions --branch solutions \\
        --problem two-sum -m \"Faster two-sum\" two_sum.py"
    )]
    Push {
        /// Problem name (keys the stats record)
        #[arg(long)]
        problem: String,

        /// Target repository as owner/name (defaults to config)
        #[arg(long)]
        repo: Option<String>,

        /// Target branch (defaults to config, then main)
        #[arg(long)]
        branch: Option<String>,

        /// Directory inside the repository (defaults to the problem name)
        #[arg(long)]
        dir: Option<String>,

        /// Difficulty label (Easy, Medium, Hard)
        #[arg(long)]
        difficulty: Option<String>,

        /// Commit message
        #[arg(short, long)]
        message: Option<String>,

        /// Files to commit, in order
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Show recorded commits per problem
    Stats {
        /// Print the raw stats object as JSON
        #[arg(long)]
        json: bool,
    },

    /// Get, set, or list configuration values
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
    },
    /// List all configuration values
    List,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

//! push command - Commit solution files to the configured repository

use std::fs;
use std::path::PathBuf;

use super::{load_config, open_store};
use crate::core::config::Config;
use crate::core::types::{BranchName, RepoSlug};
use crate::engine::{commit_solution_files, CommitRequest, Context, SolutionFile};
use crate::forge::github::GitHubGitData;
use anyhow::{anyhow, bail, Context as _, Result};

/// Arguments for the push command.
#[derive(Debug, Clone)]
pub struct PushArgs {
    pub problem: String,
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub dir: Option<String>,
    pub difficulty: Option<String>,
    pub message: Option<String>,
    pub files: Vec<PathBuf>,
}

/// Commit the given files and print the new commit SHA.
pub fn push(ctx: &Context, args: PushArgs) -> Result<()> {
    let config = load_config(ctx)?;
    let request = build_request(&config, args)?;
    let store = open_store(&config)?;
    let api = GitHubGitData::with_timeout(config.api_base(), config.timeout())
        .context("Failed to create HTTP client")?;

    let rt = tokio::runtime::Runtime::new()?;
    let sha = rt.block_on(commit_solution_files(&api, &store, &request))?;

    if ctx.quiet {
        println!("{}", sha);
    } else {
        println!(
            "Committed {} file(s) for '{}' to {}@{}",
            request.files.len(),
            request.problem,
            request.repo,
            request.branch
        );
        println!("{}", sha);
    }

    Ok(())
}

/// Resolve flags against config and read the files from disk.
fn build_request(config: &Config, args: PushArgs) -> Result<CommitRequest> {
    let repo = match args.repo.as_deref() {
        Some(r) => RepoSlug::parse(r)?,
        None => config.repo().ok_or_else(|| {
            anyhow!("No repository configured. Use --repo or 'leethub config set repo <owner/name>'.")
        })?,
    };

    let branch = match args.branch.as_deref() {
        Some(b) => BranchName::new(b)?,
        None => config.branch(),
    };

    let directory = args.dir.unwrap_or_else(|| args.problem.clone());

    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("'{}' has no usable file name", path.display()))?;
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        files.push(SolutionFile::new(filename, content));
    }
    if files.is_empty() {
        bail!("No files given.");
    }

    Ok(CommitRequest {
        repo,
        branch,
        problem: args.problem,
        directory,
        files,
        difficulty: args.difficulty,
        message: args.message,
    })
}

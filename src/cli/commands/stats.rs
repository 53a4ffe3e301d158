//! stats command - Show recorded commits per problem

use super::{load_config, open_store};
use crate::core::stats::Stats;
use crate::engine::Context;
use anyhow::{Context as _, Result};

/// Print the stats table, or the raw object with `--json`.
pub fn stats(ctx: &Context, json: bool) -> Result<()> {
    let config = load_config(ctx)?;
    let store = open_store(&config)?;
    let stats = Stats::load(&store).context("Failed to read stats")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    print!("{}", render(&stats, ctx.quiet));
    Ok(())
}

fn render(stats: &Stats, quiet: bool) -> String {
    let mut out = String::new();

    if stats.is_empty() {
        if !quiet {
            out.push_str("No problems recorded yet.\n");
        }
        return out;
    }

    let width = stats.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, record) in stats.iter() {
        let sha = record
            .last_commit_sha
            .as_deref()
            .map(|s| s.get(..7).unwrap_or(s))
            .unwrap_or("-");
        let difficulty = record.difficulty.as_deref().unwrap_or("-");
        out.push_str(&format!("{:<width$}  {:<7}  {}\n", name, sha, difficulty));
    }

    if !quiet {
        let counts = stats.difficulty_counts();
        out.push_str(&format!(
            "\n{} problem(s): {} easy, {} medium, {} hard",
            counts.total(),
            counts.easy,
            counts.medium,
            counts.hard
        ));
        if counts.other > 0 {
            out.push_str(&format!(", {} other", counts.other));
        }
        out.push('\n');
    }

    out
}

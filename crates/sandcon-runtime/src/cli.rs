//! CLI definition using clap derive.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sandcon", about = "sandbox console log aggregator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay a JSON-lines event script and print the console panel
    Replay(ReplayOpts),
}

#[derive(clap::Args)]
pub struct ReplayOpts {
    /// Script path, or `-` for stdin
    pub script: PathBuf,

    /// Print the final snapshot as JSON
    #[arg(long)]
    pub json: bool,

    /// Stream change notifications to stdout as JSON lines while replaying
    #[arg(long)]
    pub follow: bool,

    /// Start the sandbox without a run prompt
    #[arg(long, env = "SANDCON_AUTORUN", default_value_t = true, action = ArgAction::Set)]
    pub autorun: bool,

    /// Render the console panel at all. On by default here, unlike
    /// `ConsoleOptions::default()`, since replay exists to show the console.
    #[arg(long, env = "SANDCON_SHOW_CONSOLE", default_value_t = true, action = ArgAction::Set)]
    pub show_console: bool,

    /// Initially visible files, comma separated
    #[arg(long, value_delimiter = ',', default_value = "/App.js")]
    pub files: Vec<String>,

    /// Expand the console panel before replaying
    #[arg(long)]
    pub open: bool,
}

const DEFAULT_LOG_FILTER: &str = "info";

/// Log filter: SANDCON_LOG, then RUST_LOG, then `info`.
pub fn log_filter() -> String {
    resolve_log_filter(
        std::env::var("SANDCON_LOG").ok(),
        std::env::var("RUST_LOG").ok(),
    )
}

fn resolve_log_filter(sandcon_log: Option<String>, rust_log: Option<String>) -> String {
    sandcon_log
        .or(rust_log)
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

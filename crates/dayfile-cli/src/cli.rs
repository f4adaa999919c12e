//! CLI command definitions and argument parsing.

use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Dayfile - File arriving data under dated directories and keep disks below their fill limit.
#[derive(Debug, Parser)]
#[command(name = "dayfile")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "DAYFILE_CONFIG", default_value = "dayfile.toml")]
    pub config: PathBuf,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log intended moves and deletions without touching the filesystem
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run placement and reclaim on their intervals until Ctrl+C
    Run,

    /// Run a single placement pass
    Organize,

    /// Run a single reclaim pass
    Reclaim,

    /// Print the dated directories under every base path as JSON
    List,

    /// Validate the configuration and summarize it
    Check,
}

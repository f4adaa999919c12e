//! Dayfile CLI - Keep dated data directories organized and disks below their fill limit.

use anyhow::Context;
use clap::Parser;
use dayfile_cli::commands;
use dayfile_cli::{Cli, Command, Formatter};
use dayfile_janitor::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let formatter = Formatter::new(cli.format, !cli.no_color);
    if let Err(e) = run(cli, &formatter).await {
        eprintln!("{}", formatter.error(&format!("{:#}", e)));
        std::process::exit(1);
    }
}

/// Log to stderr so command output on stdout stays parseable
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli, formatter: &Formatter) -> anyhow::Result<()> {
    let mut config = Config::from_file(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    tracing::debug!(
        "Loaded {} template(s), {} base path(s), {} disk(s) from {}",
        config.templates().len(),
        config.base_paths().len(),
        config.disks().len(),
        cli.config.display()
    );
    if cli.dry_run {
        config = config.with_dry_run(true);
    }

    match cli.command {
        Command::Run => commands::execute_run(config, formatter).await?,
        Command::Organize => commands::execute_organize(config, formatter).await?,
        Command::Reclaim => commands::execute_reclaim(config, formatter).await?,
        Command::List => commands::execute_list(config, formatter).await?,
        Command::Check => commands::execute_check(config, formatter).await?,
    }

    Ok(())
}

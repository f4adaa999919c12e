//! Organize command implementation.

use crate::error::Result;
use crate::output::Formatter;
use dayfile_janitor::{Config, JanitorWorker};
use tokio_util::sync::CancellationToken;

/// Execute the organize command: one placement pass, then print its report.
pub async fn execute_organize(config: Config, formatter: &Formatter) -> Result<()> {
    if config.dry_run() {
        println!("{}", formatter.info("Dry run: nothing will be moved or deleted"));
    }

    let worker = JanitorWorker::new(config);
    let report = worker.organize_once(&CancellationToken::new()).await?;

    println!("{}", formatter.placement_report(&report)?);
    Ok(())
}

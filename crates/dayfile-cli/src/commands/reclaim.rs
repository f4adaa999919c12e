//! Reclaim command implementation.

use crate::error::Result;
use crate::output::Formatter;
use dayfile_janitor::{Config, JanitorWorker};
use tokio_util::sync::CancellationToken;

/// Execute the reclaim command: one eviction pass, then print its report.
pub async fn execute_reclaim(config: Config, formatter: &Formatter) -> Result<()> {
    if config.disks().is_empty() {
        println!("{}", formatter.info("No disks configured"));
        return Ok(());
    }
    if config.dry_run() {
        println!("{}", formatter.info("Dry run: directories will only be reported"));
    }

    let worker = JanitorWorker::new(config);
    let report = worker.reclaim_once(&CancellationToken::new()).await?;

    println!("{}", formatter.reclaim_report(&report)?);
    Ok(())
}

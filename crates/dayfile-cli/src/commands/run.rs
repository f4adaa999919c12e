//! Run command implementation.

use crate::error::Result;
use crate::output::Formatter;
use dayfile_janitor::{Config, JanitorWorker};

/// Execute the run command.
///
/// Both passes run immediately, then repeat on their intervals until Ctrl+C.
pub async fn execute_run(config: Config, formatter: &Formatter) -> Result<()> {
    if config.dry_run() {
        println!("{}", formatter.info("Dry run: nothing will be moved or deleted"));
    }
    println!(
        "{}",
        formatter.info(&format!(
            "Watching {} base path(s) on {} disk(s); press Ctrl+C to stop",
            config.base_paths().len(),
            config.disks().len()
        ))
    );

    let worker = JanitorWorker::new(config);
    worker.run_until_ctrl_c().await?;

    println!("{}", formatter.metrics(&worker.metrics()));
    Ok(())
}

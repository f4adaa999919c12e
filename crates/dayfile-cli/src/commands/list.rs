//! List command implementation.

use crate::error::Result;
use crate::output::Formatter;
use dayfile_janitor::{describe_available, Config, DirectoryListing};

/// Collect the listing of every configured base path.
pub fn collect_listings(config: &Config) -> Result<Vec<DirectoryListing>> {
    config
        .base_paths()
        .iter()
        .map(|base_path| describe_available(base_path).map_err(Into::into))
        .collect()
}

/// Execute the list command.
pub async fn execute_list(config: Config, formatter: &Formatter) -> Result<()> {
    let listings = collect_listings(&config)?;
    println!("{}", formatter.listings(&listings)?);
    Ok(())
}

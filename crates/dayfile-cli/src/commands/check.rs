//! Check command implementation.

use crate::error::Result;
use crate::output::Formatter;
use dayfile_janitor::Config;

/// Execute the check command.
///
/// Loading already validated the configuration; this reports what was loaded
/// and warns about base paths that no disk covers.
pub async fn execute_check(config: Config, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.config_summary(&config));

    for base_path in uncovered_base_paths(&config) {
        println!(
            "{}",
            formatter.warning(&format!("{} is not on any configured disk", base_path))
        );
    }
    for base_path in config.base_paths() {
        if !base_path.is_dir() {
            println!(
                "{}",
                formatter.warning(&format!("{} does not exist or is not a directory", base_path.display()))
            );
        }
    }

    println!("{}", formatter.success("Configuration is valid"));
    Ok(())
}

/// Base paths that belong to no configured disk and are never evicted from.
fn uncovered_base_paths(config: &Config) -> Vec<String> {
    config
        .base_paths()
        .iter()
        .filter(|base_path| !config.disks().iter().any(|disk| disk.owns(base_path)))
        .map(|base_path| base_path.display().to_string())
        .collect()
}

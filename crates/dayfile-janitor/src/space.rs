//! Free-space measurement

use std::io;
use std::path::Path;

/// Source of free-space readings for a disk
///
/// The evictor calls this after every single deletion, so implementations
/// must measure, not cache.
pub trait SpaceProbe: Send + Sync {
    /// Free space on the filesystem holding `disk`, as a percentage of its capacity
    fn free_percent(&self, disk: &str) -> io::Result<f64>;
}

/// Probe backed by `statvfs` (via `fs2`)
///
/// Free space is the space available to unprivileged users, matching what
/// `df` reports as available.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatfsProbe;

impl SpaceProbe for StatfsProbe {
    fn free_percent(&self, disk: &str) -> io::Result<f64> {
        let path = Path::new(disk);
        let total = fs2::total_space(path)?;
        if total == 0 {
            return Err(io::Error::other(format!("{} reports zero capacity", disk)));
        }
        let available = fs2::available_space(path)?;
        Ok(available as f64 / total as f64 * 100.0)
    }
}

//! Error types for Janitor operations

use crate::config::ConfigError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort a placement or reclaim pass
///
/// Per-file conditions (unmatched names, unusable dates) never surface here;
/// they are logged and counted instead.
#[derive(Error, Debug)]
pub enum JanitorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Placement was requested without any file templates
    #[error("No file templates configured")]
    NoTemplates,

    /// Filesystem operation failed
    #[error("Failed to {action} {}: {source}", .path.display())]
    Io {
        /// What was being attempted
        action: &'static str,
        /// Path the operation targeted
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Free-space query failed
    #[error("Error getting free space for disk {disk}: {source}")]
    FreeSpace {
        /// Disk identifier that was queried
        disk: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// Worker error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}

impl JanitorError {
    /// Build a mapper from `std::io::Error` for use with `map_err`
    pub(crate) fn io(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| JanitorError::Io {
            action,
            path,
            source,
        }
    }
}

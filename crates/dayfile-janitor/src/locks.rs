//! Per-base-path mutual exclusion
//!
//! Placement and eviction share one [`BasePathLocks`]. Placement holds a base
//! path's lock while it processes that path; eviction holds it around each
//! directory deletion and its ancestor cleanup. No two core operations touch the
//! same leaf directory at the same time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock registry keyed by configured base path
#[derive(Debug, Default)]
pub struct BasePathLocks {
    locks: HashMap<PathBuf, Mutex<()>>,
}

impl BasePathLocks {
    /// Create one lock per base path
    pub fn new<'a>(base_paths: impl IntoIterator<Item = &'a PathBuf>) -> Self {
        Self {
            locks: base_paths
                .into_iter()
                .map(|p| (p.clone(), Mutex::new(())))
                .collect(),
        }
    }

    /// Block until `base_path` is free and take it
    ///
    /// Returns `None` for paths that were not registered. A lock poisoned by a
    /// panicking holder is recovered, since the guarded state is the filesystem.
    pub fn lock(&self, base_path: &Path) -> Option<MutexGuard<'_, ()>> {
        self.locks
            .get(base_path)
            .map(|m| m.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

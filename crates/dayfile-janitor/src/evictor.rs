//! Retention evictor - delete the oldest day directories until disks have room

use crate::inventory::{leaf_directories, LeafDirectory};
use crate::{BasePathLocks, Config, JanitorError, ReclaimReport, SpaceProbe, StatfsProbe};
use dayfile_domain::Disk;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Reclaims disk space by evicting day directories, oldest first
///
/// For each disk below its free-space target, one day directory is deleted at a
/// time and free space is measured again before the next, so the evictor never
/// deletes more than needed to cross the target once.
pub struct RetentionEvictor<P: SpaceProbe = StatfsProbe> {
    config: Arc<Config>,
    locks: Arc<BasePathLocks>,
    probe: P,
}

impl RetentionEvictor<StatfsProbe> {
    /// Create an evictor that measures real filesystems
    pub fn new(config: Arc<Config>, locks: Arc<BasePathLocks>) -> Self {
        Self::with_probe(config, locks, StatfsProbe)
    }
}

impl<P: SpaceProbe> RetentionEvictor<P> {
    /// Create an evictor with a custom free-space source
    pub fn with_probe(config: Arc<Config>, locks: Arc<BasePathLocks>, probe: P) -> Self {
        Self { config, locks, probe }
    }

    /// Run one reclaim pass over every configured disk
    pub fn reclaim(&self) -> Result<ReclaimReport, JanitorError> {
        self.reclaim_until(&CancellationToken::new())
    }

    /// Run one reclaim pass, stopping between evictions once `cancel` fires
    pub fn reclaim_until(&self, cancel: &CancellationToken) -> Result<ReclaimReport, JanitorError> {
        tracing::debug!("Deleting old directories");

        let mut report = ReclaimReport::default();
        for disk in self.config.disks() {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            self.reclaim_disk(disk, cancel, &mut report)?;
        }

        if report.cancelled {
            tracing::info!("Reclaim pass cancelled");
        }
        Ok(report)
    }

    /// All day directories on base paths that belong to `disk`
    pub fn inventory(&self, disk: &Disk) -> Result<Vec<LeafDirectory>, JanitorError> {
        let mut leaves = Vec::new();
        for base_path in self.config.base_paths_on(disk) {
            leaves.extend(leaf_directories(base_path)?);
        }
        Ok(leaves)
    }

    fn free_percent(&self, disk: &Disk) -> Result<f64, JanitorError> {
        self.probe
            .free_percent(&disk.identifier)
            .map_err(|source| JanitorError::FreeSpace {
                disk: disk.identifier.clone(),
                source,
            })
    }

    fn reclaim_disk(
        &self,
        disk: &Disk,
        cancel: &CancellationToken,
        report: &mut ReclaimReport,
    ) -> Result<(), JanitorError> {
        let mut free = self.free_percent(disk)?;
        report.disks_checked += 1;
        tracing::info!(
            "Disk: {} free space {:.2}% required: {}%",
            disk.identifier,
            free,
            disk.free_space_target
        );

        if disk.is_satisfied(free) {
            return Ok(());
        }

        loop {
            if cancel.is_cancelled() {
                report.cancelled = true;
                return Ok(());
            }

            let mut leaves = self.inventory(disk)?;
            if leaves.is_empty() {
                tracing::warn!(
                    "No more directories to delete for disk {}, but free space is still below required ({}%)",
                    disk.identifier,
                    disk.free_space_target
                );
                report.unreachable.push(disk.identifier.clone());
                return Ok(());
            }

            // Stable: equal keys keep inventory order
            leaves.sort_by_key(|leaf| leaf.key);
            let oldest = &leaves[0];

            if self.config.dry_run() {
                tracing::info!("DRY RUN: Would delete directory {}", oldest.path.display());
                return Ok(());
            }

            {
                let _guard = self.locks.lock(&oldest.base_path);
                tracing::info!("Deleting directory {}", oldest.path.display());
                fs::remove_dir_all(&oldest.path)
                    .map_err(JanitorError::io("delete directory", &oldest.path))?;
                report.directories_evicted += 1;
                report.ancestors_removed += remove_empty_ancestors(&oldest.path, &oldest.base_path);
            }

            free = self.free_percent(disk)?;
            if disk.is_satisfied(free) {
                tracing::info!(
                    "Reached required free space ({:.2}%) for disk {}",
                    free,
                    disk.identifier
                );
                return Ok(());
            }
        }
    }
}

/// Remove now-empty ancestors of a deleted directory, bottom up
///
/// Stops at the first directory that is non-empty, unreadable, or fails to be
/// removed, and never removes `base_path` itself or walks past the filesystem
/// root. Returns how many directories were removed.
pub fn remove_empty_ancestors(deleted: &Path, base_path: &Path) -> usize {
    let mut removed = 0;
    let mut dir = match deleted.parent() {
        Some(parent) => parent,
        None => return 0,
    };

    loop {
        if dir == base_path || !dir.starts_with(base_path) {
            break;
        }
        let is_empty = match fs::read_dir(dir) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => false,
        };
        if !is_empty || fs::remove_dir(dir).is_err() {
            break;
        }
        tracing::debug!("Removed empty directory {}", dir.display());
        removed += 1;

        match dir.parent() {
            Some(parent) if parent != dir => dir = parent,
            _ => break,
        }
    }

    removed
}

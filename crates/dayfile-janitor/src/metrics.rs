//! Metrics collection for Janitor operations

use serde::Serialize;
use std::collections::HashMap;

/// Outcome of one placement pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlacementReport {
    /// Files relocated into their day directory
    pub moved: usize,
    /// Files that matched no template and were deleted
    pub deleted: usize,
    /// Files that matched a template but had no usable date
    pub skipped: usize,
    /// Whether the pass stopped early on cancellation
    pub cancelled: bool,
}

/// Outcome of one reclaim pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReclaimReport {
    /// Disks whose free space was measured
    pub disks_checked: usize,
    /// Day directories deleted
    pub directories_evicted: usize,
    /// Empty month/year directories removed after an eviction
    pub ancestors_removed: usize,
    /// Disks that ran out of day directories while still below target
    pub unreachable: Vec<String>,
    /// Whether the pass stopped early on cancellation
    pub cancelled: bool,
}

/// Metrics accumulated across passes
///
/// Tracks file dispositions, evictions, and per-disk unreachable targets.
#[derive(Debug, Clone, Default)]
pub struct LifecycleMetrics {
    /// Files moved into day directories
    pub files_moved: usize,

    /// Unmatched files deleted
    pub files_deleted: usize,

    /// Files left in place for lack of a usable date
    pub files_skipped: usize,

    /// Day directories evicted
    pub directories_evicted: usize,

    /// Ancestor directories removed during cascade cleanup
    pub ancestors_removed: usize,

    /// Times each disk exhausted its day directories below target
    pub unreachable: HashMap<String, usize>,

    /// Completed placement passes
    pub organize_passes: usize,

    /// Completed reclaim passes
    pub reclaim_passes: usize,

    /// Passes that ended in an error
    pub failed_passes: usize,
}

impl LifecycleMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in a completed placement pass
    pub fn record_placement(&mut self, report: &PlacementReport) {
        self.files_moved += report.moved;
        self.files_deleted += report.deleted;
        self.files_skipped += report.skipped;
        self.organize_passes += 1;
    }

    /// Fold in a completed reclaim pass
    pub fn record_reclaim(&mut self, report: &ReclaimReport) {
        self.directories_evicted += report.directories_evicted;
        self.ancestors_removed += report.ancestors_removed;
        for disk in &report.unreachable {
            *self.unreachable.entry(disk.clone()).or_insert(0) += 1;
        }
        self.reclaim_passes += 1;
    }

    /// Record a pass that returned an error
    pub fn record_failure(&mut self) {
        self.failed_passes += 1;
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Dayfile Metrics Summary".to_string(),
            "=======================".to_string(),
            format!("Placement passes: {}", self.organize_passes),
            format!("Reclaim passes: {}", self.reclaim_passes),
            format!("Failed passes: {}", self.failed_passes),
            String::new(),
            format!("Files moved: {}", self.files_moved),
            format!("Files deleted: {}", self.files_deleted),
            format!("Files skipped: {}", self.files_skipped),
            format!("Directories evicted: {}", self.directories_evicted),
            format!("Ancestors removed: {}", self.ancestors_removed),
        ];

        if !self.unreachable.is_empty() {
            lines.push(String::new());
            lines.push("Free-space target unreachable:".to_string());
            let mut disks: Vec<_> = self.unreachable.iter().collect();
            disks.sort();
            for (disk, count) in disks {
                lines.push(format!("  {}: {}", disk, count));
            }
        }

        lines.join("\n")
    }
}

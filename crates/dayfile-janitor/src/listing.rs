//! Directory listing for display
//!
//! Describes the year, month and day directories present under a base path.
//! This is for dashboards and operators; eviction ordering comes from
//! [`crate::inventory`] only.

use crate::JanitorError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Year → month → days present under one base path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryListing {
    /// The base path that was described
    pub base_path: PathBuf,
    /// Directory names, sorted at every level
    pub years: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl DirectoryListing {
    /// Number of day directories in the listing
    pub fn day_count(&self) -> usize {
        self.years
            .values()
            .flat_map(|months| months.values())
            .map(Vec::len)
            .sum()
    }
}

/// Describe the dated directories currently under `base_path`
///
/// Every directory name is reported as found, without shape validation; plain
/// files at any level are ignored.
pub fn describe_available(base_path: &Path) -> Result<DirectoryListing, JanitorError> {
    let mut years = BTreeMap::new();

    for (year, year_path) in child_dirs(base_path)? {
        let mut months = BTreeMap::new();
        for (month, month_path) in child_dirs(&year_path)? {
            let days = child_dirs(&month_path)?
                .into_iter()
                .map(|(day, _)| day)
                .collect();
            months.insert(month, days);
        }
        years.insert(year, months);
    }

    Ok(DirectoryListing {
        base_path: base_path.to_path_buf(),
        years,
    })
}

fn child_dirs(dir: &Path) -> Result<Vec<(String, PathBuf)>, JanitorError> {
    let read_err = || JanitorError::io("read directory", dir);

    let mut children = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err())? {
        let entry = entry.map_err(read_err())?;
        if !entry.file_type().map_err(read_err())?.is_dir() {
            continue;
        }
        children.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
    }
    children.sort();
    Ok(children)
}

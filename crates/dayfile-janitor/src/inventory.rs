//! Directory inventory - day-level directories under a base path

use crate::JanitorError;
use dayfile_domain::DateKey;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A `YYYY/MM/DD` directory, the unit of eviction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafDirectory {
    /// Full path of the day directory
    pub path: PathBuf,
    /// Base path the directory lives under
    pub base_path: PathBuf,
    /// `YYYYMMDD` ordering key
    pub key: DateKey,
}

/// Enumerate every day directory currently under `base_path`
///
/// Only directories whose path relative to `base_path` is exactly three
/// all-digit segments of length 4, 2 and 2 are returned. Symlinks to
/// directories count. The result is unordered.
///
/// A base path that does not exist has no leaf directories. Failing to read an
/// existing base path is an error; unreadable year or month directories are
/// skipped.
pub fn leaf_directories(base_path: &Path) -> Result<Vec<LeafDirectory>, JanitorError> {
    let years = match subdirectories(base_path, 4) {
        Ok(years) => years,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(JanitorError::io("read directory", base_path)(e)),
    };

    let mut leaves = Vec::new();
    for (year, year_path) in years {
        let Ok(months) = subdirectories(&year_path, 2) else {
            continue;
        };
        for (month, month_path) in months {
            let Ok(days) = subdirectories(&month_path, 2) else {
                continue;
            };
            for (day, day_path) in days {
                if let Some(key) = DateKey::from_segments(&year, &month, &day) {
                    leaves.push(LeafDirectory {
                        path: day_path,
                        base_path: base_path.to_path_buf(),
                        key,
                    });
                }
            }
        }
    }

    Ok(leaves)
}

/// Directories directly under `dir` whose names are `len` characters long
fn subdirectories(dir: &Path, len: usize) -> io::Result<Vec<(String, PathBuf)>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.chars().count() != len {
            continue;
        }
        let path = entry.path();
        // metadata() follows symlinks
        if fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false) {
            found.push((name, path));
        }
    }
    Ok(found)
}

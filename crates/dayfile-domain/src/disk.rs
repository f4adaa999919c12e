//! Disk module - storage devices and their free-space targets

use std::path::Path;

/// A storage device watched by the retention evictor
///
/// Base paths belong to a disk when their path string contains the disk's
/// identifier, so `/mnt/data1` owns `/mnt/data1/incoming` (and, by the same
/// rule, `/mnt/data10/incoming`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disk {
    /// Mount point or path used both to query free space and to match base paths
    pub identifier: String,

    /// Minimum acceptable free space, in percent (0-100)
    pub free_space_target: u8,
}

impl Disk {
    /// Create a disk description
    pub fn new(identifier: impl Into<String>, free_space_target: u8) -> Self {
        Self {
            identifier: identifier.into(),
            free_space_target,
        }
    }

    /// Whether `base_path` lives on this disk
    pub fn owns(&self, base_path: &Path) -> bool {
        base_path.to_string_lossy().contains(self.identifier.as_str())
    }

    /// Whether a measured free-space percentage meets the target
    ///
    /// The measurement is rounded to the nearest whole percent first.
    pub fn is_satisfied(&self, free_percent: f64) -> bool {
        free_percent.round() >= f64::from(self.free_space_target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owns_by_substring() {
        let disk = Disk::new("/mnt/data1", 20);
        assert!(disk.owns(Path::new("/mnt/data1/incoming")));
        assert!(disk.owns(Path::new("/mnt/data10/incoming")));
        assert!(!disk.owns(Path::new("/mnt/data2/incoming")));
    }

    #[test]
    fn test_is_satisfied_rounds() {
        let disk = Disk::new("/mnt/data1", 20);
        assert!(disk.is_satisfied(20.0));
        assert!(disk.is_satisfied(19.5));
        assert!(!disk.is_satisfied(19.4));
        assert!(Disk::new("/", 0).is_satisfied(0.0));
    }
}

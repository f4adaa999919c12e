//! Placement engine - classify arrivals and file them under `YYYY/MM/DD`

use crate::{BasePathLocks, Config, JanitorError, PlacementReport};
use dayfile_domain::{CalendarDate, DateError, Template};
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// What a placement pass does with one arriving file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// No template matched: the file is deleted
    Discard,
    /// A template matched but the date is unusable: the file stays put
    Skip(DateError),
    /// Move the file under this date's day directory
    Place(CalendarDate),
}

/// Moves arriving files into dated directories
///
/// Only files directly under each base path are inspected; directories there
/// (including the dated tree itself) are left alone, so a second pass over an
/// organized tree does nothing.
///
/// # Examples
///
/// ```no_run
/// use dayfile_janitor::{BasePathLocks, Config, PlacementEngine};
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::from_file("dayfile.toml")?);
/// let locks = Arc::new(BasePathLocks::new(config.base_paths()));
/// let engine = PlacementEngine::new(config, locks);
///
/// let report = engine.organize()?;
/// println!("moved {} files", report.moved);
/// # Ok(())
/// # }
/// ```
pub struct PlacementEngine {
    config: Arc<Config>,
    locks: Arc<BasePathLocks>,
}

impl PlacementEngine {
    /// Create an engine over shared configuration and locks
    pub fn new(config: Arc<Config>, locks: Arc<BasePathLocks>) -> Self {
        Self { config, locks }
    }

    /// Decide what to do with a bare filename
    ///
    /// Templates are tried in configured order; the first match decides.
    pub fn classify(&self, filename: &str) -> Disposition {
        match Template::first_match(self.config.templates(), filename) {
            None => Disposition::Discard,
            Some(template) => match template.resolve_date(filename) {
                Ok(date) => Disposition::Place(date),
                Err(e) => Disposition::Skip(e),
            },
        }
    }

    /// Run one placement pass over every base path
    pub fn organize(&self) -> Result<PlacementReport, JanitorError> {
        self.organize_until(&CancellationToken::new())
    }

    /// Run one placement pass, stopping between files once `cancel` fires
    ///
    /// The first filesystem failure aborts the pass. Moves and deletions
    /// already made stay in effect.
    pub fn organize_until(&self, cancel: &CancellationToken) -> Result<PlacementReport, JanitorError> {
        if self.config.templates().is_empty() {
            return Err(JanitorError::NoTemplates);
        }

        tracing::debug!("Moving files to date subdirectories");

        let mut report = PlacementReport::default();
        for base_path in self.config.base_paths() {
            let _guard = self.locks.lock(base_path);
            self.organize_base_path(base_path, cancel, &mut report)?;
            if report.cancelled {
                tracing::info!("Placement pass cancelled");
                break;
            }
        }

        Ok(report)
    }

    fn organize_base_path(
        &self,
        base_path: &Path,
        cancel: &CancellationToken,
        report: &mut PlacementReport,
    ) -> Result<(), JanitorError> {
        let read_err = || JanitorError::io("read directory", base_path);

        let mut names: Vec<OsString> = Vec::new();
        for entry in fs::read_dir(base_path).map_err(read_err())? {
            let entry = entry.map_err(read_err())?;
            if entry.file_type().map_err(read_err())?.is_dir() {
                continue;
            }
            names.push(entry.file_name());
        }
        names.sort();

        for name in names {
            if cancel.is_cancelled() {
                report.cancelled = true;
                return Ok(());
            }
            self.place_file(base_path, &name, report)?;
        }

        Ok(())
    }

    fn place_file(
        &self,
        base_path: &Path,
        name: &OsString,
        report: &mut PlacementReport,
    ) -> Result<(), JanitorError> {
        let filename = name.to_string_lossy();
        let source = base_path.join(name);
        let dry_run = self.config.dry_run();

        match self.classify(&filename) {
            Disposition::Discard => {
                if dry_run {
                    tracing::info!("DRY RUN: Would delete unmatched file {}", source.display());
                } else {
                    fs::remove_file(&source).map_err(JanitorError::io("delete unmatched file", &source))?;
                    tracing::info!("Deleted unmatched file {}", source.display());
                }
                report.deleted += 1;
            }
            Disposition::Skip(e) => {
                tracing::warn!("Leaving {} in place: {}", source.display(), e);
                report.skipped += 1;
            }
            Disposition::Place(date) => {
                let day_dir = base_path.join(date.relative_dir());
                let destination = day_dir.join(name);
                if dry_run {
                    tracing::info!("DRY RUN: Would move {} to {}", filename, day_dir.display());
                } else {
                    fs::create_dir_all(&day_dir).map_err(JanitorError::io("create directory", &day_dir))?;
                    fs::rename(&source, &destination).map_err(JanitorError::io("move file to", &destination))?;
                    tracing::info!("Moved {} to {}", filename, day_dir.display());
                }
                report.moved += 1;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dayfile_domain::DateLayout;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn engine_for(base: &Path, templates: Vec<Template>) -> PlacementEngine {
        let config = Arc::new(Config::new(templates, vec![base.to_path_buf()], Vec::new()));
        let locks = Arc::new(BasePathLocks::new(config.base_paths()));
        PlacementEngine::new(config, locks)
    }

    fn default_templates() -> Vec<Template> {
        vec![
            Template::new("A_*.txt", 2, DateLayout::AbsoluteYmd).unwrap(),
            Template::new("obs-*.nc", 4, DateLayout::OrdinalDay).unwrap(),
        ]
    }

    fn touch(base: &Path, name: &str) -> PathBuf {
        let path = base.join(name);
        fs::write(&path, name.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_classify() {
        let tmp = TempDir::new().unwrap();
        let engine = engine_for(tmp.path(), default_templates());

        assert_eq!(engine.classify("B_20230515.txt"), Disposition::Discard);
        assert!(matches!(engine.classify("A_2023.txt"), Disposition::Skip(DateError::InvalidDate(_))));
        assert!(matches!(engine.classify("A_.txt"), Disposition::Skip(DateError::TooShort { .. })));
        assert!(matches!(
            engine.classify("A_20230515.txt"),
            Disposition::Place(CalendarDate { year: 2023, month: 5, day: 15 })
        ));
    }

    #[test]
    fn test_moves_matching_file() {
        let tmp = TempDir::new().unwrap();
        let source = touch(tmp.path(), "A_20230515.txt");

        let report = engine_for(tmp.path(), default_templates()).organize().unwrap();

        assert_eq!(report.moved, 1);
        assert!(!source.exists());
        let moved = tmp.path().join("2023/05/15/A_20230515.txt");
        assert_eq!(fs::read(moved).unwrap(), b"A_20230515.txt");
    }

    #[test]
    fn test_ordinal_leap_day_placement() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "obs-2024060.nc");

        engine_for(tmp.path(), default_templates()).organize().unwrap();

        assert!(tmp.path().join("2024/02/29/obs-2024060.nc").is_file());
    }

    #[test]
    fn test_deletes_unmatched_file() {
        let tmp = TempDir::new().unwrap();
        let source = touch(tmp.path(), "random.bin");

        let report = engine_for(tmp.path(), default_templates()).organize().unwrap();

        assert_eq!(report.deleted, 1);
        assert!(!source.exists());
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_skips_invalid_dates() {
        let tmp = TempDir::new().unwrap();
        let bad_month = touch(tmp.path(), "A_20231315.txt");
        let short = touch(tmp.path(), "A_2023.txt");
        let bad_ordinal = touch(tmp.path(), "obs-2023366.nc");

        let report = engine_for(tmp.path(), default_templates()).organize().unwrap();

        assert_eq!(report.skipped, 3);
        assert_eq!(report.moved + report.deleted, 0);
        assert!(bad_month.exists() && short.exists() && bad_ordinal.exists());
    }

    #[test]
    fn test_leaves_directories_alone() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("unrelated")).unwrap();
        fs::create_dir_all(tmp.path().join("2023/01/01")).unwrap();

        let report = engine_for(tmp.path(), default_templates()).organize().unwrap();

        assert_eq!(report, PlacementReport::default());
        assert!(tmp.path().join("unrelated").is_dir());
    }

    #[test]
    fn test_second_pass_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "A_20230515.txt");
        touch(tmp.path(), "A_20230516.txt");
        let engine = engine_for(tmp.path(), default_templates());

        let first = engine.organize().unwrap();
        let second = engine.organize().unwrap();

        assert_eq!(first.moved, 2);
        assert_eq!(second, PlacementReport::default());
        assert!(tmp.path().join("2023/05/16/A_20230516.txt").is_file());
    }

    #[test]
    fn test_no_templates_is_error() {
        let tmp = TempDir::new().unwrap();
        let source = touch(tmp.path(), "A_20230515.txt");

        let err = engine_for(tmp.path(), Vec::new()).organize().unwrap_err();

        assert!(matches!(err, JanitorError::NoTemplates));
        assert!(source.exists());
    }

    #[test]
    fn test_missing_base_path_aborts() {
        let tmp = TempDir::new().unwrap();
        let err = engine_for(&tmp.path().join("missing"), default_templates())
            .organize()
            .unwrap_err();
        assert!(matches!(err, JanitorError::Io { action: "read directory", .. }));
    }

    #[test]
    fn test_failed_mkdir_aborts_but_keeps_earlier_moves() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "A_20220101.txt");
        let blocked = touch(tmp.path(), "A_20230515.txt");
        // A plain file where the month directory must go
        fs::create_dir(tmp.path().join("2023")).unwrap();
        fs::write(tmp.path().join("2023/05"), b"").unwrap();

        let err = engine_for(tmp.path(), default_templates()).organize().unwrap_err();

        assert!(matches!(err, JanitorError::Io { action: "create directory", .. }));
        assert!(tmp.path().join("2022/01/01/A_20220101.txt").is_file());
        assert!(blocked.is_file());
    }

    #[test]
    fn test_multibyte_ordinal_field_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let odd = touch(tmp.path(), "X_202é01");
        let later = touch(tmp.path(), "X_2024060");
        let templates = vec![Template::new("X_*", 2, DateLayout::OrdinalDay).unwrap()];

        let report = engine_for(tmp.path(), templates).organize().unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.moved, 1);
        assert!(odd.is_file());
        assert!(!later.exists());
        assert!(tmp.path().join("2024/02/29/X_2024060").is_file());
    }

    #[test]
    fn test_dry_run_mutates_nothing() {
        let tmp = TempDir::new().unwrap();
        let keep = touch(tmp.path(), "A_20230515.txt");
        let junk = touch(tmp.path(), "junk.bin");
        let config = Config::new(default_templates(), vec![tmp.path().to_path_buf()], Vec::new())
            .with_dry_run(true);
        let config = Arc::new(config);
        let engine = PlacementEngine::new(Arc::clone(&config), Arc::new(BasePathLocks::new(config.base_paths())));

        let report = engine.organize().unwrap();

        assert_eq!((report.moved, report.deleted), (1, 1));
        assert!(keep.exists() && junk.exists());
        assert!(!tmp.path().join("2023").exists());
    }

    #[test]
    fn test_cancelled_before_first_file() {
        let tmp = TempDir::new().unwrap();
        let source = touch(tmp.path(), "A_20230515.txt");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = engine_for(tmp.path(), default_templates())
            .organize_until(&cancel)
            .unwrap();

        assert!(report.cancelled);
        assert_eq!(report.moved, 0);
        assert!(source.exists());
    }
}

//! Integration tests for placement and reclaim over a real directory tree

use dayfile_janitor::{
    describe_available, leaf_directories, BasePathLocks, Config, ConfigError, PlacementEngine,
    RetentionEvictor, SpaceProbe,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Free space rises by 30 points for every day directory evicted
struct InventoryProbe {
    base_path: PathBuf,
}

impl SpaceProbe for InventoryProbe {
    fn free_percent(&self, _disk: &str) -> io::Result<f64> {
        let remaining = leaf_directories(&self.base_path)
            .map_err(io::Error::other)?
            .len();
        Ok(100.0 - 30.0 * remaining as f64)
    }
}

fn config_toml(base: &Path, target: u8) -> String {
    format!(
        r#"
base_paths = ['{base}']

[[templates]]
pattern = "SAT_*.dat"
start_offset = 4

[[templates]]
pattern = "obs-*.nc"
start_offset = 4
date_layout = "YYYYDDD"

[[disks]]
identifier = '{base}'
free_space_target = {target}
"#,
        base = base.display(),
        target = target,
    )
}

fn arrive(base: &Path, names: &[&str]) {
    for name in names {
        fs::write(base.join(name), name.as_bytes()).unwrap();
    }
}

fn shared(config: Config) -> (Arc<Config>, Arc<BasePathLocks>) {
    let config = Arc::new(config);
    let locks = Arc::new(BasePathLocks::new(config.base_paths()));
    (config, locks)
}

#[test]
fn test_placement_builds_dated_tree() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path();
    arrive(
        base,
        &["SAT_20230201.dat", "SAT_20221231.dat", "obs-2023032.nc", "SAT_2023.dat", "notes.txt"],
    );
    let (config, locks) = shared(Config::from_toml_str(&config_toml(base, 20)).unwrap());

    let report = PlacementEngine::new(config, locks).organize().unwrap();

    assert_eq!(report.moved, 3);
    assert_eq!(report.deleted, 1);
    assert_eq!(report.skipped, 1);
    assert!(base.join("2023/02/01/SAT_20230201.dat").is_file());
    assert!(base.join("2023/02/01/obs-2023032.nc").is_file());
    assert!(base.join("2022/12/31/SAT_20221231.dat").is_file());
    assert!(base.join("SAT_2023.dat").is_file());
    assert!(!base.join("notes.txt").exists());

    let listing = describe_available(base).unwrap();
    assert_eq!(listing.day_count(), 2);
    assert_eq!(listing.years["2023"]["02"], vec!["01".to_string()]);
}

#[test]
fn test_eviction_is_oldest_first_with_cascade() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path();
    arrive(base, &["SAT_20230201.dat", "SAT_20221231.dat", "SAT_20230115.dat"]);
    let (config, locks) = shared(Config::from_toml_str(&config_toml(base, 65)).unwrap());

    PlacementEngine::new(Arc::clone(&config), Arc::clone(&locks))
        .organize()
        .unwrap();
    let evictor = RetentionEvictor::with_probe(
        config,
        locks,
        InventoryProbe { base_path: base.to_path_buf() },
    );
    let report = evictor.reclaim().unwrap();

    // 3 dirs -> 10%, 2 -> 40%, 1 -> 70% which meets the 65% target
    assert_eq!(report.directories_evicted, 2);
    assert!(report.unreachable.is_empty());
    assert!(!base.join("2022").exists());
    assert!(!base.join("2023/01").exists());
    assert!(base.join("2023/02/01/SAT_20230201.dat").is_file());
    // 2022/12, 2022 and 2023/01
    assert_eq!(report.ancestors_removed, 3);
    assert!(base.is_dir());
}

#[test]
fn test_unreachable_target_empties_the_tree() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path();
    arrive(base, &["SAT_20230201.dat", "SAT_20230115.dat"]);
    let (config, locks) = shared(Config::from_toml_str(&config_toml(base, 100)).unwrap());
    PlacementEngine::new(Arc::clone(&config), Arc::clone(&locks))
        .organize()
        .unwrap();

    struct Full;
    impl SpaceProbe for Full {
        fn free_percent(&self, _disk: &str) -> io::Result<f64> {
            Ok(1.0)
        }
    }
    let disk = base.display().to_string();
    let report = RetentionEvictor::with_probe(config, locks, Full).reclaim().unwrap();

    assert_eq!(report.directories_evicted, 2);
    assert_eq!(report.unreachable, vec![disk]);
    assert!(base.is_dir());
    assert_eq!(fs::read_dir(base).unwrap().count(), 0);
}

#[test]
fn test_mismatched_template_lists_fail_before_any_pass() {
    let tmp = TempDir::new().unwrap();
    arrive(tmp.path(), &["A_20230515.txt"]);
    let toml = format!(
        r#"
file_templates = ["A_*.txt", "B_*.txt", "C_*.txt"]
start_offsets = [2, 2]
base_paths = ['{}']
"#,
        tmp.path().display()
    );

    let err = Config::from_toml_str(&toml).unwrap_err();

    assert!(matches!(err, ConfigError::LengthMismatch { templates: 3, offsets: 2 }));
    assert!(tmp.path().join("A_20230515.txt").is_file());
}

#[test]
fn test_config_file_on_disk() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("incoming");
    fs::create_dir(&base).unwrap();
    let path = tmp.path().join("dayfile.toml");
    fs::write(&path, config_toml(&base, 20)).unwrap();

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.base_paths(), &[base]);
    assert_eq!(config.templates().len(), 2);
    assert_eq!(config.disks()[0].free_space_target, 20);
}

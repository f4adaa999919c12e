//! Configuration for Janitor operations
//!
//! The on-disk shape ([`ConfigFile`]) is deserialized from TOML and validated
//! into an immutable [`Config`] before any pass touches the filesystem.

use dayfile_domain::{DateLayout, Disk, PatternError, Template};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Parallel template lists disagree in length
    #[error("Length of file_templates ({templates}) and start_offsets ({offsets}) do not match")]
    LengthMismatch {
        /// Number of file templates
        templates: usize,
        /// Number of start offsets
        offsets: usize,
    },

    /// Both template shapes were supplied
    #[error("Use either [[templates]] or file_templates/start_offsets, not both")]
    Conflicting,

    /// Unknown date layout
    #[error("DateLayout is not YYYYMMDD or YYYYDDD: {0:?}")]
    InvalidLayout(String),

    /// A template could not be compiled
    #[error("Invalid pattern {pattern:?}: {source}")]
    Pattern {
        /// The template string
        pattern: String,
        /// Why compilation failed
        source: PatternError,
    },

    /// Any other invalid value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// One `[[templates]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Glob-like filename template, `*` is the only wildcard
    pub pattern: String,

    /// Byte offset of the date within the filename
    pub start_offset: usize,

    /// `"YYYYMMDD"` or `"YYYYDDD"`
    /// Default: "YYYYMMDD"
    #[serde(default = "default_date_layout")]
    pub date_layout: String,
}

/// One `[[disks]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskConfig {
    /// Mount point, also matched as a substring of base paths
    pub identifier: String,

    /// Minimum free space to maintain, in percent
    pub free_space_target: u8,
}

/// Configuration file as written on disk
///
/// # Examples
///
/// ```
/// use dayfile_janitor::config::ConfigFile;
///
/// let file: ConfigFile = toml::from_str(r#"
///     base_paths = ["/data/disk1/incoming"]
///
///     [[templates]]
///     pattern = "SAT_*.dat"
///     start_offset = 4
///
///     [[disks]]
///     identifier = "/data/disk1"
///     free_space_target = 20
/// "#).unwrap();
///
/// let config = file.validate().unwrap();
/// assert_eq!(config.templates().len(), 1);
/// assert_eq!(config.disks()[0].free_space_target, 20);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Templates as a flat list, paired by index with `start_offsets`
    #[serde(default)]
    pub file_templates: Vec<String>,

    /// Date offsets for `file_templates`
    #[serde(default)]
    pub start_offsets: Vec<usize>,

    /// Layout applied to every entry of `file_templates`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_layout: Option<String>,

    /// Directories where files arrive and dated subdirectories are kept
    #[serde(default)]
    pub base_paths: Vec<PathBuf>,

    /// How often to run the placement pass (in seconds)
    /// Default: 10
    #[serde(default = "default_organize_interval_secs")]
    pub organize_interval_secs: u64,

    /// How often to run the reclaim pass (in minutes)
    /// Default: 30
    #[serde(default = "default_reclaim_interval_minutes")]
    pub reclaim_interval_minutes: u64,

    /// Dry-run mode: Log what would be moved or deleted without doing it
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,

    /// Templates as a table array
    #[serde(default)]
    pub templates: Vec<TemplateConfig>,

    /// Disks watched by the retention evictor
    #[serde(default)]
    pub disks: Vec<DiskConfig>,
}

fn default_date_layout() -> String {
    DateLayout::AbsoluteYmd.as_str().to_string()
}

fn default_organize_interval_secs() -> u64 {
    10
}

fn default_reclaim_interval_minutes() -> u64 {
    30
}

fn parse_layout(s: &str) -> Result<DateLayout, ConfigError> {
    DateLayout::parse(s).ok_or_else(|| ConfigError::InvalidLayout(s.to_string()))
}

fn compile(pattern: &str, offset: usize, layout: DateLayout) -> Result<Template, ConfigError> {
    Template::new(pattern, offset, layout).map_err(|source| ConfigError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

impl ConfigFile {
    /// Validate and compile into an immutable [`Config`]
    pub fn validate(self) -> Result<Config, ConfigError> {
        let decomposed = !self.file_templates.is_empty() || !self.start_offsets.is_empty();
        if decomposed && !self.templates.is_empty() {
            return Err(ConfigError::Conflicting);
        }

        let templates = if decomposed {
            if self.file_templates.len() != self.start_offsets.len() {
                return Err(ConfigError::LengthMismatch {
                    templates: self.file_templates.len(),
                    offsets: self.start_offsets.len(),
                });
            }
            let layout = match &self.date_layout {
                Some(s) => parse_layout(s)?,
                None => DateLayout::AbsoluteYmd,
            };
            self.file_templates
                .iter()
                .zip(&self.start_offsets)
                .map(|(pattern, offset)| compile(pattern, *offset, layout))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            self.templates
                .iter()
                .map(|t| compile(&t.pattern, t.start_offset, parse_layout(&t.date_layout)?))
                .collect::<Result<Vec<_>, _>>()?
        };

        let mut disks = Vec::with_capacity(self.disks.len());
        for disk in &self.disks {
            if disk.identifier.is_empty() {
                return Err(ConfigError::Invalid("disk identifier is empty".to_string()));
            }
            if disk.free_space_target > 100 {
                return Err(ConfigError::Invalid(format!(
                    "free_space_target for {} is {}%, must be 0-100",
                    disk.identifier, disk.free_space_target
                )));
            }
            disks.push(Disk::new(disk.identifier.clone(), disk.free_space_target));
        }

        if self.organize_interval_secs == 0 || self.reclaim_interval_minutes == 0 {
            return Err(ConfigError::Invalid("intervals must be greater than zero".to_string()));
        }
        let reclaim_secs = self.reclaim_interval_minutes.checked_mul(60).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "reclaim_interval_minutes {} is too large",
                self.reclaim_interval_minutes
            ))
        })?;

        Ok(Config {
            templates,
            base_paths: self.base_paths,
            disks,
            organize_interval: Duration::from_secs(self.organize_interval_secs),
            reclaim_interval: Duration::from_secs(reclaim_secs),
            dry_run: self.dry_run,
        })
    }
}

/// Validated, immutable configuration shared by every pass
#[derive(Debug, Clone)]
pub struct Config {
    templates: Vec<Template>,
    base_paths: Vec<PathBuf>,
    disks: Vec<Disk>,
    organize_interval: Duration,
    reclaim_interval: Duration,
    dry_run: bool,
}

impl Config {
    /// Build a configuration from already-compiled parts, with default intervals
    pub fn new(templates: Vec<Template>, base_paths: Vec<PathBuf>, disks: Vec<Disk>) -> Self {
        Self {
            templates,
            base_paths,
            disks,
            organize_interval: Duration::from_secs(default_organize_interval_secs()),
            reclaim_interval: Duration::from_secs(default_reclaim_interval_minutes() * 60),
            dry_run: false,
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents)?;
        file.validate()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Override both scheduling intervals
    pub fn with_intervals(mut self, organize: Duration, reclaim: Duration) -> Self {
        self.organize_interval = organize;
        self.reclaim_interval = reclaim;
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Templates in match order
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Base paths in processing order
    pub fn base_paths(&self) -> &[PathBuf] {
        &self.base_paths
    }

    /// Disks in reclaim order
    pub fn disks(&self) -> &[Disk] {
        &self.disks
    }

    /// Base paths that live on `disk`
    pub fn base_paths_on<'a>(&'a self, disk: &'a Disk) -> impl Iterator<Item = &'a PathBuf> + 'a {
        self.base_paths.iter().filter(move |p| disk.owns(p))
    }

    /// Placement pass interval
    pub fn organize_interval(&self) -> Duration {
        self.organize_interval
    }

    /// Reclaim pass interval
    pub fn reclaim_interval(&self) -> Duration {
        self.reclaim_interval
    }

    /// Whether passes only log their intended actions
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
        base_paths = ["/data/disk1/incoming", "/data/disk2/incoming"]
        organize_interval_secs = 5
        reclaim_interval_minutes = 15

        [[templates]]
        pattern = "SAT_*.dat"
        start_offset = 4
        date_layout = "YYYYMMDD"

        [[templates]]
        pattern = "obs-*.nc"
        start_offset = 4
        date_layout = "YYYYDDD"

        [[disks]]
        identifier = "/data/disk1"
        free_space_target = 20
    "#;

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml_str(FULL).unwrap();
        assert_eq!(config.templates().len(), 2);
        assert_eq!(config.templates()[1].layout, DateLayout::OrdinalDay);
        assert_eq!(config.base_paths().len(), 2);
        assert_eq!(config.organize_interval(), Duration::from_secs(5));
        assert_eq!(config.reclaim_interval(), Duration::from_secs(15 * 60));
        assert!(!config.dry_run());
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("base_paths = []").unwrap();
        assert!(config.templates().is_empty());
        assert_eq!(config.organize_interval(), Duration::from_secs(10));
        assert_eq!(config.reclaim_interval(), Duration::from_secs(30 * 60));
    }

    #[test]
    fn test_base_paths_on_disk() {
        let config = Config::from_toml_str(FULL).unwrap();
        let disk = &config.disks()[0];
        let owned: Vec<_> = config.base_paths_on(disk).collect();
        assert_eq!(owned, vec![&PathBuf::from("/data/disk1/incoming")]);
    }

    #[test]
    fn test_decomposed_templates() {
        let config = Config::from_toml_str(
            r#"
            file_templates = ["A_*.txt", "B_*.txt"]
            start_offsets = [2, 2]
            date_layout = "YYYYDDD"
            "#,
        )
        .unwrap();
        assert_eq!(config.templates().len(), 2);
        assert!(config.templates().iter().all(|t| t.layout == DateLayout::OrdinalDay));
    }

    #[test]
    fn test_decomposed_length_mismatch() {
        let err = Config::from_toml_str(
            r#"
            file_templates = ["A_*.txt", "B_*.txt", "C_*.txt"]
            start_offsets = [2, 2]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::LengthMismatch { templates: 3, offsets: 2 }));
    }

    #[test]
    fn test_conflicting_shapes() {
        let err = Config::from_toml_str(
            r#"
            file_templates = ["A_*.txt"]
            start_offsets = [2]

            [[templates]]
            pattern = "B_*.txt"
            start_offset = 2
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Conflicting));
    }

    #[test]
    fn test_invalid_layout() {
        let err = Config::from_toml_str(
            r#"
            [[templates]]
            pattern = "A_*.txt"
            start_offset = 2
            date_layout = "DDMMYYYY"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLayout(ref s) if s == "DDMMYYYY"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Config::from_toml_str(
            r#"
            [[templates]]
            pattern = "in/A_*.txt"
            start_offset = 2
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Pattern { .. }));
    }

    #[test]
    fn test_target_out_of_range() {
        let err = Config::from_toml_str(
            r#"
            [[disks]]
            identifier = "/data"
            free_space_target = 101
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(Config::from_toml_str("organize_interval_secs = 0").is_err());
    }

    #[test]
    fn test_reclaim_interval_overflow_rejected() {
        let err = Config::from_toml_str("reclaim_interval_minutes = 9223372036854775807").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/nonexistent/dayfile.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(_)));
    }

    #[test]
    fn test_serde_roundtrip() {
        let file: ConfigFile = toml::from_str(FULL).unwrap();
        let serialized = toml::to_string(&file).unwrap();
        let reparsed: ConfigFile = toml::from_str(&serialized).unwrap();
        assert_eq!(reparsed.templates.len(), 2);
        assert_eq!(reparsed.organize_interval_secs, 5);
    }
}

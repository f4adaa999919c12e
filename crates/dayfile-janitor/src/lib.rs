//! Dayfile Janitor
//!
//! Background maintenance for directories that receive dated data files.
//!
//! # Overview
//!
//! The Janitor is responsible for:
//! - **Placement**: Moving each arriving file into `base/YYYY/MM/DD/` based on the
//!   date embedded in its name, and deleting files that match no template
//! - **Reclaiming space**: Deleting the oldest day directories on a disk until its
//!   free-space percentage reaches the configured target
//! - **Cascade cleanup**: Removing month and year directories emptied by an eviction
//! - **Metrics collection**: Tracking dispositions and evictions across passes
//!
//! # Architecture
//!
//! Placement and reclaim run as two independent loops on their own intervals.
//! Both mutate the same trees, so every base path is guarded by an in-process
//! lock shared between them ([`BasePathLocks`]).
//!
//! | Pass | Default interval | Reads | Mutates |
//! |------|------------------|-------|---------|
//! | **Placement** | 10 seconds | files directly under each base path | moves, deletes unmatched |
//! | **Reclaim** | 30 minutes | free space, `YYYY/MM/DD` inventory | deletes oldest day dirs |
//!
//! # Usage
//!
//! ## One-time Passes
//!
//! ```no_run
//! use dayfile_janitor::{BasePathLocks, Config, PlacementEngine, RetentionEvictor};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(Config::from_file("dayfile.toml")?);
//! let locks = Arc::new(BasePathLocks::new(config.base_paths()));
//!
//! let placed = PlacementEngine::new(Arc::clone(&config), Arc::clone(&locks)).organize()?;
//! let reclaimed = RetentionEvictor::new(config, locks).reclaim()?;
//! println!("moved {}, evicted {}", placed.moved, reclaimed.directories_evicted);
//! # Ok(())
//! # }
//! ```
//!
//! ## Background Worker
//!
//! ```no_run
//! use dayfile_janitor::{Config, JanitorWorker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("dayfile.toml")?;
//!     let worker = JanitorWorker::new(config);
//!
//!     // Run indefinitely (until Ctrl+C)
//!     worker.run_until_ctrl_c().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! base_paths = ["/data/incoming"]
//! organize_interval_secs = 10
//! reclaim_interval_minutes = 30
//! dry_run = false
//!
//! [[templates]]
//! pattern = "SAT_*.dat"
//! start_offset = 4
//! date_layout = "YYYYMMDD"
//!
//! [[disks]]
//! identifier = "/data"
//! free_space_target = 20
//! ```

#![warn(missing_docs)]

mod error;
pub mod config;
mod evictor;
pub mod inventory;
pub mod listing;
mod locks;
mod metrics;
mod placement;
mod space;
mod worker;

pub use config::{Config, ConfigError, ConfigFile, DiskConfig, TemplateConfig};
pub use error::JanitorError;
pub use evictor::{remove_empty_ancestors, RetentionEvictor};
pub use inventory::{leaf_directories, LeafDirectory};
pub use listing::{describe_available, DirectoryListing};
pub use locks::BasePathLocks;
pub use metrics::{LifecycleMetrics, PlacementReport, ReclaimReport};
pub use placement::{Disposition, PlacementEngine};
pub use space::{SpaceProbe, StatfsProbe};
pub use worker::JanitorWorker;

//! Dayfile Domain Layer
//!
//! This crate contains the classification rules for arriving data files. It does
//! no I/O: everything here operates on bare filenames and path segments, so the
//! janitor crate can own all filesystem effects.
//!
//! ## Key Concepts
//!
//! - **Pattern**: A compiled glob-like filename template (`*` is the only wildcard)
//! - **Template**: A pattern plus the offset and layout of the date embedded in the name
//! - **CalendarDate**: The date resolved from a filename, rendered as `YYYY/MM/DD`
//! - **DateKey**: The `YYYYMMDD` ordering key of a day-level directory
//! - **Disk**: A storage device with a minimum free-space target
//!
//! ## Example
//!
//! ```
//! use dayfile_domain::{DateLayout, Template};
//!
//! let template = Template::new("SAT_*.dat", 4, DateLayout::AbsoluteYmd).unwrap();
//! assert!(template.matches("SAT_20240229_a.dat"));
//!
//! let date = template.resolve_date("SAT_20240229_a.dat").unwrap();
//! assert_eq!(date.to_string(), "2024/02/29");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod date;
pub mod disk;
pub mod pattern;
pub mod template;

// Re-exports for convenience
pub use date::{CalendarDate, DateError, DateKey, DateLayout};
pub use disk::Disk;
pub use pattern::{Pattern, PatternError, Segment};
pub use template::Template;

//! Date module - dates embedded in filenames and day-directory keys

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving the date embedded in a filename
///
/// All variants are per-file conditions: the file is left where it is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// The filename ends before the date field does
    #[error("filename {filename:?} too short for a {needed}-character date at offset {offset}")]
    TooShort {
        /// Filename being resolved
        filename: String,
        /// Start offset of the date field
        offset: usize,
        /// Length of the date field
        needed: usize,
    },

    /// The date field is not a plausible YYYYMMDD date
    #[error("invalid date {0:?}")]
    InvalidDate(String),

    /// The YYYYDDD field could not be converted to a calendar date
    #[error("cannot convert {input:?}: {reason}")]
    Conversion {
        /// The YYYYDDD field
        input: String,
        /// What went wrong
        reason: String,
    },
}

/// How a date is laid out inside a filename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateLayout {
    /// Eight digits, `YYYYMMDD`
    AbsoluteYmd,

    /// Seven digits, `YYYYDDD` with a 1-indexed day of year
    OrdinalDay,
}

impl DateLayout {
    /// The configuration spelling of this layout
    pub fn as_str(&self) -> &'static str {
        match self {
            DateLayout::AbsoluteYmd => "YYYYMMDD",
            DateLayout::OrdinalDay => "YYYYDDD",
        }
    }

    /// Number of characters the date field occupies
    pub fn width(&self) -> usize {
        match self {
            DateLayout::AbsoluteYmd => 8,
            DateLayout::OrdinalDay => 7,
        }
    }

    /// Parse a layout from its configuration spelling (case-sensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "YYYYMMDD" => Some(DateLayout::AbsoluteYmd),
            "YYYYDDD" => Some(DateLayout::OrdinalDay),
            _ => None,
        }
    }

    /// Extract and validate the date starting at `offset` in `filename`
    pub fn resolve(&self, filename: &str, offset: usize) -> Result<CalendarDate, DateError> {
        let width = self.width();
        let field = offset
            .checked_add(width)
            .and_then(|end| filename.get(offset..end))
            .ok_or_else(|| DateError::TooShort {
                filename: filename.to_string(),
                offset,
                needed: width,
            })?;

        match self {
            DateLayout::AbsoluteYmd => CalendarDate::from_ymd_field(field),
            DateLayout::OrdinalDay => CalendarDate::from_ordinal_field(field),
        }
    }
}

impl fmt::Display for DateLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DateLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("DateLayout is not YYYYMMDD or YYYYDDD: {}", s))
    }
}

/// A resolved acquisition date
///
/// Days are bounded to 1-31 regardless of month for `YYYYMMDD` input; `20230431`
/// is accepted and placed under `2023/04/31`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    /// Four-digit year
    pub year: u16,
    /// Month, 1-12
    pub month: u8,
    /// Day of month, 1-31
    pub day: u8,
}

impl CalendarDate {
    fn from_ymd_field(field: &str) -> Result<Self, DateError> {
        let invalid = || DateError::InvalidDate(field.to_string());

        if field.len() != 8 || !is_digits(field) {
            return Err(invalid());
        }
        let year: u16 = field[0..4].parse().map_err(|_| invalid())?;
        let month: u8 = field[4..6].parse().map_err(|_| invalid())?;
        let day: u8 = field[6..8].parse().map_err(|_| invalid())?;

        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(invalid());
        }

        Ok(Self { year, month, day })
    }

    fn from_ordinal_field(field: &str) -> Result<Self, DateError> {
        let fail = |reason: String| DateError::Conversion {
            input: field.to_string(),
            reason,
        };

        let (Some(year_str), Some(doy_str)) = (field.get(..4), field.get(4..)) else {
            return Err(fail("not a YYYYDDD field".to_string()));
        };
        if !is_digits(year_str) {
            return Err(fail(format!("invalid year {:?}", year_str)));
        }
        if !is_digits(doy_str) {
            return Err(fail(format!("invalid day-of-year {:?}", doy_str)));
        }
        let year: i32 = year_str
            .parse()
            .map_err(|e| fail(format!("invalid year: {}", e)))?;
        let doy: u32 = doy_str
            .parse()
            .map_err(|e| fail(format!("invalid day-of-year: {}", e)))?;

        let date = NaiveDate::from_yo_opt(year, doy)
            .ok_or_else(|| fail(format!("day {} does not exist in {}", doy, year)))?;

        Ok(Self {
            year: year as u16,
            month: date.month() as u8,
            day: date.day() as u8,
        })
    }

    /// Relative day directory, `YYYY/MM/DD`
    pub fn relative_dir(&self) -> PathBuf {
        [
            format!("{:04}", self.year),
            format!("{:02}", self.month),
            format!("{:02}", self.day),
        ]
        .iter()
        .collect()
    }

    /// Compact `YYYYMMDD` rendering
    pub fn compact(&self) -> String {
        format!("{:04}{:02}{:02}", self.year, self.month, self.day)
    }

    /// Ordering key of the day directory this date is placed in
    pub fn key(&self) -> DateKey {
        DateKey(self.year as u32 * 10_000 + self.month as u32 * 100 + self.day as u32)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

/// Ordering key of a day directory, the integer `YYYYMMDD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(u32);

impl DateKey {
    /// Build a key from `YYYY`, `MM`, `DD` directory names
    ///
    /// Returns `None` unless the segments are ASCII digits of length 4, 2 and 2.
    pub fn from_segments(year: &str, month: &str, day: &str) -> Option<Self> {
        if year.len() != 4 || month.len() != 2 || day.len() != 2 {
            return None;
        }
        if !is_digits(year) || !is_digits(month) || !is_digits(day) {
            return None;
        }
        format!("{}{}{}", year, month, day).parse().ok().map(DateKey)
    }

    /// The integer value of the key
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08}", self.0)
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

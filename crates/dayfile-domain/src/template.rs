//! Template module - filename classification rules

use crate::{CalendarDate, DateError, DateLayout, Pattern, PatternError};

/// A classification rule for arriving files
///
/// Immutable once built. Templates are tried in configured order and the first
/// match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Compiled filename pattern
    pub pattern: Pattern,
    /// Byte offset of the embedded date within the filename
    pub date_offset: usize,
    /// Layout of the embedded date
    pub layout: DateLayout,
}

impl Template {
    /// Compile a template from its configured parts
    pub fn new(pattern: &str, date_offset: usize, layout: DateLayout) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: Pattern::compile(pattern)?,
            date_offset,
            layout,
        })
    }

    /// Test a bare filename against this template's pattern
    pub fn matches(&self, filename: &str) -> bool {
        self.pattern.matches(filename)
    }

    /// Resolve the date embedded in a filename this template matched
    pub fn resolve_date(&self, filename: &str) -> Result<CalendarDate, DateError> {
        self.layout.resolve(filename, self.date_offset)
    }

    /// Find the first template in `templates` that matches `filename`
    pub fn first_match<'a>(templates: &'a [Template], filename: &str) -> Option<&'a Template> {
        templates.iter().find(|t| t.matches(filename))
    }
}

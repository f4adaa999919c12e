//! Pattern module - compiled filename templates
//!
//! A template is a sequence of literal runs and wildcards. `*` matches zero or
//! more arbitrary characters; every other character, `.` and `?` included, is
//! literal and compared case-sensitively. Matching is anchored at both ends.

use std::fmt;
use thiserror::Error;

/// Errors raised while compiling a template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Template string is empty
    #[error("pattern is empty")]
    Empty,

    /// Template contains a character that can never occur in a bare filename
    #[error("pattern {pattern:?} contains forbidden character {found:?}")]
    ForbiddenCharacter {
        /// The offending template
        pattern: String,
        /// The forbidden character
        found: char,
    },
}

/// One element of a compiled pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A run of characters that must appear verbatim
    Literal(String),

    /// Zero or more arbitrary characters
    Wildcard,
}

/// A compiled filename template
///
/// Compiled once at startup and reused for every candidate filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Compile a glob-like template
    ///
    /// Adjacent wildcards collapse into one, and adjacent literal characters are
    /// merged into a single run, so segments always alternate.
    pub fn compile(template: &str) -> Result<Self, PatternError> {
        if template.is_empty() {
            return Err(PatternError::Empty);
        }

        if let Some(found) = template.chars().find(|c| *c == '/' || *c == '\0') {
            return Err(PatternError::ForbiddenCharacter {
                pattern: template.to_string(),
                found,
            });
        }

        let mut segments = Vec::new();
        let mut literal = String::new();

        for c in template.chars() {
            if c == '*' {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                if segments.last() != Some(&Segment::Wildcard) {
                    segments.push(Segment::Wildcard);
                }
            } else {
                literal.push(c);
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: template.to_string(),
            segments,
        })
    }

    /// The template string this pattern was compiled from
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The compiled segments
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Test whether `candidate` matches the whole pattern
    ///
    /// Leading and trailing literals are anchored; interior literals are taken at
    /// their leftmost occurrence, which is sufficient when `*` is the only
    /// wildcard.
    pub fn matches(&self, candidate: &str) -> bool {
        let last = self.segments.len().saturating_sub(1);
        let mut rest = candidate;

        for (i, segment) in self.segments.iter().enumerate() {
            let Segment::Literal(lit) = segment else {
                continue;
            };

            if i == 0 && i == last {
                return rest == lit;
            } else if i == 0 {
                match rest.strip_prefix(lit.as_str()) {
                    Some(tail) => rest = tail,
                    None => return false,
                }
            } else if i == last {
                return rest.ends_with(lit.as_str());
            } else {
                match rest.find(lit.as_str()) {
                    Some(pos) => rest = &rest[pos + lit.len()..],
                    None => return false,
                }
            }
        }

        // Only reachable when the final segment is a wildcard
        true
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

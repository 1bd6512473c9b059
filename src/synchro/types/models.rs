//! Core data structures for the Synchro container.
//!
//! This module defines the small value types shared by the container parser,
//! the primitive decoder and the project model:
//! - Table directory entries
//! - File version
//! - Durations

use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;

/// One entry of the table directory.
///
/// The on-disk directory is not sorted; the container parser sorts entries by
/// offset and derives each length from the following entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynchroTable {
    pub name: String,
    /// Absolute byte offset of the table within the file.
    pub offset: u64,
    /// Number of bytes from `offset` to the next table.
    /// `None` for the final table, which runs to the end of the stream.
    pub length: Option<u64>,
}

impl SynchroTable {
    pub fn new(name: impl Into<String>, offset: u64) -> Self {
        Self {
            name: name.into(),
            offset,
            length: None,
        }
    }
}

impl PartialOrd for SynchroTable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SynchroTable {
    fn cmp(&self, other: &Self) -> Ordering {
        self.offset
            .cmp(&other.offset)
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// Application version recorded in the file header, e.g. `6.2.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct SynchroVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl SynchroVersion {
    /// First version storing resources in their own table rather than under companies.
    pub const VERSION_6_2_0: SynchroVersion = SynchroVersion::new(6, 2, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Parse the numeric components of a version string.
    ///
    /// Leading text before the first digit is ignored, missing components are
    /// zero, and anything after the third component is ignored.
    pub fn parse(text: &str) -> Self {
        let start = text.find(|c: char| c.is_ascii_digit()).unwrap_or(text.len());
        let mut parts = text[start..]
            .split(|c: char| !c.is_ascii_digit())
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<u32>().unwrap_or(0));

        Self {
            major: parts.next().unwrap_or(0),
            minor: parts.next().unwrap_or(0),
            patch: parts.next().unwrap_or(0),
        }
    }

    pub fn at_least(&self, other: SynchroVersion) -> bool {
        *self >= other
    }
}

impl fmt::Display for SynchroVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A span of time measured in hours.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Duration {
    hours: f64,
}

impl Duration {
    pub const ZERO: Duration = Duration { hours: 0.0 };

    pub fn from_hours(hours: f64) -> Self {
        Self { hours }
    }

    pub fn from_seconds(seconds: i64) -> Self {
        Self {
            hours: seconds as f64 / 3600.0,
        }
    }

    pub fn hours(&self) -> f64 {
        self.hours
    }

    /// Whole minutes, rounded to the nearest minute.
    pub fn minutes(&self) -> i64 {
        (self.hours * 60.0).round() as i64
    }

    pub fn is_zero(&self) -> bool {
        self.hours == 0.0
    }
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Self::Output {
        Duration { hours: -self.hours }
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h", self.hours)
    }
}

//! Month-granularity time values
//!
//! SubTrack only understands whole calendar months. Every date that enters
//! the system is truncated to the first day of its month, and every interval
//! is a closed range of months.
//!
//! - `Month` - a (year, month) pair, totally ordered
//! - `MonthInterval` - a subscription's active span, optionally open-ended
//! - `MonthWindow` - a query's [start, end] bound, either side optional
//! - `MonthRange` - an ascending, inclusive iterator over months

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Smallest year accepted from text (four-digit years only)
pub const MIN_YEAR: i32 = 1;

/// Largest year accepted from text
pub const MAX_YEAR: i32 = 9999;

/// A calendar month
///
/// Ordering is chronological: year first, then month of year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    /// 1-based month of year
    month: u32,
}

impl Month {
    /// Create a month, validating the month-of-year and year range
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidData(format!(
                "month of year must be 1-12, got {}",
                month
            )));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(Error::InvalidData(format!(
                "year must be {}-{}, got {}",
                MIN_YEAR, MAX_YEAR, year
            )));
        }
        Ok(Self { year, month })
    }

    /// Truncate a date to its month
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Single integer index: months since year 0
    pub fn index(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    /// Inverse of `index`
    pub fn from_index(index: i64) -> Self {
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// The following calendar month
    pub fn succ(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Storage form: `YYYY-MM-01`, so text order matches chronological order
    pub fn to_date_string(&self) -> String {
        format!("{:04}-{:02}-01", self.year, self.month)
    }

    /// Parse the storage form written by `to_date_string` (any day is truncated)
    pub fn from_date_string(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self::from_date)
            .map_err(|_| Error::InvalidData(format!("invalid stored month '{}'", s)))
    }
}

/// Parses the boundary text format `MM-YYYY` (e.g. `01-2025`)
impl FromStr for Month {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || Error::InvalidData(format!("invalid month '{}': expected MM-YYYY", s));

        let (mm, yyyy) = s.split_once('-').ok_or_else(invalid)?;
        if mm.len() != 2
            || yyyy.len() != 4
            || !mm.bytes().all(|b| b.is_ascii_digit())
            || !yyyy.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let month: u32 = mm.parse().map_err(|_| invalid())?;
        let year: i32 = yyyy.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month, self.year)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A subscription's active span
///
/// `end` is inclusive; `None` means the subscription is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthInterval {
    pub start: Month,
    pub end: Option<Month>,
}

impl MonthInterval {
    /// Create an interval, rejecting an end before the start
    pub fn new(start: Month, end: Option<Month>) -> Result<Self> {
        if let Some(end) = end {
            if end < start {
                return Err(Error::InvalidData(format!(
                    "end month {} is before start month {}",
                    end, start
                )));
            }
        }
        Ok(Self { start, end })
    }

    /// Last active month: the stored end, or `as_of` for an open interval
    pub fn resolved_end(&self, as_of: Month) -> Month {
        self.end.unwrap_or(as_of)
    }

    /// True interval overlap with a query window
    ///
    /// An open end never fails the lower bound, and an absent window bound is
    /// always satisfied.
    pub fn overlaps(&self, window: &MonthWindow) -> bool {
        if window.is_empty() {
            return false;
        }
        let after_start = match (self.end, window.start) {
            (Some(end), Some(start)) => end >= start,
            _ => true,
        };
        let before_end = window.end.map_or(true, |end| self.start <= end);
        after_start && before_end
    }
}

/// A query's month bounds; either side may be absent (unbounded)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthWindow {
    pub start: Option<Month>,
    pub end: Option<Month>,
}

impl MonthWindow {
    pub fn new(start: Option<Month>, end: Option<Month>) -> Self {
        Self { start, end }
    }

    /// Window with no bounds on either side
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// An inverted window matches nothing
    pub fn is_empty(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start > end)
    }

    pub fn contains(&self, month: Month) -> bool {
        self.start.map_or(true, |start| month >= start) && self.end.map_or(true, |end| month <= end)
    }

    /// Replace an absent end with `as_of`
    pub fn with_end_or(&self, as_of: Month) -> Self {
        Self {
            start: self.start,
            end: Some(self.end.unwrap_or(as_of)),
        }
    }
}

/// Ascending, inclusive range of months
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthRange {
    next: i64,
    last: i64,
}

impl MonthRange {
    /// Months from `first` through `last`; empty if `first > last`
    pub fn new(first: Month, last: Month) -> Self {
        Self {
            next: first.index(),
            last: last.index(),
        }
    }

    pub fn empty() -> Self {
        Self { next: 1, last: 0 }
    }

    /// Intersect with a window's bounds
    pub fn clip(self, window: &MonthWindow) -> Self {
        if window.is_empty() {
            return Self::empty();
        }
        let next = window
            .start
            .map_or(self.next, |start| self.next.max(start.index()));
        let last = window
            .end
            .map_or(self.last, |end| self.last.min(end.index()));
        Self { next, last }
    }
}

impl Iterator for MonthRange {
    type Item = Month;

    fn next(&mut self) -> Option<Month> {
        if self.next > self.last {
            return None;
        }
        let month = Month::from_index(self.next);
        self.next += 1;
        Some(month)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.last - self.next + 1).max(0) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MonthRange {}

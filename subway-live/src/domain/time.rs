//! Epoch-second timestamps.
//!
//! The provider reports every arrival and departure as unix epoch seconds.
//! All derived computations (position, transfer windows, countdowns) are
//! integer arithmetic on these values; `chrono` only enters the picture at
//! the edges, for reading the wall clock and for human-readable display.

use std::fmt;
use std::ops::Sub;

use chrono::{DateTime, Local, TimeZone, Utc};

/// A point in time, in unix epoch seconds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a timestamp from unix epoch seconds.
    pub fn from_unix(secs: i64) -> Self {
        Timestamp(secs)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Timestamp(Utc::now().timestamp())
    }

    /// Returns the timestamp as unix epoch seconds.
    pub fn as_unix(&self) -> i64 {
        self.0
    }

    /// Seconds elapsed since `earlier`. Negative if `earlier` is later.
    pub fn seconds_since(&self, earlier: Timestamp) -> i64 {
        self.0 - earlier.0
    }

    /// This timestamp shifted forward by `secs` seconds.
    pub fn plus_seconds(&self, secs: i64) -> Timestamp {
        Timestamp(self.0 + secs)
    }

    /// Local clock time, e.g. `"4:05 PM"`, for rider-facing messages.
    pub fn format_clock(&self) -> String {
        match Local.timestamp_opt(self.0, 0) {
            chrono::LocalResult::Single(dt) => dt.format("%-I:%M %p").to_string(),
            _ => self.0.to_string(),
        }
    }

    /// The timestamp as a UTC datetime.
    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }
}

impl Sub for Timestamp {
    type Output = i64;

    /// Difference in seconds.
    fn sub(self, rhs: Timestamp) -> i64 {
        self.0 - rhs.0
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Time Window Configuration
//!
//! A closed-open `[start, end)` interval of Unix seconds (UTC) used by the
//! canonical ingestion predicate. The window is configuration, never a
//! hardcoded pipeline constant: the original data sources disagree about the
//! exact end of the election-night window, so callers always pass one in
//! (the server reads it from the environment and falls back to
//! [`TimeWindow::election_night_2024`]).

use chrono::{DateTime, TimeZone, Utc};

/// Closed-open `[start, end)` interval in Unix seconds, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn from_datetimes(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: start.timestamp(),
            end: end.timestamp(),
        }
    }

    /// US election night 2024: 2024-11-05T00:00:00Z to 2024-11-06T06:00:00Z.
    pub fn election_night_2024() -> Self {
        let start = Utc.with_ymd_and_hms(2024, 11, 5, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 11, 6, 6, 0, 0).unwrap();
        Self::from_datetimes(start, end)
    }

    /// True iff `ts` falls inside the window. Start inclusive, end exclusive.
    pub fn contains(&self, ts: i64) -> bool {
        ts >= self.start && ts < self.end
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::election_night_2024()
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current on-disk schema version of a [`SessionRecord`].
pub const SCHEMA_VERSION: u32 = 2;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// A closed work interval. `hours` is kept alongside `start`/`end` so that
/// totals never need to re-parse timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionLog {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub hours: f64,
}

impl SessionLog {
    /// Build a log from its bounds. An `end` earlier than `start` (clock
    /// skew) is clamped to `start`. Zero-length logs are therefore allowed:
    /// `start <= end` always holds and `hours` is then 0.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let end = end.max(start);
        Self {
            start,
            end,
            hours: hours_between(start, end),
        }
    }

    /// True when `hours` agrees with the interval bounds.
    pub fn is_consistent(&self) -> bool {
        self.start <= self.end && (self.hours - hours_between(self.start, self.end)).abs() < 1e-9
    }
}

/// `(end - start)` in hours, millisecond precision.
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / MS_PER_HOUR
}

/// Per-user timesheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(default = "current_version")]
    pub version: u32,
    pub user_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<DateTime<Utc>>,
    #[serde(default)]
    pub logs: Vec<SessionLog>,
}

fn current_version() -> u32 {
    SCHEMA_VERSION
}

impl SessionRecord {
    pub fn new(user_id: &str, display_name: &str) -> Self {
        Self {
            version: SCHEMA_VERSION,
            user_id: user_id.to_string(),
            display_name: display_name.to_string(),
            active: None,
            logs: Vec::new(),
        }
    }

    pub fn state(&self) -> ClockState {
        match self.active {
            Some(since) => ClockState::ClockedIn { since },
            None => ClockState::ClockedOut,
        }
    }

    pub fn total_hours(&self) -> f64 {
        self.logs.iter().map(|l| l.hours).sum()
    }

    /// True when the record carries nothing worth keeping.
    pub fn is_empty(&self) -> bool {
        self.active.is_none() && self.logs.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    ClockedOut,
    ClockedIn { since: DateTime<Utc> },
}

impl ClockState {
    pub fn is_clocked_in(&self) -> bool {
        matches!(self, ClockState::ClockedIn { .. })
    }
}

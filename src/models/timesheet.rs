use super::session::{SessionLog, SessionRecord};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Live snapshot: user id → record.
pub type Snapshot = BTreeMap<String, SessionRecord>;

/// Archived snapshots: archive timestamp → (user id → record).
pub type History = BTreeMap<String, BTreeMap<String, SessionRecord>>;

/// Inclusive calendar-day range, interpreted in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn all() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// True when `ts` falls between 00:00:00.000 of the start day and
    /// 23:59:59.999 of the end day.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        if let Some(s) = self.start
            && ts < s.and_time(NaiveTime::MIN).and_utc()
        {
            return false;
        }
        if let Some(e) = self.end {
            let next_day = e.and_time(NaiveTime::MIN).and_utc() + Duration::days(1);
            if ts >= next_day {
                return false;
            }
        }
        true
    }
}

/// Result of a `timesheet view`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetView {
    pub user_id: String,
    pub display_name: String,
    pub entries: Vec<SessionLog>,
    pub total_hours: f64,
}

/// Result of a `status` query.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusReport {
    NoRecord,
    ClockedOut,
    ClockedIn { since: DateTime<Utc>, minutes: i64 },
}

/// What an archive/reset moved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveSummary {
    pub archive_key: String,
    pub users: usize,
    pub logs_moved: usize,
    pub active_cleared: usize,
}

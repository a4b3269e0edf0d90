use crate::models::{DateRange, StatusReport, TimesheetView};
use crate::store::RecordStore;
use chrono::{DateTime, Utc};

/// Read-only queries over the record store.
pub struct TimesheetLogic;

impl TimesheetLogic {
    /// Logs of `user_id` whose start falls inside `range`, with their total.
    pub fn view(store: &RecordStore, user_id: &str, range: &DateRange) -> TimesheetView {
        let record = store.get(user_id);

        let entries: Vec<_> = record
            .map(|r| {
                r.logs
                    .iter()
                    .filter(|l| range.contains(l.start))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let total_hours = entries.iter().map(|l| l.hours).sum();

        TimesheetView {
            user_id: user_id.to_string(),
            display_name: record.map(|r| r.display_name.clone()).unwrap_or_default(),
            entries,
            total_hours,
        }
    }

    pub fn status(store: &RecordStore, user_id: &str, now: DateTime<Utc>) -> StatusReport {
        match store.get(user_id) {
            None => StatusReport::NoRecord,
            Some(r) => match r.active {
                Some(since) => StatusReport::ClockedIn {
                    since,
                    minutes: (now - since).num_minutes().max(0),
                },
                None => StatusReport::ClockedOut,
            },
        }
    }

    /// Sum of logged hours over every user.
    pub fn total_hours(store: &RecordStore) -> f64 {
        store.records().values().map(|r| r.total_hours()).sum()
    }
}

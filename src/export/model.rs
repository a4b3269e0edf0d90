// src/export/model.rs

use crate::models::DateRange;
use crate::store::RecordStore;
use chrono::SecondsFormat;
use serde::Serialize;

/// Flat row for CSV / JSON export of session logs.
#[derive(Serialize, Clone, Debug)]
pub struct LogExport {
    pub user_id: String,
    pub display_name: String,
    pub start: String,
    pub end: String,
    pub hours: f64,
}

/// Rows ordered by user id, then chronologically.
pub(crate) fn collect_rows(
    store: &RecordStore,
    user_id: Option<&str>,
    range: &DateRange,
) -> Vec<LogExport> {
    store
        .records()
        .values()
        .filter(|r| user_id.is_none_or(|u| u == r.user_id))
        .flat_map(|r| {
            r.logs
                .iter()
                .filter(|l| range.contains(l.start))
                .map(move |l| LogExport {
                    user_id: r.user_id.clone(),
                    display_name: r.display_name.clone(),
                    start: l.start.to_rfc3339_opts(SecondsFormat::Secs, true),
                    end: l.end.to_rfc3339_opts(SecondsFormat::Secs, true),
                    hours: l.hours,
                })
        })
        .collect()
}

//! Load-time schema migration for timesheet snapshots.
//!
//! Older snapshots carry several shapes side by side:
//! - `active` as `{ "time": "<iso>" }` instead of a bare timestamp;
//! - `hours` as a two-decimal string instead of a number;
//! - records keyed by display name instead of by user id;
//! - records without `logs`.
//!
//! Everything is rewritten into version-2 [`SessionRecord`]s keyed by user
//! id before the store sees it, so mixed shapes never coexist in memory.

use crate::models::session::{SCHEMA_VERSION, SessionLog, SessionRecord};
use crate::models::timesheet::{History, Snapshot};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::{info, warn};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Records that were below the current schema version.
    pub upgraded: usize,
    /// Records that were keyed by something other than their user id.
    pub rekeyed: usize,
    /// Records merged into an already-present user.
    pub merged: usize,
    /// Entries or logs that could not be interpreted.
    pub dropped: usize,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        *self == MigrationReport::default()
    }
}

/// Turn a raw snapshot document into a typed, version-2 snapshot.
pub fn migrate_snapshot(raw: Value) -> (Snapshot, MigrationReport) {
    let mut report = MigrationReport::default();
    let mut out = Snapshot::new();

    let Value::Object(entries) = raw else {
        warn!("snapshot root is not an object, starting empty");
        report.dropped += 1;
        return (out, report);
    };

    for (key, value) in entries {
        let Some(record) = migrate_record(&key, value, &mut report) else {
            continue;
        };
        insert_or_merge(&mut out, record, &key, &mut report);
    }

    if !report.is_noop() {
        info!(
            upgraded = report.upgraded,
            rekeyed = report.rekeyed,
            merged = report.merged,
            dropped = report.dropped,
            "snapshot migrated to schema v{}",
            SCHEMA_VERSION
        );
    }

    (out, report)
}

/// Same as [`migrate_snapshot`] for every archived snapshot of a history
/// document.
pub fn migrate_history(raw: Value) -> History {
    let mut out = History::new();

    let Value::Object(archives) = raw else {
        warn!("history root is not an object, starting empty");
        return out;
    };

    for (archived_at, snapshot) in archives {
        let (records, _) = migrate_snapshot(snapshot);
        out.insert(archived_at, records);
    }

    out
}

fn migrate_record(key: &str, value: Value, report: &mut MigrationReport) -> Option<SessionRecord> {
    let Value::Object(obj) = value else {
        warn!(key, "dropping snapshot entry that is not an object");
        report.dropped += 1;
        return None;
    };

    let version = obj
        .get("version")
        .and_then(Value::as_u64)
        .map(|v| v as u32)
        .unwrap_or(1);
    if version < SCHEMA_VERSION {
        report.upgraded += 1;
    }

    let user_id = str_field(&obj, "userId").unwrap_or_else(|| key.to_string());
    if user_id.is_empty() {
        warn!(key, "dropping snapshot entry without a user id");
        report.dropped += 1;
        return None;
    }

    let display_name = str_field(&obj, "displayName")
        .or_else(|| str_field(&obj, "username"))
        .unwrap_or_else(|| if key != user_id { key.to_string() } else { String::new() });

    let active = match obj.get("active") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => parse_ts(s),
        Some(Value::Object(o)) => o.get("time").and_then(Value::as_str).and_then(parse_ts),
        Some(other) => {
            warn!(key, value = %other, "unreadable active session, treating as clocked out");
            None
        }
    };

    let mut logs = Vec::new();
    if let Some(Value::Array(items)) = obj.get("logs") {
        for item in items {
            match migrate_log(item) {
                Some(log) => logs.push(log),
                None => {
                    warn!(key, "dropping unreadable session log");
                    report.dropped += 1;
                }
            }
        }
    }
    logs.sort_by_key(|l| l.start);

    Some(SessionRecord {
        version: SCHEMA_VERSION,
        user_id,
        display_name,
        active,
        logs,
    })
}

/// Hours are always recomputed from the bounds; the stored value may be a
/// rounded string.
fn migrate_log(value: &Value) -> Option<SessionLog> {
    let start = value.get("start").and_then(Value::as_str).and_then(parse_ts)?;
    let end = value.get("end").and_then(Value::as_str).and_then(parse_ts)?;
    Some(SessionLog::new(start, end))
}

fn insert_or_merge(
    out: &mut Snapshot,
    record: SessionRecord,
    key: &str,
    report: &mut MigrationReport,
) {
    let canonical_key = key == record.user_id;
    if !canonical_key {
        report.rekeyed += 1;
    }

    match out.get_mut(&record.user_id) {
        None => {
            out.insert(record.user_id.clone(), record);
        }
        Some(existing) => {
            report.merged += 1;

            if canonical_key || existing.display_name.is_empty() {
                existing.display_name = record.display_name;
            }

            existing.active = match (existing.active, record.active) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };

            let mut seen: BTreeSet<(DateTime<Utc>, DateTime<Utc>)> =
                existing.logs.iter().map(|l| (l.start, l.end)).collect();
            for log in record.logs {
                if seen.insert((log.start, log.end)) {
                    existing.logs.push(log);
                }
            }
            existing.logs.sort_by_key(|l| l.start);
        }
    }
}

fn str_field(obj: &Map<String, Value>, name: &str) -> Option<String> {
    obj.get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_ts(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

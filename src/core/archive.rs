use crate::errors::AppResult;
use crate::models::{ArchiveSummary, DateRange, SessionRecord, Snapshot};
use crate::store::RecordStore;
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::info;

pub struct ArchiveLogic;

impl ArchiveLogic {
    /// Move logs into the history document, keyed by the archive time.
    ///
    /// Without bounds every record (logs and open sessions) is archived and
    /// the live store is emptied. With bounds only logs whose start falls in
    /// the range move; open sessions stay where they are.
    ///
    /// History is written before the live records change, so a failed
    /// history write leaves the timesheet untouched.
    pub fn archive_and_reset(
        store: &mut RecordStore,
        range: &DateRange,
        now: DateTime<Utc>,
    ) -> AppResult<ArchiveSummary> {
        let archive_key = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let archived = Self::select(store.records(), range);

        let logs_moved: usize = archived.values().map(|r| r.logs.len()).sum();
        let active_cleared = archived.values().filter(|r| r.active.is_some()).count();
        let summary = ArchiveSummary {
            archive_key: archive_key.clone(),
            users: archived.len(),
            logs_moved,
            active_cleared,
        };

        if !archived.is_empty() {
            let mut history = store.load_history();
            let slot = history.entry(archive_key).or_default();
            for (user_id, record) in archived {
                match slot.get_mut(&user_id) {
                    Some(existing) => existing.logs.extend(record.logs),
                    None => {
                        slot.insert(user_id, record);
                    }
                }
            }
            store.write_history(&history)?;
        }

        if range.is_unbounded() {
            store.records_mut().clear();
        } else {
            let records = store.records_mut();
            for record in records.values_mut() {
                record.logs.retain(|l| !range.contains(l.start));
            }
            records.retain(|_, r| !r.is_empty());
        }

        info!(
            archive = %summary.archive_key,
            users = summary.users,
            logs = summary.logs_moved,
            "timesheet archived"
        );
        Ok(summary)
    }

    fn select(records: &Snapshot, range: &DateRange) -> Snapshot {
        if range.is_unbounded() {
            return records
                .iter()
                .filter(|(_, r)| !r.is_empty())
                .map(|(k, r)| (k.clone(), r.clone()))
                .collect();
        }

        records
            .iter()
            .filter_map(|(k, r)| {
                let logs: Vec<_> = r
                    .logs
                    .iter()
                    .filter(|l| range.contains(l.start))
                    .cloned()
                    .collect();
                if logs.is_empty() {
                    return None;
                }
                Some((
                    k.clone(),
                    SessionRecord {
                        active: None,
                        logs,
                        ..SessionRecord::new(&r.user_id, &r.display_name)
                    },
                ))
            })
            .collect()
    }
}

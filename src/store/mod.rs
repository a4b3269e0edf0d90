//! Record Store: the single authoritative user → [`SessionRecord`] map.
//!
//! [`RecordStore`] is the plain owned map plus its load/flush logic.
//! [`SharedStore`] is the handle the rest of the bot receives: every
//! mutation runs as one synchronous closure under the lock and is flushed
//! before the lock is released, so no read-check-write sequence can span an
//! await point.

pub mod fs_utils;
pub mod migrate;

use crate::errors::AppResult;
use crate::mirror::RemoteMirror;
use crate::models::{History, SessionRecord, Snapshot};
use fs_utils::{read_json_soft, write_atomic};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error};

pub struct RecordStore {
    path: PathBuf,
    history_path: PathBuf,
    records: Snapshot,
    dirty: bool,
}

impl RecordStore {
    /// Load the snapshot at `path`. Missing or corrupt files give an empty
    /// store; this never fails.
    pub fn load(path: &Path, history_path: &Path) -> Self {
        let records = match read_json_soft(path) {
            Some(raw) => migrate::migrate_snapshot(raw).0,
            None => Snapshot::new(),
        };

        debug!(path = %path.display(), users = records.len(), "timesheet loaded");

        Self {
            path: path.to_path_buf(),
            history_path: history_path.to_path_buf(),
            records,
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    pub fn get(&self, user_id: &str) -> Option<&SessionRecord> {
        self.records.get(user_id)
    }

    pub fn get_mut(&mut self, user_id: &str) -> Option<&mut SessionRecord> {
        let record = self.records.get_mut(user_id);
        if record.is_some() {
            self.dirty = true;
        }
        record
    }

    /// Fetch the record for `user_id`, creating it on first use.
    pub fn entry(&mut self, user_id: &str, display_name: &str) -> &mut SessionRecord {
        self.dirty = true;
        self.records
            .entry(user_id.to_string())
            .or_insert_with(|| SessionRecord::new(user_id, display_name))
    }

    pub fn records(&self) -> &Snapshot {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut Snapshot {
        self.dirty = true;
        &mut self.records
    }

    /// User ids with an open session.
    pub fn active_users(&self) -> Vec<String> {
        self.records
            .values()
            .filter(|r| r.active.is_some())
            .map(|r| r.user_id.clone())
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }

    /// Write the whole map atomically and return what was written.
    pub fn flush(&mut self) -> AppResult<String> {
        let content = self.to_json()?;
        write_atomic(&self.path, &content)?;
        self.dirty = false;
        Ok(content)
    }

    pub fn load_history(&self) -> History {
        match read_json_soft(&self.history_path) {
            Some(raw) => migrate::migrate_history(raw),
            None => History::new(),
        }
    }

    pub fn write_history(&self, history: &History) -> AppResult<()> {
        let content = serde_json::to_string_pretty(history)?;
        write_atomic(&self.history_path, &content)?;
        Ok(())
    }
}

/// Cloneable handle to the process-wide [`RecordStore`].
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<RecordStore>>,
    mirror: Option<RemoteMirror>,
}

impl SharedStore {
    pub fn new(store: RecordStore, mirror: Option<RemoteMirror>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
            mirror,
        }
    }

    fn lock(&self) -> MutexGuard<'_, RecordStore> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn mirror(&self) -> Option<&RemoteMirror> {
        self.mirror.as_ref()
    }

    pub fn read<T>(&self, f: impl FnOnce(&RecordStore) -> T) -> T {
        f(&self.lock())
    }

    /// Apply `f` and flush in one critical section, then hand the written
    /// snapshot to the remote mirror.
    ///
    /// An error from `f` leaves nothing flushed. A disk failure during the
    /// flush is logged and does not fail the mutation: memory stays
    /// authoritative and the next flush rewrites the whole map.
    pub fn mutate<T>(&self, f: impl FnOnce(&mut RecordStore) -> AppResult<T>) -> AppResult<T> {
        let (out, written) = {
            let mut guard = self.lock();
            let out = f(&mut guard)?;
            let written = match guard.flush() {
                Ok(content) => Some(content),
                Err(e) => {
                    error!(path = %guard.path().display(), error = %e, "timesheet flush failed");
                    None
                }
            };
            (out, written)
        };

        if let (Some(content), Some(mirror)) = (written, &self.mirror) {
            mirror.schedule_push(content);
        }

        Ok(out)
    }

    /// Retry a flush that failed earlier. Used before a one-shot command
    /// exits so a disk error is not swallowed.
    pub fn ensure_flushed(&self) -> AppResult<()> {
        let mut guard = self.lock();
        if !guard.is_dirty() {
            return Ok(());
        }
        let content = guard.flush()?;
        drop(guard);

        if let Some(mirror) = &self.mirror {
            mirror.schedule_push(content);
        }
        Ok(())
    }

    /// Wait for the remote mirror to finish any pending push.
    pub async fn settle(&self) {
        if let Some(mirror) = &self.mirror {
            mirror.settle().await;
        }
    }
}

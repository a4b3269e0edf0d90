use crate::errors::{AppError, AppResult};
use crate::models::{ClockState, SessionLog};
use crate::store::RecordStore;
use chrono::{DateTime, Utc};
use tracing::info;

/// Per-user clock state machine: `ClockedOut ⇄ ClockedIn`.
///
/// Every transition is a plain synchronous mutation of the store; callers
/// run it inside [`crate::store::SharedStore::mutate`].
pub struct ClockLogic;

impl ClockLogic {
    pub fn state(store: &RecordStore, user_id: &str) -> ClockState {
        store
            .get(user_id)
            .map(|r| r.state())
            .unwrap_or(ClockState::ClockedOut)
    }

    /// Open a session. The record is created on first use and its display
    /// name refreshed on every clock-in.
    pub fn clock_in(
        store: &mut RecordStore,
        user_id: &str,
        display_name: &str,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        if Self::state(store, user_id).is_clocked_in() {
            return Err(AppError::AlreadyActive);
        }

        let record = store.entry(user_id, display_name);
        if !display_name.is_empty() {
            record.display_name = display_name.to_string();
        }
        record.active = Some(now);

        info!(user_id, at = %now, "clocked in");
        Ok(())
    }

    /// Close the open session and append it to the user's logs.
    pub fn clock_out(
        store: &mut RecordStore,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<SessionLog> {
        let record = store.get_mut(user_id).ok_or(AppError::NotActive)?;
        let start = record.active.take().ok_or(AppError::NotActive)?;

        let log = SessionLog::new(start, now);
        record.logs.push(log.clone());

        info!(user_id, hours = log.hours, "clocked out");
        Ok(log)
    }

    /// Same effect as [`ClockLogic::clock_out`], on behalf of someone else.
    /// Already clocked out is not an error: returns `None`.
    pub fn force_clock_out(
        store: &mut RecordStore,
        user_id: &str,
        now: DateTime<Utc>,
        reason: &str,
    ) -> Option<SessionLog> {
        if !Self::state(store, user_id).is_clocked_in() {
            return None;
        }

        let record = store.get_mut(user_id)?;
        let start = record.active.take()?;
        let log = SessionLog::new(start, now);
        record.logs.push(log.clone());

        info!(user_id, hours = log.hours, reason, "forced clock-out");
        Some(log)
    }
}

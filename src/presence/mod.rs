//! Presence Monitor: a clocked-in user must stay in voice or is clocked
//! out automatically.
//!
//! On departure two tasks are armed, a warning and a forced clock-out.
//! Both live in one registry keyed by user id, so rejoining, clocking out
//! and leaving again all go through the same cancel-and-replace path.

pub mod roster;

use crate::core::clock::ClockLogic;
use crate::notify::{Notice, Notifier};
use crate::store::SharedStore;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub use roster::{PresenceOracle, VoiceRoster, VoiceTransition};

const FORCED_REASON: &str = "left voice channel";

struct ArmedTimers {
    generation: u64,
    warn: JoinHandle<()>,
    kick: JoinHandle<()>,
}

impl ArmedTimers {
    fn abort(self) {
        self.warn.abort();
        self.kick.abort();
    }
}

struct MonitorInner {
    store: SharedStore,
    oracle: Arc<dyn PresenceOracle>,
    notifier: Arc<dyn Notifier>,
    warn_after: Duration,
    kick_after: Duration,
    timers: Mutex<HashMap<String, ArmedTimers>>,
    generation: AtomicU64,
}

#[derive(Clone)]
pub struct PresenceMonitor {
    inner: Arc<MonitorInner>,
}

impl PresenceMonitor {
    pub fn new(
        store: SharedStore,
        oracle: Arc<dyn PresenceOracle>,
        notifier: Arc<dyn Notifier>,
        warn_after: Duration,
        kick_after: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(MonitorInner {
                store,
                oracle,
                notifier,
                warn_after,
                kick_after,
                timers: Mutex::new(HashMap::new()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    fn timers(&self) -> MutexGuard<'_, HashMap<String, ArmedTimers>> {
        self.inner
            .timers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Arm the warning and forced clock-out for `user_id`, replacing any
    /// timers already armed. No-op (returns `false`) unless clocked in.
    pub fn on_presence_lost(&self, user_id: &str, departed_at: DateTime<Utc>) -> bool {
        let clocked_in = self
            .inner
            .store
            .read(|s| ClockLogic::state(s, user_id).is_clocked_in());
        if !clocked_in {
            return false;
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed);

        // Spawned under the registry lock: a task that fires immediately
        // still finds its own entry when it goes to release it.
        let mut timers = self.timers();
        let warn = tokio::spawn(self.clone().warn_later(user_id.to_string()));
        let kick = tokio::spawn(self.clone().kick_later(
            user_id.to_string(),
            departed_at,
            generation,
        ));

        let armed = ArmedTimers {
            generation,
            warn,
            kick,
        };
        if let Some(previous) = timers.insert(user_id.to_string(), armed) {
            previous.abort();
        }

        info!(
            user_id,
            warn_after = ?self.inner.warn_after,
            kick_after = ?self.inner.kick_after,
            "left voice while clocked in, timers armed"
        );
        true
    }

    /// Back in voice: drop any pending warning/forced clock-out.
    pub fn on_presence_restored(&self, user_id: &str) -> bool {
        let cancelled = self.cancel(user_id);
        if cancelled {
            info!(user_id, "back in voice, timers cancelled");
        }
        cancelled
    }

    /// Cancel pending timers for `user_id`. Returns whether any were armed.
    pub fn cancel(&self, user_id: &str) -> bool {
        match self.timers().remove(user_id) {
            Some(armed) => {
                armed.abort();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        for (_, armed) in self.timers().drain() {
            armed.abort();
        }
    }

    pub fn is_armed(&self, user_id: &str) -> bool {
        self.timers().contains_key(user_id)
    }

    async fn warn_later(self, user_id: String) {
        tokio::time::sleep(self.inner.warn_after).await;

        if self.inner.oracle.is_present(&user_id) {
            return;
        }

        let remaining = self.inner.kick_after.saturating_sub(self.inner.warn_after);
        self.inner
            .notifier
            .notify(&user_id, Notice::PresenceWarning { remaining })
            .await;
    }

    async fn kick_later(self, user_id: String, departed_at: DateTime<Utc>, generation: u64) {
        tokio::time::sleep(self.inner.kick_after).await;

        self.release(&user_id, generation);

        // Re-check: the user may have rejoined and left again since.
        if self.inner.oracle.is_present(&user_id) {
            info!(user_id, "present again at deadline, session kept");
            return;
        }

        let ended_at = TimeDelta::from_std(self.inner.kick_after)
            .ok()
            .and_then(|d| departed_at.checked_add_signed(d))
            .unwrap_or_else(Utc::now);

        let result = self.inner.store.mutate(|s| {
            Ok(ClockLogic::force_clock_out(s, &user_id, ended_at, FORCED_REASON))
        });

        match result {
            Ok(Some(log)) => {
                self.inner
                    .notifier
                    .notify(&user_id, Notice::ForcedClockOut { hours: log.hours })
                    .await;
            }
            Ok(None) => {}
            Err(e) => error!(user_id, error = %e, "forced clock-out failed"),
        }
    }

    /// Drop the registry entry of a fired timer pair, unless it has been
    /// replaced by a newer departure in the meantime.
    fn release(&self, user_id: &str, generation: u64) {
        let mut timers = self.timers();
        if timers
            .get(user_id)
            .is_some_and(|armed| armed.generation == generation)
        {
            timers.remove(user_id);
        }
    }
}

//! User-facing notifications raised outside of a command reply.

use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Left voice while clocked in; `remaining` until the forced clock-out.
    PresenceWarning { remaining: Duration },
    /// Clocked out automatically after staying out of voice.
    ForcedClockOut { hours: f64 },
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::PresenceWarning { remaining } => format!(
                "⚠️ You left voice while clocked in. Rejoin within {} or you will be clocked out.",
                human_duration(*remaining)
            ),
            Notice::ForcedClockOut { hours } => format!(
                "⛔ You were automatically clocked out for staying out of voice ({:.2}h logged).",
                hours
            ),
        }
    }
}

fn human_duration(d: Duration) -> String {
    let secs = d.as_secs();
    match (secs / 60, secs % 60) {
        (0, s) => format!("{s} seconds"),
        (m, 0) => format!("{m} minutes"),
        (m, s) => format!("{m}m {s}s"),
    }
}

/// Delivery channel for [`Notice`]s (a direct message on the platform).
/// Delivery is best effort: implementations log failures, never return them.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, user_id: &str, notice: Notice);
}

/// Notifier that only records notices in the log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, user_id: &str, notice: Notice) {
        info!(user_id, notice = %notice.message(), "notice");
    }
}

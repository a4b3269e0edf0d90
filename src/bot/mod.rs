//! Command surface: turns platform commands and voice-state updates into
//! state machine, store and presence operations. Every command resolves to
//! exactly one [`Reply`].

pub mod auth;
pub mod events;
pub mod replies;
pub mod serve;

use crate::core::archive::ArchiveLogic;
use crate::core::clock::ClockLogic;
use crate::core::timesheet::TimesheetLogic;
use crate::errors::{AppError, AppResult};
use crate::presence::{PresenceMonitor, PresenceOracle, VoiceRoster, VoiceTransition};
use crate::store::SharedStore;
use crate::utils::date::parse_range;
use auth::Privileged;
use chrono::{DateTime, Utc};
use events::{Actor, Command, VoiceStateEvent};
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub ok: bool,
    pub content: String,
}

impl Reply {
    pub fn ok(content: impl Into<String>) -> Self {
        Self {
            ok: true,
            content: content.into(),
        }
    }

    pub fn rejected(content: impl Into<String>) -> Self {
        Self {
            ok: false,
            content: content.into(),
        }
    }
}

pub struct Bot {
    store: SharedStore,
    presence: PresenceMonitor,
    roster: VoiceRoster,
    privileged: Privileged,
    require_voice: bool,
}

impl Bot {
    pub fn new(
        store: SharedStore,
        presence: PresenceMonitor,
        roster: VoiceRoster,
        privileged: Privileged,
        require_voice: bool,
    ) -> Self {
        Self {
            store,
            presence,
            roster,
            privileged,
            require_voice,
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn presence(&self) -> &PresenceMonitor {
        &self.presence
    }

    /// Run `command` for `actor`. User errors become rejected replies;
    /// system faults are logged and answered with a generic message.
    pub fn handle_command(
        &self,
        actor: &Actor,
        in_guild: bool,
        command: &Command,
        now: DateTime<Utc>,
    ) -> Reply {
        match self.execute(actor, in_guild, command, now) {
            Ok(content) => Reply::ok(content),
            Err(e) if e.is_user_error() => {
                debug!(user_id = %actor.id, ?command, reason = %e, "command rejected");
                Reply::rejected(format!("❌ {e}"))
            }
            Err(e) => {
                error!(user_id = %actor.id, ?command, error = %e, "command failed");
                Reply::rejected("❌ Something went wrong, please try again.")
            }
        }
    }

    fn execute(
        &self,
        actor: &Actor,
        in_guild: bool,
        command: &Command,
        now: DateTime<Utc>,
    ) -> AppResult<String> {
        match command {
            Command::ClockIn => {
                if !in_guild {
                    return Err(AppError::NotInGuild);
                }
                if self.require_voice && !self.roster.is_present(&actor.id) {
                    return Err(AppError::NotInVoice);
                }
                self.store
                    .mutate(|s| ClockLogic::clock_in(s, &actor.id, &actor.display_name, now))?;
                Ok(replies::clocked_in())
            }

            Command::ClockOut => {
                let log = self
                    .store
                    .mutate(|s| ClockLogic::clock_out(s, &actor.id, now))?;
                self.presence.cancel(&actor.id);
                Ok(replies::clocked_out(&log))
            }

            Command::Status { user } => {
                let target = user.as_deref().unwrap_or(&actor.id);
                let report = self.store.read(|s| TimesheetLogic::status(s, target, now));
                Ok(replies::status(&report))
            }

            Command::TimesheetView { user, start, end } => {
                let target = user.as_deref().unwrap_or(&actor.id);
                if target != actor.id {
                    self.privileged.require(actor)?;
                }
                let range = parse_range(start.as_deref(), end.as_deref())?;
                let mut view = self.store.read(|s| TimesheetLogic::view(s, target, &range));
                if view.display_name.is_empty() {
                    view.display_name = if target == actor.id && !actor.display_name.is_empty() {
                        actor.display_name.clone()
                    } else {
                        target.to_string()
                    };
                }
                Ok(replies::timesheet(&view))
            }

            Command::TimesheetReset { start, end } => {
                self.privileged.require(actor)?;
                let range = parse_range(start.as_deref(), end.as_deref())?;
                let summary = self
                    .store
                    .mutate(|s| ArchiveLogic::archive_and_reset(s, &range, now))?;
                if range.is_unbounded() {
                    self.presence.cancel_all();
                }
                Ok(replies::reset(&summary))
            }

            Command::TotalHours => {
                let total = self.store.read(TimesheetLogic::total_hours);
                Ok(replies::total_hours(total))
            }

            Command::ForceClockOut { user, reason } => {
                self.privileged.require(actor)?;
                let reason = reason
                    .clone()
                    .unwrap_or_else(|| format!("forced by {}", actor.id));
                let log = self
                    .store
                    .mutate(|s| Ok(ClockLogic::force_clock_out(s, user, now, &reason)))?;
                self.presence.cancel(user);
                Ok(replies::forced(user, log.as_ref()))
            }
        }
    }

    /// Record that `user_id` is currently in `channel`, as reported alongside
    /// a command. Covers users who were already in voice before the bot
    /// started and so never produced a join event.
    pub fn observe_voice(&self, user_id: &str, channel: &str, now: DateTime<Utc>) -> VoiceTransition {
        let event = VoiceStateEvent {
            user_id: user_id.to_string(),
            before: self.roster.channel_of(user_id),
            after: Some(channel.to_string()),
        };
        self.handle_voice(&event, now)
    }

    /// Feed a voice-state update into the roster and the presence monitor.
    pub fn handle_voice(&self, event: &VoiceStateEvent, now: DateTime<Utc>) -> VoiceTransition {
        let transition =
            self.roster
                .apply(&event.user_id, event.before.as_deref(), event.after.as_deref());

        match transition {
            VoiceTransition::Left => {
                self.presence.on_presence_lost(&event.user_id, now);
            }
            VoiceTransition::Joined => {
                self.presence.on_presence_restored(&event.user_id);
            }
            VoiceTransition::Moved | VoiceTransition::Unchanged => {}
        }

        transition
    }
}

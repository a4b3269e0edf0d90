//! Wire types of the line-delimited JSON event bridge.
//!
//! Inbound, one object per line on stdin:
//!
//! ```json
//! {"type":"command","interactionId":"42","user":{"id":"1","displayName":"Ann","roles":["Manager"]},"voiceChannel":"general","command":{"name":"clockin"}}
//! {"type":"voiceStateUpdate","userId":"1","before":"general","after":null}
//! ```
//!
//! Outbound, one object per line on stdout:
//!
//! ```json
//! {"type":"reply","interactionId":"42","ok":true,"content":"🟢 CLOCKED IN"}
//! {"type":"directMessage","userId":"1","content":"⚠️ You left voice ..."}
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inbound {
    Command(CommandEvent),
    VoiceStateUpdate(VoiceStateEvent),
}

/// The user invoking a command, as seen by the platform.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Actor {
    pub fn new(id: &str, display_name: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            roles: Vec::new(),
        }
    }

    pub fn with_roles(mut self, roles: &[&str]) -> Self {
        self.roles = roles.iter().map(|r| r.to_string()).collect();
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandEvent {
    pub interaction_id: String,
    pub user: Actor,
    #[serde(default = "default_in_guild")]
    pub in_guild: bool,
    /// Voice channel the invoker sits in, as seen by the gateway when the
    /// command was issued.
    #[serde(default)]
    pub voice_channel: Option<String>,
    pub command: Command,
}

fn default_in_guild() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "name")]
pub enum Command {
    #[serde(rename = "clockin")]
    ClockIn,
    #[serde(rename = "clockout")]
    ClockOut,
    #[serde(rename = "status")]
    Status {
        #[serde(default)]
        user: Option<String>,
    },
    #[serde(rename = "timesheet.view")]
    TimesheetView {
        #[serde(default)]
        user: Option<String>,
        #[serde(default)]
        start: Option<String>,
        #[serde(default)]
        end: Option<String>,
    },
    #[serde(rename = "timesheet.reset")]
    TimesheetReset {
        #[serde(default)]
        start: Option<String>,
        #[serde(default)]
        end: Option<String>,
    },
    #[serde(rename = "totalhr", alias = "totalhours")]
    TotalHours,
    #[serde(rename = "forceclockout")]
    ForceClockOut {
        user: String,
        #[serde(default)]
        reason: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceStateEvent {
    pub user_id: String,
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Outbound {
    Reply {
        interaction_id: String,
        ok: bool,
        content: String,
    },
    DirectMessage {
        user_id: String,
        content: String,
    },
}

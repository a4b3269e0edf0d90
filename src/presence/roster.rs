use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Answers "is this user in a voice channel right now?".
pub trait PresenceOracle: Send + Sync {
    fn is_present(&self, user_id: &str) -> bool;
}

/// What a voice-state update means for presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceTransition {
    Joined,
    Left,
    Moved,
    Unchanged,
}

impl VoiceTransition {
    pub fn from_states(before: Option<&str>, after: Option<&str>) -> Self {
        match (before, after) {
            (None, Some(_)) => VoiceTransition::Joined,
            (Some(_), None) => VoiceTransition::Left,
            (Some(a), Some(b)) if a != b => VoiceTransition::Moved,
            _ => VoiceTransition::Unchanged,
        }
    }
}

/// Last known voice channel of every user, fed by voice-state updates.
#[derive(Clone, Default)]
pub struct VoiceRoster {
    channels: Arc<Mutex<HashMap<String, String>>>,
}

impl VoiceRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an update and classify it.
    pub fn apply(&self, user_id: &str, before: Option<&str>, after: Option<&str>) -> VoiceTransition {
        let mut channels = self.channels.lock().unwrap_or_else(|p| p.into_inner());
        match after {
            Some(channel) => {
                channels.insert(user_id.to_string(), channel.to_string());
            }
            None => {
                channels.remove(user_id);
            }
        }
        VoiceTransition::from_states(before, after)
    }

    pub fn channel_of(&self, user_id: &str) -> Option<String> {
        self.channels
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(user_id)
            .cloned()
    }
}

impl PresenceOracle for VoiceRoster {
    fn is_present(&self, user_id: &str) -> bool {
        self.channel_of(user_id).is_some()
    }
}

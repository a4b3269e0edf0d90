use super::events::Actor;
use crate::config::PrivilegedConfig;
use crate::errors::{AppError, AppResult};
use std::collections::HashSet;

/// Static allow-list of privileged user ids and role names. Built once
/// from configuration; changes need a restart.
#[derive(Debug, Clone, Default)]
pub struct Privileged {
    user_ids: HashSet<String>,
    roles: HashSet<String>,
}

impl Privileged {
    pub fn from_config(cfg: &PrivilegedConfig) -> Self {
        Self {
            user_ids: cfg.user_ids.iter().map(|s| s.trim().to_string()).collect(),
            roles: cfg.roles.iter().map(|s| s.trim().to_string()).collect(),
        }
    }

    pub fn is_privileged(&self, actor: &Actor) -> bool {
        self.user_ids.contains(&actor.id) || actor.roles.iter().any(|r| self.roles.contains(r))
    }

    pub fn require(&self, actor: &Actor) -> AppResult<()> {
        if self.is_privileged(actor) {
            Ok(())
        } else {
            Err(AppError::NotAuthorized)
        }
    }
}

use crate::errors::{AppError, AppResult};
use crate::utils::path::{expand_tilde, resolve_in};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: String,
    #[serde(default = "default_history_file")]
    pub history_file: String,
    #[serde(default)]
    pub privileged: PrivilegedConfig,
    #[serde(default)]
    pub presence: PresenceConfig,
    #[serde(default)]
    pub mirror: MirrorConfig,
    #[serde(default)]
    pub keepalive: KeepAliveConfig,
}

/// Static allow-list for privileged commands. Read once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivilegedConfig {
    #[serde(default)]
    pub user_ids: Vec<String>,
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceConfig {
    #[serde(default = "default_warn_after")]
    pub warn_after_secs: u64,
    #[serde(default = "default_kick_after")]
    pub kick_after_secs: u64,
    #[serde(default = "default_true")]
    pub require_voice_for_clock_in: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub repo: String,
    #[serde(default = "default_mirror_path")]
    pub path: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_debounce")]
    pub debounce_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeepAliveConfig {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub ping_url: Option<String>,
}

fn default_data_dir() -> String {
    Config::config_dir().to_string_lossy().to_string()
}
fn default_snapshot_file() -> String {
    "timesheet.json".to_string()
}
fn default_history_file() -> String {
    "timesheetHistory.json".to_string()
}
fn default_roles() -> Vec<String> {
    vec!["Manager".to_string()]
}
fn default_warn_after() -> u64 {
    150
}
fn default_kick_after() -> u64 {
    300
}
fn default_true() -> bool {
    true
}
fn default_mirror_path() -> String {
    "timesheet.json".to_string()
}
fn default_branch() -> String {
    "main".to_string()
}
fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}
fn default_api_base() -> String {
    "https://api.github.com".to_string()
}
fn default_debounce() -> u64 {
    3
}

impl Default for PrivilegedConfig {
    fn default() -> Self {
        Self {
            user_ids: Vec::new(),
            roles: default_roles(),
        }
    }
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            warn_after_secs: default_warn_after(),
            kick_after_secs: default_kick_after(),
            require_voice_for_clock_in: default_true(),
        }
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            owner: String::new(),
            repo: String::new(),
            path: default_mirror_path(),
            branch: default_branch(),
            token_env: default_token_env(),
            api_base: default_api_base(),
            debounce_secs: default_debounce(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            snapshot_file: default_snapshot_file(),
            history_file: default_history_file(),
            privileged: PrivilegedConfig::default(),
            presence: PresenceConfig::default(),
            mirror: MirrorConfig::default(),
            keepalive: KeepAliveConfig::default(),
        }
    }
}

impl PresenceConfig {
    pub fn warn_after(&self) -> Duration {
        Duration::from_secs(self.warn_after_secs)
    }

    pub fn kick_after(&self) -> Duration {
        Duration::from_secs(self.kick_after_secs)
    }
}

impl MirrorConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_secs(self.debounce_secs)
    }

    /// Bearer token for the remote store. A mirror that is enabled but has
    /// no token is a startup error, never a silent downgrade.
    pub fn token(&self) -> AppResult<Option<String>> {
        if !self.enabled {
            return Ok(None);
        }
        if self.owner.trim().is_empty() || self.repo.trim().is_empty() {
            return Err(AppError::Config(
                "mirror.owner and mirror.repo are required when the mirror is enabled".into(),
            ));
        }
        match env::var(&self.token_env) {
            Ok(t) if !t.trim().is_empty() => Ok(Some(t)),
            _ => Err(AppError::MissingCredential(self.token_env.clone())),
        }
    }
}

impl Config {
    /// Return the standard configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".clockbot")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("clockbot.conf")
    }

    /// Load configuration from `path` (or the default location), falling
    /// back to defaults when the file does not exist. Environment overrides
    /// are applied last.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_file);

        let mut cfg = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_yaml::from_str(&content)
                .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?
        } else {
            Config::default()
        };

        cfg.apply_env();
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = env::var("CLOCKBOT_DATA_DIR")
            && !dir.trim().is_empty()
        {
            self.data_dir = dir;
        }
        if let Ok(port) = env::var("PORT")
            && let Ok(p) = port.trim().parse::<u16>()
        {
            self.keepalive.port = Some(p);
        }
        if let Ok(url) = env::var("PING_URL")
            && !url.trim().is_empty()
        {
            self.keepalive.ping_url = Some(url);
        }
    }

    pub fn data_path(&self) -> PathBuf {
        expand_tilde(&self.data_dir)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        resolve_in(&self.data_path(), &self.snapshot_file)
    }

    pub fn history_path(&self) -> PathBuf {
        resolve_in(&self.data_path(), &self.history_file)
    }

    /// Write a default configuration file and create the data directory.
    pub fn init_all(path: Option<&Path>, data_dir: Option<&str>) -> AppResult<PathBuf> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_file);

        let mut config = Config::default();
        if let Some(d) = data_dir {
            config.data_dir = d.to_string();
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::create_dir_all(config.data_path())?;

        let yaml = serde_yaml::to_string(&config).map_err(|e| AppError::Config(e.to_string()))?;
        fs::write(&path, yaml)?;

        Ok(path)
    }
}

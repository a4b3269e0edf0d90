#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clockbot::errors::{AppError, AppResult};
use clockbot::mirror::{RemoteFile, RemoteStore};
use clockbot::notify::{Notice, Notifier};
use clockbot::store::{RecordStore, SharedStore};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// `clockbot` with a clean environment and the config file inside `dir`.
pub fn cb_config(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("clockbot");
    cmd.env_remove("CLOCKBOT_DATA_DIR")
        .env_remove("RUST_LOG")
        .env_remove("PORT")
        .env_remove("PING_URL")
        .arg("--config")
        .arg(dir.join("clockbot.conf"));
    cmd
}

/// `clockbot` bound to a throw-away config file and data directory.
pub fn cb(dir: &Path) -> Command {
    let mut cmd = cb_config(dir);
    cmd.arg("--data-dir").arg(dir);
    cmd
}

pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid RFC 3339 timestamp")
        .with_timezone(&Utc)
}

/// A store rooted in `dir`, without remote mirror.
pub fn temp_store(dir: &Path) -> SharedStore {
    SharedStore::new(open_records(dir), None)
}

pub fn open_records(dir: &Path) -> RecordStore {
    RecordStore::load(
        &dir.join("timesheet.json"),
        &dir.join("timesheetHistory.json"),
    )
}

/// Notifier that keeps every notice for later inspection.
#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<(String, Notice)>>,
}

impl RecordingNotifier {
    pub fn taken(&self) -> Vec<(String, Notice)> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, user_id: &str, notice: Notice) {
        self.notices
            .lock()
            .unwrap()
            .push((user_id.to_string(), notice));
    }
}

/// In-memory remote file store with version tags `v1`, `v2`, ...
#[derive(Default)]
pub struct FakeRemote {
    pub file: Mutex<Option<RemoteFile>>,
    /// (content, sha sent) of every successful put
    pub puts: Mutex<Vec<(String, Option<String>)>>,
    pub fail_puts: AtomicBool,
    pub put_delay: Option<Duration>,
}

impl FakeRemote {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            put_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn puts(&self) -> Vec<(String, Option<String>)> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteStore for FakeRemote {
    async fn fetch(&self, _path: &str, _branch: &str) -> AppResult<Option<RemoteFile>> {
        Ok(self.file.lock().unwrap().clone())
    }

    async fn put(
        &self,
        _path: &str,
        content: &str,
        sha: Option<&str>,
        _branch: &str,
        _message: &str,
    ) -> AppResult<()> {
        if let Some(delay) = self.put_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(AppError::Remote("simulated outage".into()));
        }

        let mut puts = self.puts.lock().unwrap();
        puts.push((content.to_string(), sha.map(str::to_string)));
        *self.file.lock().unwrap() = Some(RemoteFile {
            sha: format!("v{}", puts.len()),
            content: content.to_string(),
        });
        Ok(())
    }
}

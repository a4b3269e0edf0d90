//! Remote Mirror: best-effort, debounced backup of the timesheet snapshot
//! to a versioned remote file store.
//!
//! The push cycle is an explicit state machine:
//!
//! ```text
//! Idle --schedule--> Scheduled --debounce elapsed--> Pushing --done--> Idle
//!                        ^                              |
//!                        +------ scheduled meanwhile ---+
//! ```
//!
//! Schedules that arrive while `Scheduled` only replace the pending
//! content. Schedules that arrive while `Pushing` request one follow-up
//! cycle carrying the newest content.

pub mod github;

use crate::errors::AppResult;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

pub use github::GitHubStore;

/// A file as stored remotely, with its version tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub sha: String,
    pub content: String,
}

/// Versioned remote file store (e.g. a git repository contents API).
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Current content and version tag, `None` when the file does not exist.
    async fn fetch(&self, path: &str, branch: &str) -> AppResult<Option<RemoteFile>>;

    /// Upload `content`. `sha` is the version tag being replaced, `None` to
    /// create the file.
    async fn put(
        &self,
        path: &str,
        content: &str,
        sha: Option<&str>,
        branch: &str,
        message: &str,
    ) -> AppResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorState {
    Idle,
    Scheduled,
    Pushing,
}

struct Inner {
    state: MirrorState,
    pending: Option<String>,
    follow_up: bool,
    task: Option<JoinHandle<()>>,
}

#[derive(Clone)]
pub struct RemoteMirror {
    inner: Arc<Mutex<Inner>>,
    remote: Arc<dyn RemoteStore>,
    path: String,
    branch: String,
    debounce: Duration,
}

impl RemoteMirror {
    pub fn new(remote: Arc<dyn RemoteStore>, path: &str, branch: &str, debounce: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: MirrorState::Idle,
                pending: None,
                follow_up: false,
                task: None,
            })),
            remote,
            path: path.to_string(),
            branch: branch.to_string(),
            debounce,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> MirrorState {
        self.lock().state
    }

    /// Queue `content` for upload. Never blocks and never fails; must be
    /// called from within a tokio runtime.
    pub fn schedule_push(&self, content: String) {
        let mut inner = self.lock();
        inner.pending = Some(content);

        match inner.state {
            MirrorState::Idle => {
                inner.state = MirrorState::Scheduled;
                let this = self.clone();
                inner.task = Some(tokio::spawn(async move { this.run().await }));
                debug!(path = %self.path, "mirror push scheduled");
            }
            MirrorState::Scheduled => {
                debug!(path = %self.path, "mirror push coalesced");
            }
            MirrorState::Pushing => {
                inner.follow_up = true;
            }
        }
    }

    async fn run(self) {
        loop {
            tokio::time::sleep(self.debounce).await;

            let content = {
                let mut inner = self.lock();
                inner.state = MirrorState::Pushing;
                inner.follow_up = false;
                inner.pending.take()
            };

            if let Some(content) = content
                && let Err(e) = self.push(&content).await
            {
                error!(path = %self.path, error = %e, "mirror push failed, will retry on next flush");
            }

            let mut inner = self.lock();
            if inner.follow_up && inner.pending.is_some() {
                inner.state = MirrorState::Scheduled;
                continue;
            }
            inner.state = MirrorState::Idle;
            inner.follow_up = false;
            break;
        }
    }

    /// Read the current remote version tag, then overwrite. A concurrent
    /// remote writer is not reconciled: last write wins.
    pub async fn push(&self, content: &str) -> AppResult<()> {
        let sha = match self.remote.fetch(&self.path, &self.branch).await {
            Ok(Some(file)) if file.content == content => {
                debug!(path = %self.path, "remote copy already up to date");
                return Ok(());
            }
            Ok(Some(file)) => Some(file.sha),
            Ok(None) => None,
            Err(e) => {
                warn!(path = %self.path, error = %e, "cannot read remote version, creating file");
                None
            }
        };

        let message = format!(
            "Update {} ({})",
            self.path,
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        self.remote
            .put(&self.path, content, sha.as_deref(), &self.branch, &message)
            .await?;

        info!(path = %self.path, branch = %self.branch, bytes = content.len(), "timesheet mirrored");
        Ok(())
    }

    /// Wait until the currently scheduled or running push cycle is over.
    pub async fn settle(&self) {
        let task = self.lock().task.take();
        if let Some(task) = task
            && let Err(e) = task.await
        {
            warn!(error = %e, "mirror task ended abnormally");
        }
    }
}

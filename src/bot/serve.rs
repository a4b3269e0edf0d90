//! Line-delimited JSON bridge between the platform gateway adapter and the
//! [`Bot`]: inbound events on stdin, replies and direct messages on stdout.

use super::Bot;
use super::events::{Inbound, Outbound};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::keepalive;
use crate::notify::{Notice, Notifier};
use crate::presence::VoiceRoster;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const WRITER_DRAIN: Duration = Duration::from_secs(5);

/// Delivers notices as `directMessage` lines.
pub struct OutboundNotifier {
    tx: UnboundedSender<Outbound>,
}

impl OutboundNotifier {
    pub fn new(tx: UnboundedSender<Outbound>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Notifier for OutboundNotifier {
    async fn notify(&self, user_id: &str, notice: Notice) {
        let msg = Outbound::DirectMessage {
            user_id: user_id.to_string(),
            content: notice.message(),
        };
        if self.tx.send(msg).is_err() {
            warn!(user_id, "bridge output closed, notice dropped");
        }
    }
}

/// Handle one inbound line. Commands always produce a reply, even when the
/// command itself cannot be understood.
pub fn handle_line(bot: &Bot, line: &str, now: DateTime<Utc>) -> Option<Outbound> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "ignoring malformed bridge line");
            return None;
        }
    };

    match serde_json::from_value::<Inbound>(value.clone()) {
        Ok(Inbound::Command(ev)) => {
            if let Some(channel) = ev.voice_channel.as_deref() {
                bot.observe_voice(&ev.user.id, channel, now);
            }
            let reply = bot.handle_command(&ev.user, ev.in_guild, &ev.command, now);
            Some(Outbound::Reply {
                interaction_id: ev.interaction_id,
                ok: reply.ok,
                content: reply.content,
            })
        }
        Ok(Inbound::VoiceStateUpdate(ev)) => {
            let transition = bot.handle_voice(&ev, now);
            debug!(user_id = %ev.user_id, ?transition, "voice state update");
            None
        }
        Err(e) => undeliverable_command(&value, &e),
    }
}

/// A command line we could not decode still gets its rejected reply.
fn undeliverable_command(value: &Value, err: &serde_json::Error) -> Option<Outbound> {
    let interaction_id = value.get("interactionId").and_then(Value::as_str);
    let is_command = value.get("type").and_then(Value::as_str) == Some("command");

    match (is_command, interaction_id) {
        (true, Some(id)) => {
            let name = value
                .pointer("/command/name")
                .and_then(Value::as_str)
                .unwrap_or("?");
            debug!(interaction_id = id, error = %err, "undecodable command");
            Some(Outbound::Reply {
                interaction_id: id.to_string(),
                ok: false,
                content: format!("❌ {}", AppError::UnknownCommand(name.to_string())),
            })
        }
        _ => {
            warn!(error = %err, "ignoring unrecognised bridge event");
            None
        }
    }
}

/// Read events until EOF or `shutdown` resolves. Returns the number of
/// lines consumed.
pub async fn run_bridge<R, F>(
    bot: &Bot,
    input: R,
    tx: &UnboundedSender<Outbound>,
    shutdown: F,
) -> AppResult<usize>
where
    R: AsyncBufRead + Unpin,
    F: Future<Output = ()>,
{
    let mut lines = input.lines();
    let mut count = 0usize;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    count += 1;
                    if let Some(out) = handle_line(bot, &line, Utc::now())
                        && tx.send(out).is_err()
                    {
                        warn!("bridge output closed");
                        break;
                    }
                }
                None => {
                    info!(lines = count, "bridge input closed");
                    break;
                }
            },
            _ = &mut shutdown => {
                info!("shutdown requested");
                break;
            }
        }
    }

    Ok(count)
}

/// Serialize outbound messages as JSON lines until every sender is gone.
pub fn spawn_writer<W>(mut rx: UnboundedReceiver<Outbound>, mut out: W) -> JoinHandle<AppResult<()>>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let mut line = serde_json::to_string(&msg)?;
            line.push('\n');
            out.write_all(line.as_bytes()).await?;
            out.flush().await?;
        }
        Ok(())
    })
}

/// `clockbot serve`: wire config, store, presence and keep-alive to
/// stdin/stdout and run until EOF or Ctrl-C.
pub async fn serve_stdio(cfg: &Config) -> AppResult<()> {
    let store = crate::open_store(cfg)?;
    let (tx, rx) = unbounded_channel();
    let notifier = Arc::new(OutboundNotifier::new(tx.clone()));
    let bot = crate::build_bot(
        cfg,
        store.clone(),
        VoiceRoster::new(),
        notifier,
        cfg.presence.require_voice_for_clock_in,
    );

    let keepalive_tasks = keepalive::start(&cfg.keepalive);
    let writer = spawn_writer(rx, tokio::io::stdout());

    info!(
        snapshot = %cfg.snapshot_path().display(),
        clocked_in = store.read(|s| s.active_users().len()),
        mirror = cfg.mirror.enabled,
        "clockbot serving on stdin/stdout"
    );

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    let result = run_bridge(&bot, BufReader::new(tokio::io::stdin()), &tx, shutdown).await;

    bot.presence().cancel_all();
    store.settle().await;
    for task in keepalive_tasks {
        task.abort();
    }

    drop(bot);
    drop(tx);
    match tokio::time::timeout(WRITER_DRAIN, writer).await {
        Ok(Ok(r)) => r?,
        Ok(Err(e)) => warn!(error = %e, "bridge writer ended abnormally"),
        Err(_) => warn!("bridge writer did not drain in time"),
    }

    result.map(|_| ())
}

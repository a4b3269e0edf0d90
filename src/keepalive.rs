//! Keep-alive for hosts that idle processes without inbound HTTP traffic:
//! a tiny liveness endpoint plus an optional periodic self-ping.

use crate::config::KeepAliveConfig;
use axum::Router;
use axum::routing::get;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

const PING_INTERVAL: Duration = Duration::from_secs(300);
const ALIVE_BODY: &str = "🟢 Clock Bot Alive";

pub fn router() -> Router {
    Router::new().route("/", get(|| async { ALIVE_BODY }))
}

/// Start whatever the configuration asks for. Returns the spawned tasks so
/// the caller can abort them on shutdown.
pub fn start(cfg: &KeepAliveConfig) -> Vec<JoinHandle<()>> {
    let mut tasks = Vec::new();

    if let Some(port) = cfg.port {
        tasks.push(tokio::spawn(serve(port)));
    }

    match cfg.ping_url.clone() {
        Some(url) => tasks.push(tokio::spawn(self_ping(url))),
        None if cfg.port.is_some() => warn!("no ping_url set, self-ping disabled"),
        None => {}
    }

    tasks
}

async fn serve(port: u16) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            warn!(%addr, error = %e, "keep-alive server could not bind");
            return;
        }
    };

    info!(%addr, "keep-alive server listening");
    if let Err(e) = axum::serve(listener, router()).await {
        warn!(error = %e, "keep-alive server stopped");
    }
}

async fn self_ping(url: String) {
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "self-ping disabled, cannot build HTTP client");
            return;
        }
    };

    let mut ticker = tokio::time::interval(PING_INTERVAL);
    ticker.tick().await;
    loop {
        ticker.tick().await;
        match client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => info!(%url, "self-ping ok"),
            Ok(resp) => warn!(%url, status = %resp.status(), "self-ping answered with an error"),
            Err(e) => warn!(%url, error = %e, "self-ping failed"),
        }
    }
}

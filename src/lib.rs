//! clockbot library root.
//! Exposes the CLI parser, the high-level `run()` function, the bot wiring
//! helpers and the internal modules.

pub mod bot;
pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod export;
pub mod keepalive;
pub mod logging;
pub mod mirror;
pub mod models;
pub mod notify;
pub mod presence;
pub mod store;
pub mod ui;
pub mod utils;

use bot::Bot;
use bot::auth::Privileged;
use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use mirror::RemoteMirror;
use mirror::github::GitHubStore;
use notify::Notifier;
use presence::PresenceMonitor;
use presence::roster::VoiceRoster;
use std::path::Path;
use std::sync::Arc;
use store::{RecordStore, SharedStore};

/// Load the timesheet and, when the mirror is enabled, attach the GitHub
/// mirror to it. An enabled mirror without a token fails here.
pub fn open_store(cfg: &Config) -> AppResult<SharedStore> {
    let mirror = match cfg.mirror.token()? {
        Some(token) => {
            let remote = GitHubStore::new(
                &cfg.mirror.api_base,
                &cfg.mirror.owner,
                &cfg.mirror.repo,
                &token,
            )?;
            Some(RemoteMirror::new(
                Arc::new(remote),
                &cfg.mirror.path,
                &cfg.mirror.branch,
                cfg.mirror.debounce(),
            ))
        }
        None => None,
    };

    let records = RecordStore::load(&cfg.snapshot_path(), &cfg.history_path());
    Ok(SharedStore::new(records, mirror))
}

/// Assemble a [`Bot`] whose presence monitor watches `roster`.
pub fn build_bot(
    cfg: &Config,
    store: SharedStore,
    roster: VoiceRoster,
    notifier: Arc<dyn Notifier>,
    require_voice: bool,
) -> Bot {
    let presence = PresenceMonitor::new(
        store.clone(),
        Arc::new(roster.clone()),
        notifier,
        cfg.presence.warn_after(),
        cfg.presence.kick_after(),
    );

    Bot::new(
        store,
        presence,
        roster,
        Privileged::from_config(&cfg.privileged),
        require_voice,
    )
}

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Serve => bot::serve::serve_stdio(cfg).await,
        Commands::ClockIn { .. } | Commands::ClockOut { .. } | Commands::ForceClockOut { .. } => {
            cli::commands::clock::handle(&cli.command, cfg).await
        }
        Commands::Status { .. } | Commands::Total => {
            cli::commands::status::handle(&cli.command, cfg)
        }
        Commands::Timesheet { action } => cli::commands::timesheet::handle(action, cfg).await,
        Commands::Backup { .. } => cli::commands::backup::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut cfg = Config::load(cli.config.as_deref().map(Path::new))?;
    if let Some(dir) = &cli.data_dir {
        cfg.data_dir = dir.clone();
    }

    dispatch(&cli, &cfg).await
}

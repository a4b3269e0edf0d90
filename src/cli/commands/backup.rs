use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::errors::AppResult;
use crate::ui::messages;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup {
        file,
        compress,
        force,
    } = cmd
    {
        let written = BackupLogic::backup(
            &cfg.snapshot_path(),
            &cfg.history_path(),
            Path::new(file),
            *compress,
            *force,
        )?;
        messages::done(format!("Backup created: {}", written.display()));
    }

    Ok(())
}

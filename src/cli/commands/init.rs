use crate::cli::parser::Cli;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages;
use std::path::Path;

/// Handle the `init` command
///
/// This creates the configuration file (default location or `--config`)
/// and the data directory that will hold the timesheet.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let path = Config::init_all(cli.config.as_deref().map(Path::new), cli.data_dir.as_deref())?;
    let cfg = Config::load(Some(&path))?;

    println!("📄 Config file : {}", path.display());
    println!("🗂️  Timesheet   : {}", cfg.snapshot_path().display());
    println!("🗄️  History     : {}", cfg.history_path().display());
    messages::done("clockbot initialization completed!");
    Ok(())
}

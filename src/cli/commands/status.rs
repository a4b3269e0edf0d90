use crate::bot::{Reply, replies};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::timesheet::TimesheetLogic;
use crate::errors::AppResult;
use crate::ui::messages;
use chrono::Utc;

/// Handle `status` and `total`. Read-only: nothing is flushed or pushed.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let store = crate::open_store(cfg)?;

    let content = match cmd {
        Commands::Status { user } => {
            let report = store.read(|s| TimesheetLogic::status(s, user, Utc::now()));
            replies::status(&report)
        }
        Commands::Total => replies::total_hours(store.read(TimesheetLogic::total_hours)),
        _ => return Ok(()),
    };

    messages::reply(&Reply::ok(content));
    Ok(())
}

use crate::bot::{Reply, replies};
use crate::cli::commands::finish;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::ClockLogic;
use crate::errors::AppResult;
use crate::ui::messages;
use chrono::Utc;

/// Handle `clock-in`, `clock-out` and `force-clock-out` run from the
/// operator's shell. There is no voice roster here, so presence rules do
/// not apply.
pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let store = crate::open_store(cfg)?;
    let now = Utc::now();

    let content = match cmd {
        Commands::ClockIn { user, name } => {
            let name = name.as_deref().unwrap_or(user);
            store.mutate(|s| ClockLogic::clock_in(s, user, name, now))?;
            replies::clocked_in()
        }
        Commands::ClockOut { user } => {
            let log = store.mutate(|s| ClockLogic::clock_out(s, user, now))?;
            replies::clocked_out(&log)
        }
        Commands::ForceClockOut { user, reason } => {
            let log = store.mutate(|s| Ok(ClockLogic::force_clock_out(s, user, now, reason)))?;
            replies::forced(user, log.as_ref())
        }
        _ => return Ok(()),
    };

    finish(&store).await?;
    messages::reply(&Reply::ok(content));
    Ok(())
}

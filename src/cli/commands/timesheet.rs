use crate::bot::{Reply, replies};
use crate::cli::commands::finish;
use crate::cli::parser::TimesheetAction;
use crate::config::Config;
use crate::core::archive::ArchiveLogic;
use crate::core::timesheet::TimesheetLogic;
use crate::errors::AppResult;
use crate::ui::messages;
use crate::utils::date::parse_range;
use chrono::Utc;

pub async fn handle(action: &TimesheetAction, cfg: &Config) -> AppResult<()> {
    let store = crate::open_store(cfg)?;

    match action {
        TimesheetAction::View { user, start, end } => {
            let range = parse_range(start.as_deref(), end.as_deref())?;
            let view = store.read(|s| TimesheetLogic::view(s, user, &range));
            messages::timesheet(&view);
        }

        TimesheetAction::Reset { start, end } => {
            let range = parse_range(start.as_deref(), end.as_deref())?;
            let summary = store.mutate(|s| ArchiveLogic::archive_and_reset(s, &range, Utc::now()))?;
            messages::reply(&Reply::ok(replies::reset(&summary)));
            finish(&store).await?;
        }
    }

    Ok(())
}

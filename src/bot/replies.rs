//! Plain-text reply bodies.

use crate::models::{ArchiveSummary, SessionLog, StatusReport, TimesheetView};
use crate::utils::{format_hours, format_session};

pub fn clocked_in() -> String {
    "🟢 CLOCKED IN".to_string()
}

pub fn clocked_out(log: &SessionLog) -> String {
    format!("🔴 CLOCKED OUT ({})", format_hours(log.hours))
}

pub fn status(report: &StatusReport) -> String {
    match report {
        StatusReport::NoRecord => "📭 No record.".to_string(),
        StatusReport::ClockedOut => "🔴 Not clocked in.".to_string(),
        StatusReport::ClockedIn { minutes, .. } => format!("🟢 Clocked in ({minutes} min)"),
    }
}

pub fn timesheet(view: &TimesheetView) -> String {
    let mut out = format!(
        "👤 **{}**\n⏱ **Total: {}**\n\n",
        view.display_name,
        format_hours(view.total_hours)
    );

    if view.entries.is_empty() {
        out.push_str("📭 No sessions found.");
        return out;
    }

    for (i, log) in view.entries.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} ({})\n",
            i + 1,
            format_session(log.start, log.end),
            format_hours(log.hours)
        ));
    }
    out
}

pub fn reset(summary: &ArchiveSummary) -> String {
    format!(
        "♻️ Timesheet reset. Archived {} session(s) from {} user(s) under {}.",
        summary.logs_moved, summary.users, summary.archive_key
    )
}

pub fn total_hours(total: f64) -> String {
    format!("⏱ Total hours: **{}**", format_hours(total))
}

pub fn forced(user_id: &str, log: Option<&SessionLog>) -> String {
    match log {
        Some(l) => format!("⏹️ <@{user_id}> clocked out ({}).", format_hours(l.hours)),
        None => format!("ℹ️ <@{user_id}> was not clocked in."),
    }
}

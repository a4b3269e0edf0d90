//! Terminal rendering of command outcomes for the operator CLI.
//!
//! The chat surface returns [`Reply`] values; here the same replies are
//! printed with ANSI colour, accepted ones on stdout and rejected ones on
//! stderr, so shell pipelines see the same texts the bot would send.

use crate::bot::Reply;
use crate::errors::AppError;
use crate::models::TimesheetView;
use crate::utils::table::{Column, Table};
use crate::utils::{format_hours, format_session};
use std::fmt;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";
const FG_CYAN: &str = "\x1b[36m";

/// Print a command reply the way the bot would phrase it.
pub fn reply(reply: &Reply) {
    if reply.ok {
        println!("{}{}{}", BOLD, reply.content, RESET);
    } else {
        eprintln!("{}{}{}{}", FG_RED, BOLD, reply.content, RESET);
    }
}

/// Operator-side bookkeeping (backup written, export done, init).
pub fn done<T: fmt::Display>(msg: T) {
    println!("{}{}✅{} {}", FG_GREEN, BOLD, RESET, msg);
}

/// Terminal error of a CLI run. Rejections keep the chat wording; system
/// faults are flagged as such.
pub fn fault(err: &AppError) {
    if err.is_user_error() {
        reply(&Reply::rejected(format!("❌ {err}")));
    } else {
        eprintln!("{}{}❌ Error:{} {}", FG_RED, BOLD, RESET, err);
    }
}

/// A user's sessions as a table, followed by their total.
pub fn timesheet(view: &TimesheetView) {
    let name = if view.display_name.is_empty() {
        view.user_id.as_str()
    } else {
        view.display_name.as_str()
    };
    println!(
        "{}{}👤 {} ({}){}\n",
        FG_CYAN, BOLD, name, view.user_id, RESET
    );

    if view.entries.is_empty() {
        println!("{}📭 No sessions found.{}", FG_YELLOW, RESET);
        return;
    }

    let mut table = Table::new(vec![
        Column::new("#"),
        Column::new("SESSION"),
        Column::new("HOURS"),
    ]);
    for (i, log) in view.entries.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            format_session(log.start, log.end),
            format_hours(log.hours),
        ]);
    }
    print!("{}", table.render());
    println!(
        "\n{}⏱ Total: {}{}",
        BOLD,
        format_hours(view.total_hours),
        RESET
    );
}

use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for clockbot
#[derive(Parser)]
#[command(
    name = "clockbot",
    version = env!("CARGO_PKG_VERSION"),
    about = "Clock in/out bot backend: voice-tied work sessions kept in a JSON timesheet",
    long_about = None
)]
pub struct Cli {
    /// Path of the configuration file (default: ~/.clockbot/clockbot.conf)
    #[arg(global = true, long = "config")]
    pub config: Option<String>,

    /// Override the data directory holding the timesheet and its history
    #[arg(global = true, long = "data-dir")]
    pub data_dir: Option<String>,

    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(global = true, long = "verbose", short = 'v')]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default configuration file and create the data directory
    Init,

    /// Show the effective configuration
    Config {
        /// Print the current configuration to stdout
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,
    },

    /// Run the bot: JSON events on stdin, replies on stdout
    Serve,

    /// Open a work session for a user
    ClockIn {
        /// User id
        #[arg(long = "user")]
        user: String,
        /// Display name to record
        #[arg(long = "name")]
        name: Option<String>,
    },

    /// Close the open work session of a user
    ClockOut {
        /// User id
        #[arg(long = "user")]
        user: String,
    },

    /// Clock a user out on their behalf (no error when not clocked in)
    ForceClockOut {
        /// User id
        #[arg(long = "user")]
        user: String,
        /// Reason recorded in the log
        #[arg(long = "reason", default_value = "forced by operator")]
        reason: String,
    },

    /// Show whether a user is clocked in
    Status {
        /// User id
        #[arg(long = "user")]
        user: String,
    },

    /// View or archive timesheets
    Timesheet {
        #[command(subcommand)]
        action: TimesheetAction,
    },

    /// Total logged hours over every user
    Total,

    /// Copy the timesheet and its history
    Backup {
        /// Destination file
        #[arg(long = "file")]
        file: String,
        /// Bundle both files into a zip archive
        #[arg(long = "compress")]
        compress: bool,
        /// Overwrite existing files
        #[arg(long = "force")]
        force: bool,
    },

    /// Export session logs
    Export {
        #[arg(long = "format", value_enum)]
        format: ExportFormat,
        /// Destination file
        #[arg(long = "file")]
        file: String,
        /// Only this user
        #[arg(long = "user")]
        user: Option<String>,
        /// First day (MM/DD/YYYY or YYYY-MM-DD)
        #[arg(long = "start")]
        start: Option<String>,
        /// Last day (MM/DD/YYYY or YYYY-MM-DD)
        #[arg(long = "end")]
        end: Option<String>,
        /// Overwrite an existing file
        #[arg(long = "force")]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum TimesheetAction {
    /// List a user's sessions in a day range, with their total
    View {
        /// User id
        #[arg(long = "user")]
        user: String,
        /// First day (MM/DD/YYYY or YYYY-MM-DD)
        #[arg(long = "start")]
        start: Option<String>,
        /// Last day (MM/DD/YYYY or YYYY-MM-DD)
        #[arg(long = "end")]
        end: Option<String>,
    },

    /// Move sessions to the history file (everything when no range is given)
    Reset {
        /// First day (MM/DD/YYYY or YYYY-MM-DD)
        #[arg(long = "start")]
        start: Option<String>,
        /// Last day (MM/DD/YYYY or YYYY-MM-DD)
        #[arg(long = "end")]
        end: Option<String>,
    },
}

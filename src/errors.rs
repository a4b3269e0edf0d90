//! Unified application error type.
//! All modules (store, core, mirror, bot, cli) return AppError to keep the
//! error handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // User errors (reported back to the invoking user)
    // ---------------------------
    #[error("You are already clocked in.")]
    AlreadyActive,

    #[error("Not clocked in.")]
    NotActive,

    #[error("You are not allowed to do that.")]
    NotAuthorized,

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Invalid date format: {0} (use MM/DD/YYYY or YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("This command can only be used in a server.")]
    NotInGuild,

    #[error("You must be in a voice channel to clock in.")]
    NotInVoice,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Remote mirror
    // ---------------------------
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote store error: {0}")]
    Remote(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Errors caused by the request itself rather than by the system.
    /// These go back to the user as a rejected command and are never
    /// reported as faults.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AppError::AlreadyActive
                | AppError::NotActive
                | AppError::NotAuthorized
                | AppError::InvalidDateRange(_)
                | AppError::InvalidDate(_)
                | AppError::NotInGuild
                | AppError::NotInVoice
                | AppError::UnknownCommand(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;

pub mod archive;
pub mod backup;
pub mod clock;
pub mod timesheet;

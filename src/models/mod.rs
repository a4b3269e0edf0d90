pub mod session;
pub mod timesheet;

pub use session::{ClockState, SessionLog, SessionRecord};
pub use timesheet::{ArchiveSummary, DateRange, History, Snapshot, StatusReport, TimesheetView};

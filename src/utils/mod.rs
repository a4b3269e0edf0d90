pub mod date;
pub mod path;
pub mod table;

pub use date::{format_hours, format_session};

mod common;
pub mod dates;
pub mod reminders;
pub mod tasks;

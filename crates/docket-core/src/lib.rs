//! Task model, JSON file store,
//! operations facade and due-date
//! reminders for the docket desktop
//! app.

pub mod config;
pub mod datastore;
pub mod datetime;
pub mod ops;
pub mod reminder;
pub mod task;
pub mod tracked;

pub use ops::{
  OpsError,
  OpsResult,
  TaskOps
};
pub use reminder::{
  Notifier,
  ReminderScheduler
};
pub use tracked::TrackedTasks;

//! [`TaskOps`] paired with the reminder
//! registry. Each edit holds the store
//! lock until the matching timer has
//! been armed, re-armed or cancelled,
//! so overlapping edits cannot leave a
//! timer for a due date the file no
//! longer holds.

use std::collections::HashMap;

use chrono::{
  DateTime,
  Utc
};
use parking_lot::Mutex;
use tracing::{
  debug,
  instrument
};

use crate::ops::{
  OpsResult,
  TaskOps
};
use crate::reminder::{
  Notifier,
  ReminderScheduler
};
use crate::task::{
  NewTask,
  Subtask,
  SubtaskId,
  Task,
  TaskId,
  TaskPatch
};

pub struct TrackedTasks<N: Notifier> {
  ops:       Mutex<TaskOps>,
  reminders: ReminderScheduler<N>
}

impl<N: Notifier> TrackedTasks<N> {
  pub fn new(
    ops: TaskOps,
    reminders: ReminderScheduler<N>
  ) -> Self {
    Self {
      ops: Mutex::new(ops),
      reminders
    }
  }

  pub fn reminders(
    &self
  ) -> &ReminderScheduler<N> {
    &self.reminders
  }

  pub fn list(
    &self
  ) -> OpsResult<Vec<Task>> {
    self.ops.lock().list()
  }

  pub fn get(
    &self,
    id: &TaskId
  ) -> OpsResult<Task> {
    self.ops.lock().get(id)
  }

  pub fn create(
    &self,
    draft: NewTask,
    now: DateTime<Utc>
  ) -> OpsResult<Task> {
    let ops = self.ops.lock();
    let task = ops.create(draft, now)?;
    self.reminders.sync(&task, now);
    Ok(task)
  }

  pub fn update(
    &self,
    id: &TaskId,
    patch: TaskPatch,
    now: DateTime<Utc>
  ) -> OpsResult<Task> {
    let ops = self.ops.lock();
    let task = ops.update(id, patch, now)?;
    self.reminders.sync(&task, now);
    Ok(task)
  }

  pub fn delete(
    &self,
    id: &TaskId
  ) -> OpsResult<bool> {
    let ops = self.ops.lock();
    let removed = ops.delete(id)?;
    self.reminders.cancel(id);
    Ok(removed)
  }

  pub fn add_subtask(
    &self,
    parent_id: &TaskId,
    title: &str,
    now: DateTime<Utc>
  ) -> OpsResult<Subtask> {
    self
      .ops
      .lock()
      .add_subtask(parent_id, title, now)
  }

  pub fn remove_subtask(
    &self,
    parent_id: &TaskId,
    subtask_id: &SubtaskId,
    now: DateTime<Utc>
  ) -> OpsResult<bool> {
    self.ops.lock().remove_subtask(
      parent_id, subtask_id, now
    )
  }

  /// Saves a whole snapshot and rebuilds
  /// the timers from it. Incoming tasks
  /// without extra fields inherit those
  /// of the stored task with the same id.
  #[instrument(skip_all, fields(count = tasks.len()))]
  pub fn replace_all(
    &self,
    mut tasks: Vec<Task>,
    now: DateTime<Utc>
  ) -> OpsResult<usize> {
    let ops = self.ops.lock();

    let mut stored: HashMap<TaskId, _> = ops
      .store()
      .load()?
      .into_iter()
      .map(|task| (task.id, task.extra))
      .collect();
    for task in &mut tasks {
      match stored.remove(&task.id) {
        | Some(extra)
          if task.extra.is_empty() =>
        {
          task.extra = extra
        }
        | _ => {}
      }
    }

    ops.replace_all(tasks.clone())?;
    self.reminders.cancel_all();
    let armed =
      self.reminders.rearm_all(&tasks, now);
    debug!(armed, "reminders rebuilt from snapshot");
    Ok(armed)
  }

  /// Arms every open, future-dated task
  /// on disk.
  pub fn rearm(
    &self,
    now: DateTime<Utc>
  ) -> OpsResult<usize> {
    let ops = self.ops.lock();
    let tasks = ops.list()?;
    Ok(self.reminders.rearm_all(&tasks, now))
  }

  /// Arms a stored task at `due`, or at
  /// its own due date when `due` is
  /// `None`.
  pub fn schedule(
    &self,
    id: &TaskId,
    due: Option<DateTime<Utc>>,
    now: DateTime<Utc>
  ) -> OpsResult<bool> {
    let ops = self.ops.lock();
    let task = ops.get(id)?;
    let due = due.or(task.due_date);
    Ok(self.reminders.schedule(&task, due, now))
  }
}

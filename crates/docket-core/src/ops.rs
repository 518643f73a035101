//! Task operations facade.
//!
//! Every operation is a full
//! load → mutate → save round trip
//! against the [`DataStore`]. Callers
//! that share one store must serialise
//! calls themselves; the facade does
//! not detect a snapshot going stale
//! between its load and its save.

use chrono::{
  DateTime,
  Utc
};
use thiserror::Error;
use tracing::{
  debug,
  info,
  instrument
};

use crate::datastore::DataStore;
use crate::datetime::stamp;
use crate::task::{
  NewTask,
  Subtask,
  SubtaskId,
  Task,
  TaskId,
  TaskPatch
};

#[derive(Debug, Error)]
pub enum OpsError {
  #[error("task title cannot be empty")]
  EmptyTitle,

  #[error("subtask title cannot be empty")]
  EmptySubtaskTitle,

  #[error("task not found: {0}")]
  TaskNotFound(TaskId),

  #[error(transparent)]
  Storage(#[from] anyhow::Error)
}

impl OpsError {
  /// True for failures caused by the
  /// caller's input rather than the
  /// store.
  pub fn is_rejection(&self) -> bool {
    !matches!(self, Self::Storage(_))
  }
}

pub type OpsResult<T> =
  Result<T, OpsError>;

#[derive(Debug)]
pub struct TaskOps {
  store: DataStore
}

impl TaskOps {
  pub fn new(store: DataStore) -> Self {
    Self {
      store
    }
  }

  pub fn store(&self) -> &DataStore {
    &self.store
  }

  /// Snapshot ordered newest-created
  /// first.
  #[instrument(skip(self))]
  pub fn list(
    &self
  ) -> OpsResult<Vec<Task>> {
    let mut tasks = self.store.load()?;
    tasks.sort_by(|a, b| {
      b.created.cmp(&a.created)
    });
    Ok(tasks)
  }

  #[instrument(skip(self), fields(id = %id))]
  pub fn get(
    &self,
    id: &TaskId
  ) -> OpsResult<Task> {
    self
      .store
      .load()?
      .into_iter()
      .find(|task| &task.id == id)
      .ok_or_else(|| {
        OpsError::TaskNotFound(
          id.clone()
        )
      })
  }

  #[instrument(skip(self, draft, now), fields(title_len = draft.title.len()))]
  pub fn create(
    &self,
    draft: NewTask,
    now: DateTime<Utc>
  ) -> OpsResult<Task> {
    if draft.title.trim().is_empty() {
      return Err(OpsError::EmptyTitle);
    }

    let mut tasks = self.store.load()?;
    let task = draft.into_task(now);
    tasks.push(task.clone());
    self.store.save(&tasks)?;

    info!(
      id = %task.id,
      total = tasks.len(),
      "task created"
    );
    Ok(task)
  }

  #[instrument(skip(self, patch, now), fields(id = %id))]
  pub fn update(
    &self,
    id: &TaskId,
    patch: TaskPatch,
    now: DateTime<Utc>
  ) -> OpsResult<Task> {
    if patch
      .title
      .as_deref()
      .is_some_and(|title| {
        title.trim().is_empty()
      })
    {
      return Err(OpsError::EmptyTitle);
    }

    let mut tasks = self.store.load()?;
    let updated = {
      let task = find_mut(&mut tasks, id)?;
      patch.apply(task);
      task.updated = stamp(now);
      task.clone()
    };
    self.store.save(&tasks)?;

    debug!(
      id = %updated.id,
      status = updated.status.as_str(),
      "task updated"
    );
    Ok(updated)
  }

  /// Removes the task. `Ok(false)`
  /// when no task had that id; nothing
  /// is written then.
  #[instrument(skip(self), fields(id = %id))]
  pub fn delete(
    &self,
    id: &TaskId
  ) -> OpsResult<bool> {
    let mut tasks = self.store.load()?;
    let before = tasks.len();
    tasks.retain(|task| &task.id != id);
    if tasks.len() == before {
      debug!("delete of unknown task ignored");
      return Ok(false);
    }

    self.store.save(&tasks)?;
    info!(
      total = tasks.len(),
      "task deleted"
    );
    Ok(true)
  }

  #[instrument(skip(self, title, now), fields(parent = %parent_id))]
  pub fn add_subtask(
    &self,
    parent_id: &TaskId,
    title: &str,
    now: DateTime<Utc>
  ) -> OpsResult<Subtask> {
    let title = title.trim();
    if title.is_empty() {
      return Err(
        OpsError::EmptySubtaskTitle
      );
    }

    let mut tasks = self.store.load()?;
    let subtask =
      Subtask::new(title.to_string());
    {
      let parent =
        find_mut(&mut tasks, parent_id)?;
      parent.subtasks.push(subtask.clone());
      parent.updated = stamp(now);
    }
    self.store.save(&tasks)?;

    debug!(
      subtask = %subtask.id,
      "subtask added"
    );
    Ok(subtask)
  }

  /// `Ok(false)` when the parent has no
  /// subtask with that id; nothing is
  /// written then.
  #[instrument(skip(self, now), fields(parent = %parent_id, subtask = %subtask_id))]
  pub fn remove_subtask(
    &self,
    parent_id: &TaskId,
    subtask_id: &SubtaskId,
    now: DateTime<Utc>
  ) -> OpsResult<bool> {
    let mut tasks = self.store.load()?;
    let removed = {
      let parent =
        find_mut(&mut tasks, parent_id)?;
      let before = parent.subtasks.len();
      parent
        .subtasks
        .retain(|sub| &sub.id != subtask_id);
      let removed =
        parent.subtasks.len() != before;
      if removed {
        parent.updated = stamp(now);
      }
      removed
    };

    if removed {
      self.store.save(&tasks)?;
      debug!("subtask removed");
    } else {
      debug!("subtask not present; nothing written");
    }
    Ok(removed)
  }

  /// Overwrites the collection with a
  /// caller-supplied snapshot.
  #[instrument(skip(self, tasks), fields(count = tasks.len()))]
  pub fn replace_all(
    &self,
    mut tasks: Vec<Task>
  ) -> OpsResult<()> {
    for task in &mut tasks {
      task.normalize();
    }
    self.store.save(&tasks)?;
    Ok(())
  }
}

fn find_mut<'a>(
  tasks: &'a mut [Task],
  id: &TaskId
) -> OpsResult<&'a mut Task> {
  tasks
    .iter_mut()
    .find(|task| &task.id == id)
    .ok_or_else(|| {
      OpsError::TaskNotFound(id.clone())
    })
}

use std::rc::Rc;

use docket_gui_shared::{
  SubtaskAddArgs,
  SubtaskRemoveArgs,
  TaskCreate,
  TaskIdArg,
  TaskPatch,
  TaskStatus,
  TaskUpdateArgs
};
use yew::Reducible;

use crate::api::invoke_tauri;

/// Every user mutation. The app funnels
/// these through one dispatch callback
/// that calls the host and then
/// refreshes the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
  Create(TaskCreate),
  SetStatus {
    id:     String,
    status: TaskStatus
  },
  Delete {
    id: String
  },
  AddSubtask {
    task_id: String,
    title:   String
  },
  RemoveSubtask {
    task_id:    String,
    subtask_id: String
  }
}

impl Action {
  pub fn command(&self) -> &'static str {
    match self {
      | Self::Create(_) => "create_task",
      | Self::SetStatus {
        ..
      } => "update_task",
      | Self::Delete {
        ..
      } => "delete_task",
      | Self::AddSubtask {
        ..
      } => "add_subtask",
      | Self::RemoveSubtask {
        ..
      } => "remove_subtask"
    }
  }

  /// Runs the host command; true when
  /// the host reported success.
  pub async fn send(
    &self
  ) -> Result<bool, String> {
    let cmd = self.command();
    match self.clone() {
      | Self::Create(create) => {
        invoke_tauri(cmd, &create).await
      }
      | Self::SetStatus {
        id,
        status
      } => {
        invoke_tauri(
          cmd,
          &TaskUpdateArgs {
            id,
            patch: TaskPatch::status(
              status
            )
          }
        )
        .await
      }
      | Self::Delete {
        id
      } => {
        invoke_tauri(cmd, &TaskIdArg {
          id
        })
        .await
      }
      | Self::AddSubtask {
        task_id,
        title
      } => {
        invoke_tauri(cmd, &SubtaskAddArgs {
          task_id,
          title
        })
        .await
      }
      | Self::RemoveSubtask {
        task_id,
        subtask_id
      } => {
        invoke_tauri(
          cmd,
          &SubtaskRemoveArgs {
            task_id,
            subtask_id
          }
        )
        .await
      }
    }
  }

  pub fn success_message(
    &self
  ) -> &'static str {
    match self {
      | Self::Create(_) => {
        "Task added successfully!"
      }
      | Self::SetStatus {
        status: TaskStatus::Completed,
        ..
      } => "Task marked as complete!",
      | Self::SetStatus {
        ..
      } => "Task marked as incomplete!",
      | Self::Delete {
        ..
      } => "Task removed!",
      | Self::AddSubtask {
        ..
      } => "Subtask added!",
      | Self::RemoveSubtask {
        ..
      } => "Subtask removed!"
    }
  }

  pub fn failure_message(
    &self
  ) -> &'static str {
    match self {
      | Self::Create(_) => {
        "Error adding task!"
      }
      | Self::SetStatus {
        ..
      } => "Error updating task!",
      | Self::Delete {
        ..
      } => "Error removing task!",
      | Self::AddSubtask {
        ..
      } => "Error adding subtask!",
      | Self::RemoveSubtask {
        ..
      } => "Error removing subtask!"
    }
  }
}

/// Monotonic counter; each bump
/// re-reads the task snapshot.
#[derive(Debug, Default, PartialEq)]
pub struct RefreshTick(pub u64);

pub struct Bump;

impl Reducible for RefreshTick {
  type Action = Bump;

  fn reduce(
    self: Rc<Self>,
    _action: Bump
  ) -> Rc<Self> {
    Rc::new(Self(
      self.0.saturating_add(1)
    ))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
  Success,
  Error,
  Info
}

impl ToastKind {
  pub fn class(self) -> &'static str {
    match self {
      | Self::Success => "toast success",
      | Self::Error => "toast error",
      | Self::Info => "toast info"
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
  pub id:      u64,
  pub kind:    ToastKind,
  pub message: String
}

#[derive(Debug, Default, PartialEq)]
pub struct ToastQueue {
  next_id:   u64,
  pub items: Vec<Toast>
}

pub enum ToastAction {
  Push(ToastKind, String),
  Dismiss(u64)
}

impl Reducible for ToastQueue {
  type Action = ToastAction;

  fn reduce(
    self: Rc<Self>,
    action: ToastAction
  ) -> Rc<Self> {
    let mut items = self.items.clone();
    let mut next_id = self.next_id;
    match action {
      | ToastAction::Push(kind, message) => {
        items.push(Toast {
          id: next_id,
          kind,
          message
        });
        next_id += 1;
      }
      | ToastAction::Dismiss(id) => {
        items.retain(|toast| toast.id != id);
      }
    }
    Rc::new(Self {
      next_id,
      items
    })
  }
}

use docket_gui_shared::{
  SaveTasksArgs,
  SubtaskAddArgs,
  SubtaskRemoveArgs,
  TaskCreate,
  TaskDto,
  TaskIdArg,
  TaskUpdateArgs,
  UiLogArg
};
use tauri::State;
use tracing::{
  info,
  instrument
};

use super::common::report;
use crate::state::AppState;

#[tauri::command]
#[instrument(skip(state), fields(request_id = ?request_id))]
pub async fn get_tasks(
  state: State<'_, AppState>,
  request_id: Option<String>
) -> Result<Vec<TaskDto>, String> {
  info!(request_id = ?request_id, "get_tasks command invoked");
  Ok(
    report(
      "get_tasks",
      request_id.as_deref(),
      state.list()
    )
    .unwrap_or_default()
  )
}

#[tauri::command]
#[instrument(skip(state, args), fields(request_id = ?request_id, count = args.tasks.len()))]
pub async fn save_tasks(
  state: State<'_, AppState>,
  args: SaveTasksArgs,
  request_id: Option<String>
) -> Result<bool, String> {
  info!(request_id = ?request_id, count = args.tasks.len(), "save_tasks command invoked");
  Ok(
    report(
      "save_tasks",
      request_id.as_deref(),
      state.replace_all(args.tasks)
    )
    .is_some()
  )
}

#[tauri::command]
#[instrument(skip(state, args), fields(request_id = ?request_id, title_len = args.title.len()))]
pub async fn create_task(
  state: State<'_, AppState>,
  args: TaskCreate,
  request_id: Option<String>
) -> Result<bool, String> {
  info!(
    request_id = ?request_id,
    title_len = args.title.len(),
    priority = ?args.priority,
    has_due = args.due.is_some(),
    repeat = ?args.repeat,
    "create_task command invoked"
  );
  Ok(
    report(
      "create_task",
      request_id.as_deref(),
      state.create(args)
    )
    .is_some()
  )
}

#[tauri::command]
#[instrument(skip(state, args), fields(request_id = ?request_id, id = %args.id))]
pub async fn update_task(
  state: State<'_, AppState>,
  args: TaskUpdateArgs,
  request_id: Option<String>
) -> Result<bool, String> {
  info!(request_id = ?request_id, id = %args.id, patch = ?args.patch, "update_task command invoked");
  Ok(
    report(
      "update_task",
      request_id.as_deref(),
      state.update(args)
    )
    .is_some()
  )
}

#[tauri::command]
#[instrument(skip(state, args), fields(request_id = ?request_id, id = %args.id))]
pub async fn delete_task(
  state: State<'_, AppState>,
  args: TaskIdArg,
  request_id: Option<String>
) -> Result<bool, String> {
  info!(request_id = ?request_id, id = %args.id, "delete_task command invoked");
  Ok(
    report(
      "delete_task",
      request_id.as_deref(),
      state.delete(&args.id)
    )
    .unwrap_or(false)
  )
}

#[tauri::command]
#[instrument(skip(state, args), fields(request_id = ?request_id, task_id = %args.task_id))]
pub async fn add_subtask(
  state: State<'_, AppState>,
  args: SubtaskAddArgs,
  request_id: Option<String>
) -> Result<bool, String> {
  info!(request_id = ?request_id, task_id = %args.task_id, "add_subtask command invoked");
  Ok(
    report(
      "add_subtask",
      request_id.as_deref(),
      state.add_subtask(args)
    )
    .is_some()
  )
}

#[tauri::command]
#[instrument(skip(state, args), fields(request_id = ?request_id, task_id = %args.task_id, subtask_id = %args.subtask_id))]
pub async fn remove_subtask(
  state: State<'_, AppState>,
  args: SubtaskRemoveArgs,
  request_id: Option<String>
) -> Result<bool, String> {
  info!(
    request_id = ?request_id,
    task_id = %args.task_id,
    subtask_id = %args.subtask_id,
    "remove_subtask command invoked"
  );
  Ok(
    report(
      "remove_subtask",
      request_id.as_deref(),
      state.remove_subtask(args)
    )
    .unwrap_or(false)
  )
}

#[tauri::command]
#[instrument(fields(request_id = ?request_id, event = %args.event))]
pub async fn ui_log(
  args: UiLogArg,
  request_id: Option<String>
) -> Result<(), String> {
  info!(request_id = ?request_id, event = %args.event, detail = %args.detail, "ui interaction");
  Ok(())
}

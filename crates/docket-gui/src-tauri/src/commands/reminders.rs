use docket_gui_shared::{
  NotifyArgs,
  ReminderArgs,
  TaskIdArg
};
use tauri::State;
use tracing::{
  info,
  instrument
};

use super::common::report;
use crate::state::AppState;

#[tauri::command]
#[instrument(skip(state, args), fields(request_id = ?request_id, task_id = %args.task_id))]
pub async fn schedule_reminder(
  state: State<'_, AppState>,
  args: ReminderArgs,
  request_id: Option<String>
) -> Result<bool, String> {
  info!(
    request_id = ?request_id,
    task_id = %args.task_id,
    due = ?args.due,
    "schedule_reminder command invoked"
  );
  Ok(
    report(
      "schedule_reminder",
      request_id.as_deref(),
      state.schedule_reminder(
        &args.task_id,
        args.due.as_deref()
      )
    )
    .unwrap_or(false)
  )
}

#[tauri::command]
#[instrument(skip(state, args), fields(request_id = ?request_id, id = %args.id))]
pub async fn cancel_reminder(
  state: State<'_, AppState>,
  args: TaskIdArg,
  request_id: Option<String>
) -> Result<bool, String> {
  info!(request_id = ?request_id, id = %args.id, "cancel_reminder command invoked");
  Ok(state.cancel_reminder(&args.id))
}

#[tauri::command]
#[instrument(skip(state, args), fields(request_id = ?request_id))]
pub async fn notify(
  state: State<'_, AppState>,
  args: NotifyArgs,
  request_id: Option<String>
) -> Result<bool, String> {
  info!(request_id = ?request_id, title = %args.title, "notify command invoked");
  Ok(state.notify(&args.title, &args.body))
}

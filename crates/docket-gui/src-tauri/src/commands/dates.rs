use docket_gui_shared::DateArgs;
use tauri::State;
use tracing::{
  debug,
  instrument
};

use crate::state::AppState;

#[tauri::command]
#[instrument(skip(state), fields(request_id = ?request_id))]
pub async fn format_date(
  state: State<'_, AppState>,
  args: DateArgs,
  request_id: Option<String>
) -> Result<String, String> {
  debug!(request_id = ?request_id, value = %args.value, "format_date command invoked");
  Ok(state.format_date(&args.value))
}

#[tauri::command]
#[instrument(skip(state), fields(request_id = ?request_id))]
pub async fn to_date(
  state: State<'_, AppState>,
  args: DateArgs,
  request_id: Option<String>
) -> Result<Option<String>, String> {
  debug!(request_id = ?request_id, value = %args.value, "to_date command invoked");
  Ok(state.to_date(&args.value))
}

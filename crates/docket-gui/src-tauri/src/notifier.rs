use anyhow::Context;
use docket_core::reminder::Notifier;
use tauri::{
  AppHandle,
  Runtime
};
use tauri_plugin_notification::{
  NotificationExt,
  PermissionState
};
use tracing::{
  debug,
  info,
  warn
};

/// Desktop notifications through the
/// Tauri notification plugin.
pub struct TauriNotifier<R: Runtime> {
  app: AppHandle<R>
}

impl<R: Runtime> TauriNotifier<R> {
  pub fn new(app: AppHandle<R>) -> Self {
    Self {
      app
    }
  }

  /// Asks the OS for permission once
  /// when it has not been decided yet.
  pub fn ensure_permission(&self) {
    let notification =
      self.app.notification();
    match notification.permission_state() {
      | Ok(PermissionState::Granted) => {
        debug!("notification permission already granted");
      }
      | Ok(PermissionState::Denied) => {
        warn!("notification permission denied; reminders disabled");
      }
      | Ok(_) => {
        match notification.request_permission()
        {
          | Ok(state) => {
            info!(state = ?state, "requested notification permission")
          }
          | Err(err) => {
            warn!(error = %err, "failed requesting notification permission")
          }
        }
      }
      | Err(err) => {
        warn!(error = %err, "failed reading notification permission");
      }
    }
  }
}

impl<R: Runtime> Notifier
  for TauriNotifier<R>
{
  fn is_supported(&self) -> bool {
    matches!(
      self
        .app
        .notification()
        .permission_state(),
      Ok(PermissionState::Granted)
    )
  }

  fn notify(
    &self,
    title: &str,
    body: &str
  ) -> anyhow::Result<()> {
    self
      .app
      .notification()
      .builder()
      .title(title)
      .body(body)
      .show()
      .context(
        "failed to show desktop \
         notification"
      )
  }
}

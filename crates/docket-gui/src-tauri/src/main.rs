#![cfg_attr(
  not(debug_assertions),
  windows_subsystem = "windows"
)]

mod commands;
mod notifier;
mod state;

use std::fs;
use std::path::Path;

use anyhow::Context;
use docket_core::config::Config;
use docket_core::datetime::install_display_zone;
use tauri::Manager;
use tracing::{
  error,
  info,
  warn
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{
  EnvFilter,
  fmt
};

use crate::notifier::TauriNotifier;
use crate::state::AppState;

const LOG_FILE_PREFIX: &str =
  "docket.log";

/// Console logging plus a daily log
/// file under `log_dir`. The returned
/// guard flushes the file writer and
/// must live until exit.
fn init_tracing(
  log_dir: &Path
) -> Option<WorkerGuard> {
  let filter =
    EnvFilter::try_from_default_env()
      .or_else(|_| {
        EnvFilter::try_new(
          "info,docket_gui_tauri=debug,\
           docket_core=debug"
        )
      })
      .unwrap_or_else(|_| {
        EnvFilter::new("info")
      });

  let (file_layer, guard) =
    match fs::create_dir_all(log_dir) {
      | Ok(()) => {
        let appender =
          tracing_appender::rolling::daily(
            log_dir,
            LOG_FILE_PREFIX
          );
        let (writer, guard) =
          tracing_appender::non_blocking(
            appender
          );
        (
          Some(
            fmt::layer()
              .with_writer(writer)
              .with_ansi(false)
              .with_target(true)
              .with_line_number(true)
          ),
          Some(guard)
        )
      }
      | Err(_) => (None, None)
    };

  let _ =
    tracing_subscriber::registry()
      .with(filter)
      .with(
        fmt::layer()
          .with_target(true)
          .with_line_number(true)
      )
      .with(file_layer)
      .try_init();

  if guard.is_none() {
    warn!(
      dir = %log_dir.display(),
      "log directory unavailable; \
       logging to console only"
    );
  }
  guard
}

fn main() {
  let config = match Config::load() {
    | Ok(config) => config,
    | Err(err) => {
      eprintln!(
        "failed to load configuration: \
         {err:#}"
      );
      std::process::exit(1);
    }
  };

  let _log_guard =
    init_tracing(&config.log_dir());

  info!(
    config = ?config.loaded_from,
    data_dir = %config.data_dir().display(),
    timezone = %config.zone(),
    "starting Docket backend"
  );
  install_display_zone(config.zone());

  let result = tauri::Builder::default()
    .plugin(
      tauri_plugin_notification::init()
    )
    .setup(move |app| {
      let notifier =
        TauriNotifier::new(
          app.handle().clone()
        );
      let state =
        AppState::new(&config, notifier)
          .context(
            "failed to initialize app \
             state"
          )?;
      state.notifier().ensure_permission();
      app.manage(state);

      rearm_reminders(
        app.handle().clone()
      );
      configure_main_window_icon(app);
      install_signal_handlers(
        app.handle().clone()
      );
      Ok(())
    })
    .invoke_handler(
      tauri::generate_handler![
        commands::tasks::get_tasks,
        commands::tasks::save_tasks,
        commands::tasks::create_task,
        commands::tasks::update_task,
        commands::tasks::delete_task,
        commands::tasks::add_subtask,
        commands::tasks::remove_subtask,
        commands::tasks::ui_log,
        commands::reminders::notify,
        commands::reminders::schedule_reminder,
        commands::reminders::cancel_reminder,
        commands::dates::format_date,
        commands::dates::to_date,
      ]
    )
    .run(tauri::generate_context!());

  if let Err(err) = result {
    error!(error = %err, "Docket backend exited with an error");
    std::process::exit(1);
  }
}

/// Timers need the async runtime, so
/// the start-up scan runs as a task.
fn rearm_reminders(
  app_handle: tauri::AppHandle
) {
  tauri::async_runtime::spawn(
    async move {
      let state =
        app_handle.state::<AppState>();
      match state.rearm_reminders() {
        | Ok(armed) => {
          info!(armed, "start-up reminders armed")
        }
        | Err(err) => {
          error!(error = %err, "failed to re-arm reminders")
        }
      }
    }
  );
}

fn install_signal_handlers(
  app_handle: tauri::AppHandle
) {
  tauri::async_runtime::spawn(
    async move {
      wait_for_shutdown_signal().await;
      warn!(
        "shutdown signal received; \
         closing Docket and dropping \
         armed reminders"
      );
      app_handle.exit(0);
    }
  );
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
  use tokio::signal::unix::{
    SignalKind,
    signal
  };

  let streams =
    signal(SignalKind::interrupt())
      .and_then(|sigint| {
        signal(SignalKind::terminate())
          .map(|sigterm| (sigint, sigterm))
      });

  match streams {
    | Ok((mut sigint, mut sigterm)) => {
      tokio::select! {
        _ = sigint.recv() => {}
        _ = sigterm.recv() => {}
      }
    }
    | Err(error) => {
      error!(
        %error,
        "Docket could not watch for \
         SIGINT/SIGTERM; waiting on \
         ctrl_c instead"
      );
      let _ =
        tokio::signal::ctrl_c().await;
    }
  }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
  if let Err(error) =
    tokio::signal::ctrl_c().await
  {
    error!(
      %error,
      "Docket shutdown listener \
       failed"
    );
  }
}

fn configure_main_window_icon<
  R: tauri::Runtime
>(
  app: &tauri::App<R>
) {
  let Some(window) =
    app.get_webview_window("main")
  else {
    warn!(
      "Docket main window missing at \
       setup; keeping default icon"
    );
    return;
  };

  let icon = match tauri::image::Image::from_bytes(
    include_bytes!("../icons/icon.png")
  ) {
    | Ok(icon) => icon,
    | Err(err) => {
      error!(error = %err, "bundled Docket icon is not a valid png");
      return;
    }
  };

  if let Err(err) = window.set_icon(icon)
  {
    error!(error = %err, "could not set Docket window icon");
  }
}

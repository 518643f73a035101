mod state;

use docket_gui_shared::{
  TaskDto,
  UiLogArg,
  view::{
    TaskFilter,
    overdue_notices
  }
};
use gloo::console::log;
use wasm_bindgen_futures::spawn_local;
use yew::{
  Callback,
  Html,
  function_component,
  html,
  use_effect_with,
  use_mut_ref,
  use_reducer,
  use_state
};

use self::state::{
  Action,
  Bump,
  RefreshTick,
  ToastAction,
  ToastKind,
  ToastQueue
};
pub use self::state::Toast;
use crate::api::{
  invoke_bare,
  invoke_tauri
};
use crate::components::{
  ConfirmDialog,
  FilterBar,
  PromptDialog,
  RowIntent,
  TaskForm,
  TaskList,
  ToastStack
};

#[derive(Debug, Clone, PartialEq)]
enum Dialog {
  ConfirmDelete {
    id:    String,
    title: String
  },
  AddSubtask {
    id:    String,
    title: String
  }
}

#[function_component(App)]
pub fn app() -> Html {
  let tasks =
    use_state(Vec::<TaskDto>::new);
  let filter =
    use_state(TaskFilter::default);
  let dialog =
    use_state(|| None::<Dialog>);
  let refresh =
    use_reducer(RefreshTick::default);
  let form_reset =
    use_reducer(RefreshTick::default);
  let toasts =
    use_reducer(ToastQueue::default);
  let overdue_announced =
    use_mut_ref(|| false);

  use_effect_with((), move |_| {
    ui_debug("app.mount", "docket ui mounted");
    || ()
  });

  {
    let tasks = tasks.clone();
    let toasts = toasts.clone();
    use_effect_with(
      refresh.0,
      move |tick| {
        let tick = *tick;
        spawn_local(async move {
          match invoke_bare::<Vec<TaskDto>>(
            "get_tasks"
          )
          .await
          {
            | Ok(list) => {
              tracing::debug!(
                tick,
                count = list.len(),
                "task snapshot loaded"
              );
              if !*overdue_announced.borrow() {
                *overdue_announced
                  .borrow_mut() = true;
                for notice in
                  overdue_notices(&list)
                {
                  toasts.dispatch(
                    ToastAction::Push(
                      ToastKind::Info,
                      notice
                    )
                  );
                }
              }
              tasks.set(list);
            }
            | Err(err) => {
              tracing::error!(
                error = %err,
                "get_tasks failed"
              );
              toasts.dispatch(
                ToastAction::Push(
                  ToastKind::Error,
                  "Error loading tasks!"
                    .to_string()
                )
              );
            }
          }
        });
        || ()
      }
    );
  }

  let dispatch = {
    let refresh = refresh.clone();
    let form_reset = form_reset.clone();
    let toasts = toasts.clone();
    Callback::from(move |action: Action| {
      let refresh = refresh.clone();
      let form_reset = form_reset.clone();
      let toasts = toasts.clone();
      ui_debug(
        "action.dispatch",
        action.command()
      );
      spawn_local(async move {
        let ok = match action.send().await {
          | Ok(ok) => ok,
          | Err(err) => {
            tracing::error!(
              command = action.command(),
              error = %err,
              "host command failed"
            );
            false
          }
        };

        if ok {
          toasts.dispatch(ToastAction::Push(
            ToastKind::Success,
            action
              .success_message()
              .to_string()
          ));
          if matches!(action, Action::Create(_)) {
            form_reset.dispatch(Bump);
          }
        } else {
          toasts.dispatch(ToastAction::Push(
            ToastKind::Error,
            action
              .failure_message()
              .to_string()
          ));
        }
        refresh.dispatch(Bump);
      });
    })
  };

  let on_create = {
    let dispatch = dispatch.clone();
    Callback::from(move |create| {
      dispatch.emit(Action::Create(create))
    })
  };
  let on_invalid = {
    let toasts = toasts.clone();
    Callback::from(move |message: String| {
      toasts.dispatch(ToastAction::Push(
        ToastKind::Error,
        message
      ))
    })
  };
  let on_filter = {
    let filter = filter.clone();
    Callback::from(move |next: TaskFilter| {
      ui_debug(
        "filter.change",
        &format!("{next:?}")
      );
      filter.set(next)
    })
  };
  let on_intent = {
    let dispatch = dispatch.clone();
    let dialog = dialog.clone();
    Callback::from(move |intent: RowIntent| {
      match intent {
        | RowIntent::Delete {
          id,
          title
        } => {
          dialog.set(Some(
            Dialog::ConfirmDelete {
              id,
              title
            }
          ))
        }
        | RowIntent::AddSubtask {
          id,
          title
        } => {
          dialog.set(Some(
            Dialog::AddSubtask {
              id,
              title
            }
          ))
        }
        | RowIntent::Toggle {
          id,
          status
        } => {
          dispatch.emit(Action::SetStatus {
            id,
            status
          })
        }
        | RowIntent::RemoveSubtask {
          task_id,
          subtask_id
        } => {
          dispatch.emit(
            Action::RemoveSubtask {
              task_id,
              subtask_id
            }
          )
        }
      }
    })
  };
  let on_dismiss = {
    let toasts = toasts.clone();
    Callback::from(move |id: u64| {
      toasts.dispatch(ToastAction::Dismiss(id))
    })
  };
  let close_dialog = {
    let dialog = dialog.clone();
    Callback::from(move |_: ()| {
      dialog.set(None)
    })
  };

  let visible = filter.apply(&tasks);

  let dialog_view = match (*dialog).clone() {
    | None => html! {},
    | Some(Dialog::ConfirmDelete {
      id,
      title
    }) => {
      let dispatch = dispatch.clone();
      let close = close_dialog.clone();
      let on_confirm =
        Callback::from(move |_: ()| {
          close.emit(());
          dispatch.emit(Action::Delete {
            id: id.clone()
          });
        });
      html! {
          <ConfirmDialog
              title="Delete task"
              message={format!("Delete '{title}'? This cannot be undone.")}
              on_confirm={on_confirm}
              on_cancel={close_dialog.clone()}
          />
      }
    }
    | Some(Dialog::AddSubtask {
      id,
      title
    }) => {
      let dispatch = dispatch.clone();
      let close = close_dialog.clone();
      let on_submit = Callback::from(
        move |subtask: String| {
          close.emit(());
          dispatch.emit(Action::AddSubtask {
            task_id: id.clone(),
            title:   subtask
          });
        }
      );
      html! {
          <PromptDialog
              title="Add subtask"
              label={format!("Subtask for '{title}'")}
              placeholder="Subtask title"
              on_submit={on_submit}
              on_cancel={close_dialog.clone()}
          />
      }
    }
  };

  html! {
      <div class="app">
          <header class="app-header">
              <h1>{ "Docket" }</h1>
          </header>
          <TaskForm
              on_submit={on_create}
              on_invalid={on_invalid}
              clear_tick={form_reset.0}
          />
          <FilterBar filter={(*filter).clone()} on_change={on_filter} />
          <TaskList
              tasks={visible}
              filtered={filter.is_active()}
              on_intent={on_intent}
          />
          { dialog_view }
          <ToastStack toasts={toasts.items.clone()} on_dismiss={on_dismiss} />
      </div>
  }
}

/// Console trace plus a host-side log
/// line, so UI events show up in the
/// app's log file.
fn ui_debug(
  event: &str,
  detail: &str
) {
  tracing::debug!(
    event, detail, "ui-debug"
  );
  log!(format!(
    "[ui-debug] {event}: {detail}"
  ));

  let arg = UiLogArg {
    event:  event.to_string(),
    detail: detail.to_string()
  };
  spawn_local(async move {
    if let Err(err) =
      invoke_tauri::<(), _>("ui_log", &arg)
        .await
    {
      tracing::warn!(
        error = %err,
        "ui_log failed"
      );
    }
  });
}

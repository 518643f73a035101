use docket_gui_shared::{
  TaskDto,
  TaskStatus,
  view::{
    priority_label,
    repeat_label,
    status_label,
    toggle_label
  }
};
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html
};

use super::SubtaskList;

/// What a row asks the app to do. Delete
/// and add-subtask go through a dialog
/// first; the rest dispatch directly.
#[derive(Debug, Clone, PartialEq)]
pub enum RowIntent {
  Delete {
    id:    String,
    title: String
  },
  AddSubtask {
    id:    String,
    title: String
  },
  Toggle {
    id:     String,
    status: TaskStatus
  },
  RemoveSubtask {
    task_id:    String,
    subtask_id: String
  }
}

#[derive(Properties, PartialEq)]
pub struct TaskCardProps {
  pub task:      TaskDto,
  pub on_intent: Callback<RowIntent>
}

#[function_component(TaskCard)]
pub fn task_card(
  props: &TaskCardProps
) -> Html {
  let task = &props.task;
  let completed =
    task.status == TaskStatus::Completed;

  let status_class = match task.status {
    | TaskStatus::Todo => "pill todo",
    | TaskStatus::InProgress => {
      "pill in-progress"
    }
    | TaskStatus::Completed => {
      "pill completed"
    }
  };

  let on_toggle = {
    let on_intent =
      props.on_intent.clone();
    let id = task.id.clone();
    let status = task.status.toggled();
    Callback::from(move |_: yew::MouseEvent| {
      on_intent.emit(RowIntent::Toggle {
        id: id.clone(),
        status
      })
    })
  };
  let on_add_subtask = {
    let on_intent =
      props.on_intent.clone();
    let id = task.id.clone();
    let title = task.title.clone();
    Callback::from(move |_: yew::MouseEvent| {
      on_intent.emit(
        RowIntent::AddSubtask {
          id:    id.clone(),
          title: title.clone()
        }
      )
    })
  };
  let on_delete = {
    let on_intent =
      props.on_intent.clone();
    let id = task.id.clone();
    let title = task.title.clone();
    Callback::from(move |_: yew::MouseEvent| {
      on_intent.emit(RowIntent::Delete {
        id:    id.clone(),
        title: title.clone()
      })
    })
  };
  let on_remove_subtask = {
    let on_intent =
      props.on_intent.clone();
    let task_id = task.id.clone();
    Callback::from(
      move |subtask_id: String| {
        on_intent.emit(
          RowIntent::RemoveSubtask {
            task_id: task_id.clone(),
            subtask_id
          }
        )
      }
    )
  };

  html! {
      <div class={classes!(
          "task-card",
          completed.then_some("done"),
          task.overdue.then_some("overdue")
      )}>
          <div class="task-head">
              <div class="task-title">{ task.title.clone() }</div>
              <span class={status_class}>{ status_label(task.status) }</span>
          </div>
          <div class="task-meta">
              <span class="meta">
                  { format!("Priority: {}", priority_label(task.priority)) }
              </span>
              <span class="meta">
                  {
                      format!(
                          "Due: {}",
                          task.due_display.as_deref().unwrap_or("N/A")
                      )
                  }
              </span>
              if let Some(label) = repeat_label(task.repeat) {
                  <span class="meta repeat">{ label }</span>
              }
          </div>
          <SubtaskList
              subtasks={task.subtasks.clone()}
              on_remove={on_remove_subtask}
          />
          <div class="task-actions">
              <button type="button" class="btn" onclick={on_toggle}>
                  { toggle_label(task.status) }
              </button>
              <button type="button" class="btn" onclick={on_add_subtask}>
                  { "Add Subtask" }
              </button>
              <button type="button" class="btn danger" onclick={on_delete}>
                  { "Delete" }
              </button>
          </div>
      </div>
  }
}

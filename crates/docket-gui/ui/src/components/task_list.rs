use docket_gui_shared::TaskDto;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

use super::{
  RowIntent,
  TaskCard
};

#[derive(Properties, PartialEq)]
pub struct TaskListProps {
  pub tasks:     Vec<TaskDto>,
  /// True when a filter hid every task
  /// rather than the store being empty.
  pub filtered:  bool,
  pub on_intent: Callback<RowIntent>
}

#[function_component(TaskList)]
pub fn task_list(
  props: &TaskListProps
) -> Html {
  if props.tasks.is_empty() {
    let message = if props.filtered {
      "No tasks match the current filters."
    } else {
      "No tasks yet. Add one above."
    };
    return html! {
        <div class="panel task-list empty">{ message }</div>
    };
  }

  html! {
      <div class="panel task-list">
          {
              for props.tasks.iter().map(|task| html! {
                  <TaskCard
                      key={task.id.clone()}
                      task={task.clone()}
                      on_intent={props.on_intent.clone()}
                  />
              })
          }
      </div>
  }
}

use docket_gui_shared::SubtaskDto;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct SubtaskListProps {
  pub subtasks:  Vec<SubtaskDto>,
  /// Emits the subtask id.
  pub on_remove: Callback<String>
}

#[function_component(SubtaskList)]
pub fn subtask_list(
  props: &SubtaskListProps
) -> Html {
  if props.subtasks.is_empty() {
    return html! {};
  }

  html! {
      <ul class="subtasks">
          {
              for props.subtasks.iter().map(|sub| {
                  let on_remove = props.on_remove.clone();
                  let id = sub.id.clone();
                  html! {
                      <li key={sub.id.clone()} class="subtask">
                          <span class="subtask-title">{ sub.title.clone() }</span>
                          <button
                              type="button"
                              class="btn btn-xs danger"
                              title="Delete subtask"
                              onclick={move |_| on_remove.emit(id.clone())}
                          >
                              { "Delete" }
                          </button>
                      </li>
                  }
              })
          }
      </ul>
  }
}

use docket_gui_shared::{
  RepeatInterval,
  TaskCreate,
  TaskPriority,
  TaskStatus
};
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html,
  use_effect_with,
  use_state
};

#[derive(Properties, PartialEq)]
pub struct TaskFormProps {
  pub on_submit:  Callback<TaskCreate>,
  pub on_invalid: Callback<String>,
  /// Bumped by the parent after a
  /// successful create; clears the
  /// form.
  pub clear_tick: u64
}

fn input_value(e: &web_sys::InputEvent) -> String {
  e.target_unchecked_into::<web_sys::HtmlInputElement>()
    .value()
}

fn select_value(e: &web_sys::Event) -> Option<String> {
  e.target_dyn_into::<web_sys::HtmlSelectElement>()
    .map(|select| select.value())
}

#[function_component(TaskForm)]
pub fn task_form(
  props: &TaskFormProps
) -> Html {
  let title = use_state(String::new);
  let priority = use_state(String::new);
  let status = use_state(|| {
    TaskStatus::Todo.as_str().to_string()
  });
  let due = use_state(String::new);
  let repeat = use_state(String::new);

  {
    let title = title.clone();
    let priority = priority.clone();
    let status = status.clone();
    let due = due.clone();
    let repeat = repeat.clone();
    use_effect_with(
      props.clear_tick,
      move |_| {
        title.set(String::new());
        priority.set(String::new());
        status.set(
          TaskStatus::Todo
            .as_str()
            .to_string()
        );
        due.set(String::new());
        repeat.set(String::new());
        || ()
      }
    );
  }

  let submit = {
    let title = title.clone();
    let priority = priority.clone();
    let status = status.clone();
    let due = due.clone();
    let repeat = repeat.clone();
    let on_submit = props.on_submit.clone();
    let on_invalid =
      props.on_invalid.clone();
    Callback::from(move |_: ()| {
      let trimmed = title.trim();
      if trimmed.is_empty() {
        on_invalid.emit(
          "Task title cannot be empty!"
            .to_string()
        );
        return;
      }
      let due = due.trim();
      on_submit.emit(TaskCreate {
        title:    trimmed.to_string(),
        priority: TaskPriority::parse(
          &priority
        ),
        status:   TaskStatus::parse(
          &status
        ),
        due:      (!due.is_empty())
          .then(|| due.to_string()),
        repeat:   RepeatInterval::parse(
          &repeat
        )
      });
    })
  };

  let on_title_input = {
    let title = title.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        title.set(input_value(&e))
      }
    )
  };
  let on_title_keydown = {
    let submit = submit.clone();
    Callback::from(
      move |e: web_sys::KeyboardEvent| {
        if e.key() == "Enter" {
          e.prevent_default();
          submit.emit(());
        }
      }
    )
  };
  let on_due_input = {
    let due = due.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        due.set(input_value(&e))
      }
    )
  };
  let on_select = |handle: yew::UseStateHandle<String>| {
    Callback::from(move |e: web_sys::Event| {
      if let Some(value) = select_value(&e) {
        handle.set(value);
      } else {
        tracing::warn!(
          "form select event had \
           non-select target"
        );
      }
    })
  };

  html! {
      <div class="panel task-form">
          <div class="field grow">
              <label>{ "Title" }</label>
              <input
                  value={(*title).clone()}
                  placeholder="What needs doing?"
                  oninput={on_title_input}
                  onkeydown={on_title_keydown}
              />
          </div>
          <div class="field">
              <label>{ "Priority" }</label>
              <select value={(*priority).clone()} onchange={on_select(priority.clone())}>
                  <option value="" selected={priority.is_empty()}>{ "N/A" }</option>
                  {
                      for TaskPriority::ALL.into_iter().map(|p| html! {
                          <option value={p.as_str()} selected={*priority == p.as_str()}>{ p.as_str() }</option>
                      })
                  }
              </select>
          </div>
          <div class="field">
              <label>{ "Status" }</label>
              <select value={(*status).clone()} onchange={on_select(status.clone())}>
                  {
                      for TaskStatus::ALL.into_iter().map(|s| html! {
                          <option value={s.as_str()} selected={*status == s.as_str()}>
                              { docket_gui_shared::view::status_label(s) }
                          </option>
                      })
                  }
              </select>
          </div>
          <div class="field">
              <label>{ "Due" }</label>
              <input
                  type="datetime-local"
                  value={(*due).clone()}
                  oninput={on_due_input}
              />
          </div>
          <div class="field">
              <label>{ "Repeat" }</label>
              <select value={(*repeat).clone()} onchange={on_select(repeat.clone())}>
                  <option value="" selected={repeat.is_empty()}>{ "Never" }</option>
                  <option value="daily" selected={*repeat == "daily"}>{ "Daily" }</option>
                  <option value="weekly" selected={*repeat == "weekly"}>{ "Weekly" }</option>
                  <option value="monthly" selected={*repeat == "monthly"}>{ "Monthly" }</option>
              </select>
          </div>
          <button type="button" class="btn primary" onclick={move |_| submit.emit(())}>
              { "Add Task" }
          </button>
      </div>
  }
}

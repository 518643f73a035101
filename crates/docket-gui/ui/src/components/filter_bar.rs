use docket_gui_shared::{
  TaskPriority,
  TaskStatus,
  view::{
    PriorityFilter,
    StatusFilter,
    TaskFilter,
    status_label
  }
};
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
  pub filter:    TaskFilter,
  pub on_change: Callback<TaskFilter>
}

#[function_component(FilterBar)]
pub fn filter_bar(
  props: &FilterBarProps
) -> Html {
  let on_status = {
    let filter = props.filter.clone();
    let on_change =
      props.on_change.clone();
    Callback::from(move |e: web_sys::Event| {
      if let Some(select) = e.target_dyn_into::<web_sys::HtmlSelectElement>() {
        let mut next = filter.clone();
        next.status =
          StatusFilter::from_value(
            &select.value()
          );
        on_change.emit(next);
      } else {
        tracing::warn!(
          "status filter event had \
           non-select target"
        );
      }
    })
  };

  let on_priority = {
    let filter = props.filter.clone();
    let on_change =
      props.on_change.clone();
    Callback::from(move |e: web_sys::Event| {
      if let Some(select) = e.target_dyn_into::<web_sys::HtmlSelectElement>() {
        let mut next = filter.clone();
        next.priority =
          PriorityFilter::from_value(
            &select.value()
          );
        on_change.emit(next);
      } else {
        tracing::warn!(
          "priority filter event had \
           non-select target"
        );
      }
    })
  };

  let on_query = {
    let filter = props.filter.clone();
    let on_change =
      props.on_change.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        let input = e.target_unchecked_into::<web_sys::HtmlInputElement>();
        let mut next = filter.clone();
        next.query = input.value();
        on_change.emit(next);
      }
    )
  };

  let on_clear = {
    let on_change =
      props.on_change.clone();
    Callback::from(move |_: yew::MouseEvent| {
      on_change.emit(TaskFilter::default())
    })
  };

  let status_value =
    props.filter.status.value();
  let priority_value =
    props.filter.priority.value();

  html! {
      <div class="panel filter-bar">
          <input
              class="search"
              placeholder="Search tasks and subtasks"
              value={props.filter.query.clone()}
              oninput={on_query}
          />
          <select class="filter-select" value={status_value} onchange={on_status}>
              <option value="all" selected={status_value == "all"}>{ "All statuses" }</option>
              {
                  for TaskStatus::ALL.into_iter().map(|s| html! {
                      <option value={s.as_str()} selected={status_value == s.as_str()}>
                          { status_label(s) }
                      </option>
                  })
              }
          </select>
          <select class="filter-select" value={priority_value} onchange={on_priority}>
              <option value="all" selected={priority_value == "all"}>{ "All priorities" }</option>
              <option value="none" selected={priority_value == "none"}>{ "N/A" }</option>
              {
                  for TaskPriority::ALL.into_iter().map(|p| html! {
                      <option value={p.as_str()} selected={priority_value == p.as_str()}>
                          { p.as_str() }
                      </option>
                  })
              }
          </select>
          if props.filter.is_active() {
              <button type="button" class="btn" onclick={on_clear}>{ "Clear" }</button>
          }
      </div>
  }
}

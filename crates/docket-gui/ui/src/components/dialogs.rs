use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html,
  use_state
};

#[derive(Properties, PartialEq)]
pub struct ConfirmDialogProps {
  pub title:      String,
  pub message:    String,
  pub on_confirm: Callback<()>,
  pub on_cancel:  Callback<()>
}

#[function_component(ConfirmDialog)]
pub fn confirm_dialog(
  props: &ConfirmDialogProps
) -> Html {
  let on_cancel = props.on_cancel.clone();
  let close = Callback::from(
    move |_: yew::MouseEvent| {
      on_cancel.emit(())
    }
  );
  let on_confirm =
    props.on_confirm.clone();
  let confirm = Callback::from(
    move |_: yew::MouseEvent| {
      on_confirm.emit(())
    }
  );

  html! {
      <div class="modal-backdrop" onclick={close.clone()}>
          <div class="modal modal-sm" onclick={Callback::from(|e: yew::MouseEvent| e.stop_propagation())}>
              <div class="header">{ props.title.clone() }</div>
              <div class="content">
                  <p>{ props.message.clone() }</p>
              </div>
              <div class="footer">
                  <button type="button" class="btn" onclick={close}>{ "Cancel" }</button>
                  <button type="button" class="btn danger" onclick={confirm}>{ "Delete" }</button>
              </div>
          </div>
      </div>
  }
}

#[derive(Properties, PartialEq)]
pub struct PromptDialogProps {
  pub title:       String,
  pub label:       String,
  /// Receives the trimmed, non-empty
  /// input. Blank input cancels.
  pub on_submit:   Callback<String>,
  pub on_cancel:   Callback<()>,
  #[prop_or_default]
  pub placeholder: String
}

#[function_component(PromptDialog)]
pub fn prompt_dialog(
  props: &PromptDialogProps
) -> Html {
  let value = use_state(String::new);

  let submit = {
    let value = value.clone();
    let on_submit =
      props.on_submit.clone();
    let on_cancel =
      props.on_cancel.clone();
    Callback::from(move |_: ()| {
      let trimmed = value.trim();
      if trimmed.is_empty() {
        on_cancel.emit(());
      } else {
        on_submit
          .emit(trimmed.to_string());
      }
    })
  };

  let on_input = {
    let value = value.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        let input = e.target_unchecked_into::<web_sys::HtmlInputElement>();
        value.set(input.value());
      }
    )
  };
  let on_keydown = {
    let submit = submit.clone();
    let on_cancel =
      props.on_cancel.clone();
    Callback::from(
      move |e: web_sys::KeyboardEvent| {
        match e.key().as_str() {
          | "Enter" => {
            e.prevent_default();
            submit.emit(());
          }
          | "Escape" => on_cancel.emit(()),
          | _ => {}
        }
      }
    )
  };
  let on_cancel = props.on_cancel.clone();
  let close = Callback::from(
    move |_: yew::MouseEvent| {
      on_cancel.emit(())
    }
  );

  html! {
      <div class="modal-backdrop" onclick={close.clone()}>
          <div class="modal modal-sm" onclick={Callback::from(|e: yew::MouseEvent| e.stop_propagation())}>
              <div class="header">{ props.title.clone() }</div>
              <div class="content">
                  <div class="field">
                      <label>{ props.label.clone() }</label>
                      <input
                          value={(*value).clone()}
                          placeholder={props.placeholder.clone()}
                          oninput={on_input}
                          onkeydown={on_keydown}
                      />
                  </div>
              </div>
              <div class="footer">
                  <button type="button" class="btn" onclick={close}>{ "Cancel" }</button>
                  <button type="button" class="btn primary" onclick={move |_| submit.emit(())}>
                      { "Add" }
                  </button>
              </div>
          </div>
      </div>
  }
}

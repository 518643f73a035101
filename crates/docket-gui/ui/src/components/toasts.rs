use gloo::timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html,
  use_effect_with
};

use crate::app::Toast;

const TOAST_MS: u32 = 3_000;

#[derive(Properties, PartialEq)]
pub struct ToastStackProps {
  pub toasts:     Vec<Toast>,
  pub on_dismiss: Callback<u64>
}

#[function_component(ToastStack)]
pub fn toast_stack(
  props: &ToastStackProps
) -> Html {
  html! {
      <div class="toast-stack">
          {
              for props.toasts.iter().map(|toast| html! {
                  <ToastItem
                      key={toast.id}
                      toast={toast.clone()}
                      on_dismiss={props.on_dismiss.clone()}
                  />
              })
          }
      </div>
  }
}

#[derive(Properties, PartialEq)]
pub struct ToastItemProps {
  pub toast:      Toast,
  pub on_dismiss: Callback<u64>
}

#[function_component(ToastItem)]
pub fn toast_item(
  props: &ToastItemProps
) -> Html {
  {
    let on_dismiss =
      props.on_dismiss.clone();
    use_effect_with(
      props.toast.id,
      move |id| {
        let id = *id;
        spawn_local(async move {
          TimeoutFuture::new(TOAST_MS)
            .await;
          on_dismiss.emit(id);
        });
        || ()
      }
    );
  }

  let id = props.toast.id;
  let on_dismiss =
    props.on_dismiss.clone();

  html! {
      <div
          class={props.toast.kind.class()}
          onclick={move |_| on_dismiss.emit(id)}
      >
          { props.toast.message.clone() }
      </div>
  }
}

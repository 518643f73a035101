use std::cell::Cell;

use serde::{Serialize, de::DeserializeOwned};
use tauri_wasm::{args, invoke};

thread_local! {
    static REQUEST_SEQ: Cell<u64> = const { Cell::new(0) };
}

/// Command payload: the argument struct under `args` plus a request id the
/// host echoes into its logs.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a, A: Serialize + ?Sized> {
    #[serde(skip_serializing_if = "Option::is_none")]
    args: Option<&'a A>,
    request_id: String,
}

fn next_request_id(cmd: &str) -> String {
    let seq = REQUEST_SEQ.with(|cell| {
        let next = cell.get().wrapping_add(1);
        cell.set(next);
        next
    });
    format!("ui-{cmd}-{seq}")
}

pub async fn invoke_tauri<R, A>(cmd: &str, args_payload: &A) -> Result<R, String>
where
    R: DeserializeOwned,
    A: Serialize + ?Sized,
{
    send(cmd, Some(args_payload)).await
}

/// For commands that take no argument struct.
pub async fn invoke_bare<R>(cmd: &str) -> Result<R, String>
where
    R: DeserializeOwned,
{
    send::<R, ()>(cmd, None).await
}

async fn send<R, A>(cmd: &str, args_payload: Option<&A>) -> Result<R, String>
where
    R: DeserializeOwned,
    A: Serialize + ?Sized,
{
    let envelope = Envelope {
        args: args_payload,
        request_id: next_request_id(cmd),
    };
    let payload = args(&envelope).map_err(|e| format!("failed to encode args: {e}"))?;
    let value = invoke(cmd)
        .with_args(payload)
        .await
        .map_err(|e| format!("invoke error: {e:?}"))?;

    serde_wasm_bindgen::from_value(value).map_err(|e| format!("decode error: {e}"))
}

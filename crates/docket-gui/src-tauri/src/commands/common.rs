use docket_core::OpsError;
use tracing::{
  error,
  warn
};

/// Logs a failed command and collapses
/// the result to an `Option`. Input
/// the facade rejected logs as a
/// warning; everything else is an
/// error.
pub(crate) fn report<T>(
  command: &str,
  request_id: Option<&str>,
  result: anyhow::Result<T>
) -> Option<T> {
  match result {
    | Ok(value) => Some(value),
    | Err(err) => {
      let rejected = err
        .downcast_ref::<OpsError>()
        .is_some_and(OpsError::is_rejection);
      if rejected {
        warn!(command, request_id = ?request_id, error = %err, "command rejected");
      } else {
        error!(command, request_id = ?request_id, error = %format!("{err:#}"), "command failed");
      }
      None
    }
  }
}

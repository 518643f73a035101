//! One-shot due-date reminders.
//!
//! Each armed reminder is a tokio task
//! sleeping until the due instant.
//! Registrations live only in memory;
//! after a restart the host re-arms
//! them from the task file with
//! [`ReminderScheduler::rearm_all`].

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{
  AtomicU64,
  Ordering
};

use chrono::{
  DateTime,
  Utc
};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{
  debug,
  error,
  info,
  warn
};

use crate::datetime::parse_due;
use crate::task::{
  Task,
  TaskId
};

pub const DEFAULT_REMINDER_TITLE: &str =
  "Task Reminder";

/// Sink for OS-level notifications.
pub trait Notifier:
  Send + Sync + 'static
{
  fn is_supported(&self) -> bool {
    true
  }

  fn notify(
    &self,
    title: &str,
    body: &str
  ) -> anyhow::Result<()>;
}

/// Body text naming the task and its
/// priority.
pub fn reminder_body(
  task: &Task
) -> String {
  let priority = task
    .priority
    .map(|p| p.as_str())
    .unwrap_or("N/A");
  format!(
    "{} is due! (Priority: {priority})",
    task.title
  )
}

struct Armed {
  generation: u64,
  due:        DateTime<Utc>,
  handle:     JoinHandle<()>
}

pub struct ReminderScheduler<N: Notifier> {
  notifier:   Arc<N>,
  title:      String,
  enabled:    bool,
  armed: Arc<Mutex<HashMap<TaskId, Armed>>>,
  generation: AtomicU64
}

impl<N: Notifier> ReminderScheduler<N> {
  pub fn new(notifier: Arc<N>) -> Self {
    Self {
      notifier,
      title: DEFAULT_REMINDER_TITLE
        .to_string(),
      enabled: true,
      armed: Arc::new(Mutex::new(
        HashMap::new()
      )),
      generation: AtomicU64::new(0)
    }
  }

  #[must_use]
  pub fn with_title(
    mut self,
    title: impl Into<String>
  ) -> Self {
    self.title = title.into();
    self
  }

  #[must_use]
  pub fn enabled(
    mut self,
    enabled: bool
  ) -> Self {
    self.enabled = enabled;
    self
  }

  pub fn notifier(&self) -> &N {
    &self.notifier
  }

  /// Sends a notification right away.
  pub fn notify_now(
    &self,
    title: &str,
    body: &str
  ) -> bool {
    if !self.notifier.is_supported() {
      warn!("notifications unsupported; dropping notification");
      return false;
    }
    match self.notifier.notify(title, body)
    {
      | Ok(()) => true,
      | Err(err) => {
        error!(error = %err, "notification failed");
        false
      }
    }
  }

  /// Arms from a raw due-date string as
  /// received over IPC.
  pub fn schedule_raw(
    &self,
    task: &Task,
    due: Option<&str>,
    now: DateTime<Utc>
  ) -> bool {
    let parsed = match due
      .map(str::trim)
      .filter(|raw| !raw.is_empty())
    {
      | None => None,
      | Some(raw) => match parse_due(raw) {
        | Ok(parsed) => Some(parsed),
        | Err(err) => {
          warn!(
            id = %task.id,
            due = raw,
            error = %err,
            "unparseable due date; reminder not armed"
          );
          return false;
        }
      }
    };
    self.schedule(task, parsed, now)
  }

  /// Arms a one-shot reminder for
  /// `task` at `due`. Returns false,
  /// arming nothing, when the due date
  /// is missing or not in the future,
  /// the task is completed, or no timer
  /// could be registered. Re-arming
  /// replaces an earlier registration.
  #[tracing::instrument(skip(self, task, now), fields(id = %task.id))]
  pub fn schedule(
    &self,
    task: &Task,
    due: Option<DateTime<Utc>>,
    now: DateTime<Utc>
  ) -> bool {
    if !self.enabled {
      debug!("reminders disabled");
      return false;
    }
    let Some(due) = due else {
      debug!("no due date; reminder not armed");
      return false;
    };
    if due <= now {
      info!(
        due = %due,
        title = %task.title,
        "due date already passed; reminder skipped"
      );
      return false;
    }
    if task.is_completed() {
      debug!("task completed; reminder not armed");
      return false;
    }
    if !self.notifier.is_supported() {
      warn!("notifications unsupported; reminder not armed");
      return false;
    }
    let Ok(runtime) = Handle::try_current()
    else {
      error!("no async runtime available; reminder not armed");
      return false;
    };
    let delay = match (due - now).to_std() {
      | Ok(delay) => delay,
      | Err(err) => {
        error!(error = %err, "invalid reminder delay");
        return false;
      }
    };

    let generation = self
      .generation
      .fetch_add(1, Ordering::Relaxed);
    let id = task.id.clone();
    let title = self.title.clone();
    let body = reminder_body(task);
    let notifier = Arc::clone(&self.notifier);
    let armed = Arc::clone(&self.armed);

    // The registry lock is held across
    // spawn so a fast timer cannot look
    // for its entry before it exists.
    let mut registry = self.armed.lock();
    let handle = runtime.spawn({
      let id = id.clone();
      async move {
        tokio::time::sleep(delay).await;

        let still_armed = {
          let mut registry = armed.lock();
          match registry.get(&id) {
            | Some(entry)
              if entry.generation
                == generation =>
            {
              registry.remove(&id);
              true
            }
            | _ => false
          }
        };
        if !still_armed {
          return;
        }

        match notifier.notify(&title, &body)
        {
          | Ok(()) => {
            info!(id = %id, "reminder fired")
          }
          | Err(err) => {
            error!(id = %id, error = %err, "reminder notification failed")
          }
        }
      }
    });

    if let Some(previous) = registry.insert(
      id,
      Armed {
        generation,
        due,
        handle
      }
    ) {
      previous.handle.abort();
      debug!(previous_due = %previous.due, "replaced armed reminder");
    }

    info!(due = %due, "reminder armed");
    true
  }

  /// Arms, re-arms or cancels so the
  /// registration matches the task's
  /// current due date and status. Any
  /// outcome other than a fresh timer
  /// leaves the task unarmed.
  pub fn sync(
    &self,
    task: &Task,
    now: DateTime<Utc>
  ) -> bool {
    let armed =
      self.schedule(task, task.due_date, now);
    if !armed && self.cancel(&task.id) {
      debug!(id = %task.id, "stale reminder dropped on sync");
    }
    armed
  }

  /// Drops a registration so it never
  /// fires. Returns whether one existed.
  pub fn cancel(
    &self,
    id: &TaskId
  ) -> bool {
    match self.armed.lock().remove(id) {
      | Some(entry) => {
        entry.handle.abort();
        debug!(id = %id, "reminder cancelled");
        true
      }
      | None => false
    }
  }

  pub fn cancel_all(&self) -> usize {
    let mut registry = self.armed.lock();
    let count = registry.len();
    for (_, entry) in registry.drain() {
      entry.handle.abort();
    }
    count
  }

  /// Arms every future-dated, open task.
  /// Returns how many were armed.
  #[tracing::instrument(skip_all, fields(count = tasks.len()))]
  pub fn rearm_all(
    &self,
    tasks: &[Task],
    now: DateTime<Utc>
  ) -> usize {
    let armed = tasks
      .iter()
      .filter(|task| {
        task.due_date.is_some()
          && !task.is_completed()
      })
      .filter(|task| {
        self.schedule(
          task,
          task.due_date,
          now
        )
      })
      .count();
    info!(armed, "re-armed reminders");
    armed
  }

  pub fn is_armed(
    &self,
    id: &TaskId
  ) -> bool {
    self.armed.lock().contains_key(id)
  }

  pub fn armed_count(&self) -> usize {
    self.armed.lock().len()
  }
}

impl<N: Notifier> Drop
  for ReminderScheduler<N>
{
  fn drop(&mut self) {
    self.cancel_all();
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;
  use std::time::Duration as StdDuration;

  use chrono::{
    Duration,
    Utc
  };
  use parking_lot::Mutex;

  use super::{
    Notifier,
    ReminderScheduler
  };
  use crate::task::{
    NewTask,
    Priority,
    Status,
    Task
  };

  #[derive(Default)]
  struct Recorder {
    sent:        Mutex<Vec<(String, String)>>,
    unsupported: bool
  }

  impl Notifier for Recorder {
    fn is_supported(&self) -> bool {
      !self.unsupported
    }

    fn notify(
      &self,
      title: &str,
      body: &str
    ) -> anyhow::Result<()> {
      self
        .sent
        .lock()
        .push((title.to_string(), body.to_string()));
      Ok(())
    }
  }

  fn task_due_in(minutes: i64) -> Task {
    let now = Utc::now();
    NewTask {
      title: "Pay bills".to_string(),
      priority: Some(Priority::High),
      due_date: Some(now + Duration::minutes(minutes)),
      ..NewTask::default()
    }
    .into_task(now)
  }

  #[tokio::test(start_paused = true)]
  async fn fires_exactly_once_at_due_time() {
    let recorder = Arc::new(Recorder::default());
    let scheduler =
      ReminderScheduler::new(Arc::clone(&recorder));
    let task = task_due_in(10);

    assert!(scheduler.schedule(&task, task.due_date, Utc::now()));
    assert!(scheduler.is_armed(&task.id));

    tokio::time::sleep(StdDuration::from_secs(5 * 60)).await;
    assert!(recorder.sent.lock().is_empty());

    tokio::time::sleep(StdDuration::from_secs(6 * 60)).await;
    let sent = recorder.sent.lock().clone();
    assert_eq!(
      sent,
      vec![(
        "Task Reminder".to_string(),
        "Pay bills is due! (Priority: high)".to_string()
      )]
    );
    assert!(!scheduler.is_armed(&task.id));
  }

  #[tokio::test(start_paused = true)]
  async fn past_due_date_is_not_armed() {
    let recorder = Arc::new(Recorder::default());
    let scheduler =
      ReminderScheduler::new(Arc::clone(&recorder));
    let task = task_due_in(-1);

    assert!(!scheduler.schedule(&task, task.due_date, Utc::now()));
    assert_eq!(scheduler.armed_count(), 0);

    tokio::time::sleep(StdDuration::from_secs(3600)).await;
    assert!(recorder.sent.lock().is_empty());
  }

  #[tokio::test(start_paused = true)]
  async fn raw_due_dates_must_parse() {
    let recorder = Arc::new(Recorder::default());
    let scheduler =
      ReminderScheduler::new(Arc::clone(&recorder));
    let task = task_due_in(10);

    assert!(!scheduler.schedule_raw(&task, Some("soonish"), Utc::now()));
    assert!(!scheduler.schedule_raw(&task, Some(""), Utc::now()));
    assert!(!scheduler.schedule_raw(&task, None, Utc::now()));

    let due = (Utc::now() + Duration::hours(1)).to_rfc3339();
    assert!(scheduler.schedule_raw(&task, Some(&due), Utc::now()));
  }

  #[tokio::test(start_paused = true)]
  async fn cancelled_reminder_never_fires() {
    let recorder = Arc::new(Recorder::default());
    let scheduler =
      ReminderScheduler::new(Arc::clone(&recorder));
    let task = task_due_in(1);

    assert!(scheduler.schedule(&task, task.due_date, Utc::now()));
    assert!(scheduler.cancel(&task.id));
    assert!(!scheduler.cancel(&task.id));

    tokio::time::sleep(StdDuration::from_secs(600)).await;
    assert!(recorder.sent.lock().is_empty());
  }

  #[tokio::test(start_paused = true)]
  async fn rearming_replaces_the_previous_timer() {
    let recorder = Arc::new(Recorder::default());
    let scheduler =
      ReminderScheduler::new(Arc::clone(&recorder));
    let task = task_due_in(1);
    let now = Utc::now();

    assert!(scheduler.schedule(&task, task.due_date, now));
    assert!(scheduler.schedule(&task, Some(now + Duration::minutes(30)), now));
    assert_eq!(scheduler.armed_count(), 1);

    tokio::time::sleep(StdDuration::from_secs(10 * 60)).await;
    assert!(recorder.sent.lock().is_empty());

    tokio::time::sleep(StdDuration::from_secs(25 * 60)).await;
    assert_eq!(recorder.sent.lock().len(), 1);
  }

  #[tokio::test(start_paused = true)]
  async fn sync_cancels_when_task_completes() {
    let recorder = Arc::new(Recorder::default());
    let scheduler =
      ReminderScheduler::new(Arc::clone(&recorder));
    let mut task = task_due_in(5);
    let now = Utc::now();

    assert!(scheduler.sync(&task, now));
    task.status = Status::Completed;
    assert!(!scheduler.sync(&task, now));
    assert!(!scheduler.is_armed(&task.id));
  }

  #[tokio::test(start_paused = true)]
  async fn sync_drops_timer_when_due_moves_into_the_past() {
    let recorder = Arc::new(Recorder::default());
    let scheduler =
      ReminderScheduler::new(Arc::clone(&recorder));
    let mut task = task_due_in(10);
    let now = Utc::now();

    assert!(scheduler.sync(&task, now));
    task.due_date = Some(now - Duration::hours(1));
    assert!(!scheduler.sync(&task, now));
    assert!(!scheduler.is_armed(&task.id));

    tokio::time::sleep(StdDuration::from_secs(15 * 60)).await;
    assert!(recorder.sent.lock().is_empty());
  }

  #[tokio::test(start_paused = true)]
  async fn sync_drops_timer_when_due_date_is_cleared() {
    let recorder = Arc::new(Recorder::default());
    let scheduler =
      ReminderScheduler::new(Arc::clone(&recorder));
    let mut task = task_due_in(10);
    let now = Utc::now();

    assert!(scheduler.sync(&task, now));
    task.due_date = None;
    assert!(!scheduler.sync(&task, now));
    assert_eq!(scheduler.armed_count(), 0);

    tokio::time::sleep(StdDuration::from_secs(15 * 60)).await;
    assert!(recorder.sent.lock().is_empty());
  }

  #[tokio::test(start_paused = true)]
  async fn rearm_all_skips_past_completed_and_undated() {
    let recorder = Arc::new(Recorder::default());
    let scheduler =
      ReminderScheduler::new(Arc::clone(&recorder));

    let future = task_due_in(30);
    let past = task_due_in(-30);
    let mut done = task_due_in(30);
    done.status = Status::Completed;
    let undated = NewTask::titled("someday").into_task(Utc::now());

    let armed = scheduler.rearm_all(
      &[future.clone(), past, done, undated],
      Utc::now()
    );
    assert_eq!(armed, 1);
    assert!(scheduler.is_armed(&future.id));

    assert_eq!(scheduler.cancel_all(), 1);
    tokio::time::sleep(StdDuration::from_secs(3600)).await;
    assert!(recorder.sent.lock().is_empty());
  }

  #[tokio::test(start_paused = true)]
  async fn unsupported_notifier_or_disabled_scheduler_arms_nothing() {
    let unsupported = Arc::new(Recorder {
      unsupported: true,
      ..Recorder::default()
    });
    let scheduler = ReminderScheduler::new(unsupported);
    let task = task_due_in(10);
    assert!(!scheduler.schedule(&task, task.due_date, Utc::now()));
    assert!(!scheduler.notify_now("t", "b"));

    let disabled =
      ReminderScheduler::new(Arc::new(Recorder::default())).enabled(false);
    assert!(!disabled.schedule(&task, task.due_date, Utc::now()));
  }

  #[test]
  fn scheduling_without_a_runtime_fails() {
    let scheduler =
      ReminderScheduler::new(Arc::new(Recorder::default()));
    let task = task_due_in(10);
    assert!(!scheduler.schedule(&task, task.due_date, Utc::now()));
  }
}

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use docket_core::datastore::DataStore;
use docket_core::reminder::{Notifier, ReminderScheduler};
use docket_core::task::{NewTask, Priority, Status, TaskPatch};
use docket_core::{OpsError, TaskOps, TrackedTasks};
use parking_lot::Mutex;
use tempfile::{TempDir, tempdir};

fn open_ops() -> (TempDir, TaskOps) {
    let temp = tempdir().expect("tempdir");
    let store = DataStore::open(&temp.path().join("tasks.json")).expect("open datastore");
    (temp, TaskOps::new(store))
}

fn open_tracked() -> (TempDir, Arc<Recorder>, TrackedTasks<Recorder>) {
    let (temp, ops) = open_ops();
    let recorder = Arc::new(Recorder::default());
    let tasks = TrackedTasks::new(ops, ReminderScheduler::new(Arc::clone(&recorder)));
    (temp, recorder, tasks)
}

#[derive(Default)]
struct Recorder {
    sent: Mutex<Vec<String>>,
}

impl Notifier for Recorder {
    fn notify(&self, _title: &str, body: &str) -> anyhow::Result<()> {
        self.sent.lock().push(body.to_string());
        Ok(())
    }
}

#[test]
fn pay_bills_lifecycle() {
    let (_temp, ops) = open_ops();
    let created_at = Utc::now();

    let task = ops
        .create(
            NewTask {
                title: "Pay bills".to_string(),
                priority: Some(Priority::High),
                status: Status::Todo,
                due_date: Some(created_at + Duration::days(1)),
                repeat: None,
            },
            created_at,
        )
        .expect("create task");

    let loaded = ops.list().expect("list");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].title, "Pay bills");
    assert_eq!(loaded[0].id, task.id);

    ops.update(
        &task.id,
        TaskPatch::status(Status::Completed),
        created_at + Duration::seconds(5),
    )
    .expect("complete task");

    let reloaded = ops.get(&task.id).expect("reload");
    assert_eq!(reloaded.status, Status::Completed);
    assert!(reloaded.updated > reloaded.created);
}

#[test]
fn created_tasks_get_unique_ids_and_survive_reopen() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("tasks.json");
    let now = Utc::now();

    let ops = TaskOps::new(DataStore::open(&path).expect("open"));
    let a = ops.create(NewTask::titled("alpha"), now).expect("create a");
    let b = ops.create(NewTask::titled("beta"), now).expect("create b");
    assert_ne!(a.id, b.id);

    let reopened = TaskOps::new(DataStore::open(&path).expect("reopen"));
    let titles: Vec<String> = reopened
        .list()
        .expect("list")
        .into_iter()
        .map(|task| task.title)
        .collect();
    assert!(titles.contains(&"alpha".to_string()));
    assert!(titles.contains(&"beta".to_string()));
}

#[test]
fn delete_removes_only_the_matching_record() {
    let (_temp, ops) = open_ops();
    let now = Utc::now();
    let keep_one = ops.create(NewTask::titled("keep one"), now).expect("create");
    let doomed = ops.create(NewTask::titled("doomed"), now).expect("create");
    let keep_two = ops
        .create(
            NewTask {
                title: "keep two".to_string(),
                priority: Some(Priority::Low),
                ..NewTask::default()
            },
            now,
        )
        .expect("create");

    assert!(ops.delete(&doomed.id).expect("delete"));

    let remaining = ops.list().expect("list");
    assert_eq!(remaining.len(), 2);
    for original in [&keep_one, &keep_two] {
        let found = remaining
            .iter()
            .find(|task| task.id == original.id)
            .expect("survivor present");
        assert_eq!(found, original);
    }
}

#[test]
fn completing_touches_only_status_and_updated() {
    let (_temp, ops) = open_ops();
    let now = Utc::now();
    let task = ops
        .create(
            NewTask {
                title: "File taxes".to_string(),
                priority: Some(Priority::Medium),
                due_date: Some(now + Duration::days(3)),
                ..NewTask::default()
            },
            now,
        )
        .expect("create");
    ops.add_subtask(&task.id, "gather receipts", now).expect("add subtask");
    let before = ops.get(&task.id).expect("get");

    let after = ops
        .update(&task.id, TaskPatch::status(Status::Completed), now + Duration::minutes(1))
        .expect("complete");

    assert_eq!(after.title, before.title);
    assert_eq!(after.priority, before.priority);
    assert_eq!(after.due_date, before.due_date);
    assert_eq!(after.subtasks, before.subtasks);
    assert_eq!(after.created, before.created);
    assert_eq!(after.status, Status::Completed);
    assert_ne!(after.updated, before.updated);
}

#[test]
fn subtask_add_then_remove_restores_original_list() {
    let (_temp, ops) = open_ops();
    let now = Utc::now();
    let task = ops.create(NewTask::titled("Move house"), now).expect("create");
    ops.add_subtask(&task.id, "book van", now).expect("add first");
    let original = ops.get(&task.id).expect("get").subtasks;

    let added = ops.add_subtask(&task.id, "pack books", now).expect("add second");
    assert_eq!(ops.get(&task.id).expect("get").subtasks.len(), 2);

    assert!(ops.remove_subtask(&task.id, &added.id, now).expect("remove"));
    assert_eq!(ops.get(&task.id).expect("get").subtasks, original);
}

#[test]
fn rejected_input_leaves_store_untouched() {
    let (_temp, ops) = open_ops();
    let now = Utc::now();
    ops.create(NewTask::titled("only"), now).expect("create");
    let snapshot = std::fs::read_to_string(&ops.store().path).expect("read file");

    assert!(matches!(
        ops.create(NewTask::titled(""), now),
        Err(OpsError::EmptyTitle)
    ));
    assert_eq!(
        std::fs::read_to_string(&ops.store().path).expect("read file"),
        snapshot
    );
}

#[tokio::test(start_paused = true)]
async fn past_due_reminder_is_refused_and_silent() {
    let (_temp, ops) = open_ops();
    let now = Utc::now();
    let task = ops
        .create(
            NewTask {
                title: "Yesterday's call".to_string(),
                due_date: Some(now - Duration::hours(2)),
                ..NewTask::default()
            },
            now,
        )
        .expect("create");

    let recorder = Arc::new(Recorder::default());
    let reminders = ReminderScheduler::new(Arc::clone(&recorder));
    assert!(!reminders.schedule(&task, task.due_date, now));

    tokio::time::sleep(StdDuration::from_secs(3 * 3600)).await;
    assert!(recorder.sent.lock().is_empty());
}

#[tokio::test(start_paused = true)]
async fn startup_rearm_fires_future_reminders_from_disk() {
    let (_temp, ops) = open_ops();
    let now = Utc::now();
    ops.create(
        NewTask {
            title: "Stand-up".to_string(),
            priority: Some(Priority::Low),
            due_date: Some(now + Duration::minutes(15)),
            ..NewTask::default()
        },
        now,
    )
    .expect("create");
    ops.create(NewTask::titled("no date"), now).expect("create");

    let recorder = Arc::new(Recorder::default());
    let reminders = ReminderScheduler::new(Arc::clone(&recorder));
    let tasks = ops.list().expect("list");
    assert_eq!(reminders.rearm_all(&tasks, now), 1);

    tokio::time::sleep(StdDuration::from_secs(16 * 60)).await;
    assert_eq!(
        recorder.sent.lock().clone(),
        vec!["Stand-up is due! (Priority: low)".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn moving_due_date_later_rearms_once() {
    let (_temp, recorder, tasks) = open_tracked();
    let now = Utc::now();
    let task = tasks
        .create(
            NewTask {
                title: "Pay bills".to_string(),
                due_date: Some(now + Duration::minutes(10)),
                ..NewTask::default()
            },
            now,
        )
        .expect("create");
    assert!(tasks.reminders().is_armed(&task.id));

    let patch = TaskPatch {
        due_date: Some(Some(now + Duration::minutes(30))),
        ..TaskPatch::default()
    };
    tasks.update(&task.id, patch, now).expect("move due date");
    assert_eq!(tasks.reminders().armed_count(), 1);

    tokio::time::sleep(StdDuration::from_secs(15 * 60)).await;
    assert!(recorder.sent.lock().is_empty());

    tokio::time::sleep(StdDuration::from_secs(20 * 60)).await;
    assert_eq!(
        recorder.sent.lock().clone(),
        vec!["Pay bills is due! (Priority: N/A)".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn moving_due_date_into_the_past_cancels_the_reminder() {
    let (_temp, recorder, tasks) = open_tracked();
    let now = Utc::now();
    let task = tasks
        .create(
            NewTask {
                title: "Pay bills".to_string(),
                due_date: Some(now + Duration::minutes(10)),
                ..NewTask::default()
            },
            now,
        )
        .expect("create");

    let patch = TaskPatch {
        due_date: Some(Some(now - Duration::hours(1))),
        ..TaskPatch::default()
    };
    tasks.update(&task.id, patch, now).expect("move due date");
    assert!(!tasks.reminders().is_armed(&task.id));

    tokio::time::sleep(StdDuration::from_secs(15 * 60)).await;
    assert!(recorder.sent.lock().is_empty());
}

#[tokio::test(start_paused = true)]
async fn deleting_a_task_cancels_its_reminder() {
    let (_temp, recorder, tasks) = open_tracked();
    let now = Utc::now();
    let task = tasks
        .create(
            NewTask {
                title: "Dentist".to_string(),
                due_date: Some(now + Duration::minutes(5)),
                ..NewTask::default()
            },
            now,
        )
        .expect("create");

    assert!(tasks.delete(&task.id).expect("delete"));
    assert_eq!(tasks.reminders().armed_count(), 0);

    tokio::time::sleep(StdDuration::from_secs(10 * 60)).await;
    assert!(recorder.sent.lock().is_empty());
}

#[tokio::test(start_paused = true)]
async fn replacing_the_snapshot_rebuilds_timers_and_keeps_extra_fields() {
    let (_temp, recorder, tasks) = open_tracked();
    let now = Utc::now();
    let old = tasks
        .create(
            NewTask {
                title: "Old".to_string(),
                due_date: Some(now + Duration::minutes(5)),
                ..NewTask::default()
            },
            now,
        )
        .expect("create");

    let mut stored = tasks.get(&old.id).expect("get");
    stored
        .extra
        .insert("colour".to_string(), serde_json::json!("teal"));
    let mut tagged = stored.clone();
    tasks.replace_all(vec![tagged.clone()], now).expect("seed extra");

    tagged.extra.clear();
    tagged.due_date = None;
    let fresh = NewTask {
        title: "Fresh".to_string(),
        due_date: Some(now + Duration::minutes(20)),
        ..NewTask::default()
    }
    .into_task(now);
    let armed = tasks
        .replace_all(vec![tagged, fresh.clone()], now)
        .expect("replace");
    assert_eq!(armed, 1);
    assert!(!tasks.reminders().is_armed(&old.id));
    assert!(tasks.reminders().is_armed(&fresh.id));
    assert_eq!(
        tasks.get(&old.id).expect("get").extra.get("colour"),
        Some(&serde_json::json!("teal"))
    );

    tokio::time::sleep(StdDuration::from_secs(25 * 60)).await;
    assert_eq!(
        recorder.sent.lock().clone(),
        vec!["Fresh is due! (Priority: N/A)".to_string()]
    );
}

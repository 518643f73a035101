use std::sync::Arc;

use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use docket_core::config::Config;
use docket_core::datastore::DataStore;
use docket_core::datetime::{Zone, format_due, parse_due_in, to_timestamp};
use docket_core::reminder::ReminderScheduler;
use docket_core::task::{
    NewTask, Priority, Repeat, Status, Subtask, SubtaskId, Task, TaskId,
    TaskPatch as CorePatch,
};
use docket_core::{TaskOps, TrackedTasks};
use docket_gui_shared::{
    RepeatInterval, SubtaskAddArgs, SubtaskDto, SubtaskRemoveArgs, TaskCreate, TaskDto, TaskPatch,
    TaskPriority, TaskStatus, TaskUpdateArgs,
};
use tracing::{debug, info, instrument, warn};

use crate::notifier::TauriNotifier;

pub type Tasks = TrackedTasks<TauriNotifier<tauri::Wry>>;

pub struct AppState {
    tasks: Tasks,
    zone: Zone,
    rearm_on_startup: bool,
}

impl AppState {
    pub fn new(config: &Config, notifier: TauriNotifier<tauri::Wry>) -> anyhow::Result<Self> {
        let path = config.tasks_path();
        let store = DataStore::open(&path)
            .with_context(|| format!("failed to open task store at {}", path.display()))?;

        match store.migrate() {
            Ok(true) => info!(file = %path.display(), "migrated legacy task file"),
            Ok(false) => {}
            Err(err) => warn!(error = %err, "task file could not be migrated; leaving it untouched"),
        }

        let reminders = ReminderScheduler::new(Arc::new(notifier))
            .with_title(config.reminders.title.clone())
            .enabled(config.reminders.enabled);

        Ok(Self {
            tasks: TrackedTasks::new(TaskOps::new(store), reminders),
            zone: config.zone(),
            rearm_on_startup: config.reminders.rearm_on_startup,
        })
    }

    pub fn notifier(&self) -> &TauriNotifier<tauri::Wry> {
        self.tasks.reminders().notifier()
    }

    /// Arms reminders for every open, future-dated task on disk. Must run on
    /// the async runtime.
    #[instrument(skip(self))]
    pub fn rearm_reminders(&self) -> anyhow::Result<usize> {
        if !self.rearm_on_startup {
            debug!("start-up re-arm disabled");
            return Ok(0);
        }
        Ok(self.tasks.rearm(Utc::now())?)
    }

    #[instrument(skip(self))]
    pub fn list(&self) -> anyhow::Result<Vec<TaskDto>> {
        let now = Utc::now();
        let tasks = self.tasks.list()?;
        Ok(tasks
            .into_iter()
            .map(|task| task_to_dto(task, &self.zone, now))
            .collect())
    }

    #[instrument(skip(self, create), fields(title_len = create.title.len()))]
    pub fn create(&self, create: TaskCreate) -> anyhow::Result<TaskDto> {
        let now = Utc::now();
        let draft = NewTask {
            title: create.title,
            priority: create.priority.map(priority_to_core),
            status: create.status.map(status_to_core).unwrap_or_default(),
            due_date: parse_optional_due(create.due.as_deref(), &self.zone)?,
            repeat: create.repeat.map(repeat_to_core),
        };

        let task = self.tasks.create(draft, now)?;
        Ok(task_to_dto(task, &self.zone, now))
    }

    #[instrument(skip(self, update), fields(id = %update.id))]
    pub fn update(&self, update: TaskUpdateArgs) -> anyhow::Result<TaskDto> {
        let now = Utc::now();
        let id = TaskId::from(update.id);
        let patch = patch_to_core(update.patch, &self.zone)?;

        let task = self.tasks.update(&id, patch, now)?;
        Ok(task_to_dto(task, &self.zone, now))
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: &str) -> anyhow::Result<bool> {
        Ok(self.tasks.delete(&TaskId::from(id))?)
    }

    #[instrument(skip(self, args), fields(task_id = %args.task_id))]
    pub fn add_subtask(&self, args: SubtaskAddArgs) -> anyhow::Result<SubtaskDto> {
        let parent = TaskId::from(args.task_id);
        let subtask = self.tasks.add_subtask(&parent, &args.title, Utc::now())?;
        Ok(subtask_to_dto(subtask))
    }

    #[instrument(skip(self, args), fields(task_id = %args.task_id, subtask_id = %args.subtask_id))]
    pub fn remove_subtask(&self, args: SubtaskRemoveArgs) -> anyhow::Result<bool> {
        let removed = self.tasks.remove_subtask(
            &TaskId::from(args.task_id),
            &SubtaskId::from(args.subtask_id),
            Utc::now(),
        )?;
        Ok(removed)
    }

    /// Overwrites the task file with a UI-supplied snapshot. Fields the DTO
    /// does not carry survive from the stored record with the same id.
    #[instrument(skip(self, tasks), fields(count = tasks.len()))]
    pub fn replace_all(&self, tasks: Vec<TaskDto>) -> anyhow::Result<()> {
        let tasks = tasks
            .into_iter()
            .map(|dto| dto_to_task(dto, &self.zone))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let armed = self.tasks.replace_all(tasks, Utc::now())?;
        debug!(armed, "snapshot saved");
        Ok(())
    }

    /// Arms a reminder for a stored task, optionally at an explicit due
    /// date instead of the stored one.
    #[instrument(skip(self))]
    pub fn schedule_reminder(&self, task_id: &str, due: Option<&str>) -> anyhow::Result<bool> {
        let due = match due {
            Some(raw) => match parse_due_in(raw, &self.zone) {
                Ok(due) => Some(due),
                Err(err) => {
                    warn!(due = raw, error = %err, "unparseable reminder due date");
                    return Ok(false);
                }
            },
            None => None,
        };
        Ok(self.tasks.schedule(&TaskId::from(task_id), due, Utc::now())?)
    }

    pub fn cancel_reminder(&self, task_id: &str) -> bool {
        self.tasks.reminders().cancel(&TaskId::from(task_id))
    }

    pub fn notify(&self, title: &str, body: &str) -> bool {
        self.tasks.reminders().notify_now(title, body)
    }

    /// Display form of a due-date input; input that does not parse comes
    /// back unchanged.
    pub fn format_date(&self, value: &str) -> String {
        match parse_due_in(value, &self.zone) {
            Ok(dt) => format_due(dt, &self.zone),
            Err(_) => value.trim().to_string(),
        }
    }

    pub fn to_date(&self, value: &str) -> Option<String> {
        parse_due_in(value, &self.zone).ok().map(to_timestamp)
    }
}

fn parse_optional_due(raw: Option<&str>, zone: &Zone) -> anyhow::Result<Option<DateTime<Utc>>> {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => parse_due_in(raw, zone).map(Some),
        None => Ok(None),
    }
}

fn patch_to_core(patch: TaskPatch, zone: &Zone) -> anyhow::Result<CorePatch> {
    let due_date = match patch.due {
        Some(raw) => Some(parse_optional_due(raw.as_deref(), zone)?),
        None => None,
    };
    Ok(CorePatch {
        title: patch.title,
        priority: patch.priority.map(|p| p.map(priority_to_core)),
        status: patch.status.map(status_to_core),
        due_date,
        repeat: patch.repeat.map(|r| r.map(repeat_to_core)),
    })
}

fn task_to_dto(task: Task, zone: &Zone, now: DateTime<Utc>) -> TaskDto {
    let overdue = task.due_date.is_some_and(|due| due <= now) && !task.is_completed();
    TaskDto {
        id: task.id.to_string(),
        title: task.title,
        priority: task.priority.map(priority_from_core),
        status: status_from_core(task.status),
        due: task.due_date.map(to_timestamp),
        due_display: task.due_date.map(|due| format_due(due, zone)),
        overdue,
        repeat: task.repeat.map(repeat_from_core),
        subtasks: task.subtasks.into_iter().map(subtask_to_dto).collect(),
        created: stamp_string(task.created),
        updated: stamp_string(task.updated),
    }
}

fn dto_to_task(dto: TaskDto, zone: &Zone) -> anyhow::Result<Task> {
    if dto.id.trim().is_empty() {
        return Err(anyhow!("task id cannot be empty"));
    }
    let mut task = Task::new(dto.title.trim().to_string(), Utc::now());
    task.id = TaskId::from(dto.id);
    task.priority = dto.priority.map(priority_to_core);
    task.status = status_to_core(dto.status);
    task.due_date = parse_optional_due(dto.due.as_deref(), zone)
        .with_context(|| format!("invalid due date for task {}", task.id))?;
    task.repeat = dto.repeat.map(repeat_to_core);
    task.subtasks = dto
        .subtasks
        .into_iter()
        .map(|sub| Subtask {
            id: SubtaskId::from(sub.id),
            title: sub.title,
        })
        .collect();
    task.created = parse_stamp(&dto.created);
    task.updated = parse_stamp(&dto.updated);
    Ok(task)
}

fn subtask_to_dto(subtask: Subtask) -> SubtaskDto {
    SubtaskDto {
        id: subtask.id.to_string(),
        title: subtask.title,
    }
}

fn stamp_string(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn parse_stamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

fn status_to_core(status: TaskStatus) -> Status {
    match status {
        TaskStatus::Todo => Status::Todo,
        TaskStatus::InProgress => Status::InProgress,
        TaskStatus::Completed => Status::Completed,
    }
}

fn status_from_core(status: Status) -> TaskStatus {
    match status {
        Status::Todo => TaskStatus::Todo,
        Status::InProgress => TaskStatus::InProgress,
        Status::Completed => TaskStatus::Completed,
    }
}

fn priority_to_core(priority: TaskPriority) -> Priority {
    match priority {
        TaskPriority::Low => Priority::Low,
        TaskPriority::Medium => Priority::Medium,
        TaskPriority::High => Priority::High,
    }
}

fn priority_from_core(priority: Priority) -> TaskPriority {
    match priority {
        Priority::Low => TaskPriority::Low,
        Priority::Medium => TaskPriority::Medium,
        Priority::High => TaskPriority::High,
    }
}

fn repeat_to_core(repeat: RepeatInterval) -> Repeat {
    match repeat {
        RepeatInterval::Daily => Repeat::Daily,
        RepeatInterval::Weekly => Repeat::Weekly,
        RepeatInterval::Monthly => Repeat::Monthly,
        RepeatInterval::Unspecified => Repeat::Unspecified,
    }
}

fn repeat_from_core(repeat: Repeat) -> RepeatInterval {
    match repeat {
        Repeat::Daily => RepeatInterval::Daily,
        Repeat::Weekly => RepeatInterval::Weekly,
        Repeat::Monthly => RepeatInterval::Monthly,
        Repeat::Unspecified => RepeatInterval::Unspecified,
    }
}

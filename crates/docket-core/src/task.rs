use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::datetime::{due_serde, stamp, stamp_serde};

/// Key the first renderer wrote when "completing" a task.
const LEGACY_STATUS_KEY: &str = "status";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubtaskId(String);

impl SubtaskId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    fn legacy(parent: &TaskId, position: usize) -> Self {
        Self(format!("{parent}-sub-{position}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SubtaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SubtaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SubtaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" | "l" => Some(Self::Low),
            "medium" | "med" | "m" => Some(Self::Medium),
            "high" | "h" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Status {
    #[default]
    #[serde(rename = "todo")]
    Todo,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

impl Status {
    /// Accepts every spelling earlier revisions stored.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "todo" | "to do" | "pending" => Some(Self::Todo),
            "in-progress" | "in progress" | "inprogress" => Some(Self::InProgress),
            "completed" | "complete" | "done" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

/// Repeat interval. `Unspecified` is the bare `repeat: true` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Daily,
    Weekly,
    Monthly,
    Unspecified,
}

impl Repeat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "true" | "yes" | "repeat" => Some(Self::Unspecified),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Unspecified => "repeat",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: SubtaskId,
    pub title: String,
}

impl Subtask {
    pub fn new(title: String) -> Self {
        Self {
            id: SubtaskId::generate(),
            title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,

    pub title: String,

    #[serde(
        rename = "taskPriority",
        default,
        deserialize_with = "priority_serde::deserialize"
    )]
    pub priority: Option<Priority>,

    #[serde(
        rename = "taskStatus",
        default,
        deserialize_with = "status_serde::deserialize"
    )]
    pub status: Status,

    #[serde(rename = "dueDate", default, with = "due_serde")]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(default, with = "repeat_serde")]
    pub repeat: Option<Repeat>,

    #[serde(default, deserialize_with = "subtasks_serde::deserialize")]
    pub subtasks: Vec<Subtask>,

    #[serde(rename = "createdDate", default = "stamp_serde::epoch", with = "stamp_serde")]
    pub created: DateTime<Utc>,

    #[serde(rename = "updatedDate", default = "stamp_serde::epoch", with = "stamp_serde")]
    pub updated: DateTime<Utc>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Task {
    pub fn new(title: String, now: DateTime<Utc>) -> Self {
        let now = stamp(now);
        Self {
            id: TaskId::generate(),
            title,
            priority: None,
            status: Status::Todo,
            due_date: None,
            repeat: None,
            subtasks: vec![],
            created: now,
            updated: now,
            extra: BTreeMap::new(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    pub fn subtask(&self, id: &SubtaskId) -> Option<&Subtask> {
        self.subtasks.iter().find(|sub| &sub.id == id)
    }

    /// Brings a record loaded from disk into canonical shape. Returns true
    /// when anything changed.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;

        let before = self.subtasks.len();
        self.subtasks.retain(|sub| !sub.title.trim().is_empty());
        changed |= self.subtasks.len() != before;

        for (position, sub) in self.subtasks.iter_mut().enumerate() {
            if sub.id.as_str().is_empty() {
                sub.id = SubtaskId::legacy(&self.id, position);
                changed = true;
            }
        }

        if let Some(legacy) = self.extra.remove(LEGACY_STATUS_KEY) {
            changed = true;
            let completed = legacy
                .as_str()
                .and_then(Status::parse)
                .is_some_and(|status| status == Status::Completed);
            if completed {
                self.status = Status::Completed;
            }
        }

        changed
    }
}

/// Field-level merge applied by `update`. `None` leaves a field untouched;
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub priority: Option<Option<Priority>>,
    pub status: Option<Status>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub repeat: Option<Option<Repeat>>,
}

impl TaskPatch {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn touches_schedule(&self) -> bool {
        self.status.is_some() || self.due_date.is_some()
    }

    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title.trim().to_string();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(repeat) = self.repeat {
            task.repeat = repeat;
        }
    }
}

/// Input for `create`.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub priority: Option<Priority>,
    pub status: Status,
    pub due_date: Option<DateTime<Utc>>,
    pub repeat: Option<Repeat>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn into_task(self, now: DateTime<Utc>) -> Task {
        let mut task = Task::new(self.title.trim().to_string(), now);
        task.priority = self.priority;
        task.status = self.status;
        task.due_date = self.due_date;
        task.repeat = self.repeat;
        task
    }
}

mod priority_serde {
    use serde::{Deserialize, Deserializer};

    use super::Priority;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Priority>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(Priority::parse))
    }
}

mod status_serde {
    use serde::{Deserialize, Deserializer};

    use super::Status;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Status, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(Status::parse).unwrap_or_default())
    }
}

mod repeat_serde {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRepeat {
        Flag(bool),
        Label(String),
    }

    pub fn serialize<S>(repeat: &Option<Repeat>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match repeat {
            Some(Repeat::Unspecified) => serializer.serialize_bool(true),
            Some(other) => serializer.serialize_str(other.as_str()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Repeat>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawRepeat>::deserialize(deserializer)?;
        Ok(match raw {
            Some(RawRepeat::Flag(true)) => Some(Repeat::Unspecified),
            Some(RawRepeat::Label(label)) => Repeat::parse(&label),
            Some(RawRepeat::Flag(false)) | None => None,
        })
    }
}

mod subtasks_serde {
    use super::*;

    /// Subtasks were stored either as bare titles or as records.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSubtask {
        Title(String),
        Record {
            #[serde(default)]
            id: Option<String>,
            #[serde(default)]
            title: String,
        },
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Subtask>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Vec<RawSubtask>>::deserialize(deserializer)?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .map(|entry| match entry {
                RawSubtask::Title(title) => Subtask {
                    id: SubtaskId::from(String::new()),
                    title,
                },
                RawSubtask::Record { id, title } => Subtask {
                    id: SubtaskId::from(id.unwrap_or_default()),
                    title,
                },
            })
            .collect())
    }
}

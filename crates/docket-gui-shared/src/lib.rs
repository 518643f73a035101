pub mod view;

use serde::{
  Deserialize,
  Deserializer,
  Serialize
};

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
  #[default]
  Todo,
  InProgress,
  Completed
}

impl TaskStatus {
  pub const ALL: [Self; 3] = [
    Self::Todo,
    Self::InProgress,
    Self::Completed
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Todo => "todo",
      | Self::InProgress => "in-progress",
      | Self::Completed => "completed"
    }
  }

  pub fn parse(raw: &str) -> Option<Self> {
    Self::ALL
      .into_iter()
      .find(|status| status.as_str() == raw)
  }

  /// Status after the row's
  /// complete/incomplete toggle.
  pub fn toggled(self) -> Self {
    match self {
      | Self::Completed => Self::Todo,
      | _ => Self::Completed
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
  Low,
  Medium,
  High
}

impl TaskPriority {
  pub const ALL: [Self; 3] =
    [Self::Low, Self::Medium, Self::High];

  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Low => "low",
      | Self::Medium => "medium",
      | Self::High => "high"
    }
  }

  pub fn parse(raw: &str) -> Option<Self> {
    Self::ALL
      .into_iter()
      .find(|priority| priority.as_str() == raw)
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "lowercase")]
pub enum RepeatInterval {
  Daily,
  Weekly,
  Monthly,
  Unspecified
}

impl RepeatInterval {
  pub const ALL: [Self; 4] = [
    Self::Daily,
    Self::Weekly,
    Self::Monthly,
    Self::Unspecified
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Daily => "daily",
      | Self::Weekly => "weekly",
      | Self::Monthly => "monthly",
      | Self::Unspecified => "unspecified"
    }
  }

  pub fn parse(raw: &str) -> Option<Self> {
    Self::ALL
      .into_iter()
      .find(|repeat| repeat.as_str() == raw)
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct SubtaskDto {
  pub id:    String,
  pub title: String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct TaskDto {
  pub id:          String,
  pub title:       String,
  pub priority:    Option<TaskPriority>,
  #[serde(default)]
  pub status:      TaskStatus,
  /// RFC 3339, UTC.
  pub due:         Option<String>,
  #[serde(default)]
  pub due_display: Option<String>,
  #[serde(default)]
  pub overdue:     bool,
  pub repeat:      Option<RepeatInterval>,
  #[serde(default)]
  pub subtasks:    Vec<SubtaskDto>,
  pub created:     String,
  pub updated:     String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  Default,
  PartialEq,
)]
pub struct TaskCreate {
  pub title:    String,
  pub priority: Option<TaskPriority>,
  pub status:   Option<TaskStatus>,
  pub due:      Option<String>,
  pub repeat:   Option<RepeatInterval>
}

/// Field-level update. An absent field
/// is left alone; an explicit `null`
/// clears an optional field.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  Default,
  PartialEq,
)]
pub struct TaskPatch {
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub title:    Option<String>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub priority: Option<Option<TaskPriority>>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub status:   Option<TaskStatus>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub due:      Option<Option<String>>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub repeat:   Option<Option<RepeatInterval>>
}

impl TaskPatch {
  pub fn status(status: TaskStatus) -> Self {
    Self {
      status: Some(status),
      ..Self::default()
    }
  }
}

fn double_option<'de, T, D>(
  deserializer: D
) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>
{
  Option::<T>::deserialize(deserializer)
    .map(Some)
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TaskIdArg {
  pub id: String
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TaskUpdateArgs {
  pub id:    String,
  pub patch: TaskPatch
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct SubtaskAddArgs {
  pub task_id: String,
  pub title:   String
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct SubtaskRemoveArgs {
  pub task_id:    String,
  pub subtask_id: String
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct SaveTasksArgs {
  pub tasks: Vec<TaskDto>
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct ReminderArgs {
  pub task_id: String,
  /// Falls back to the stored due date
  /// when absent.
  #[serde(default)]
  pub due:     Option<String>
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct NotifyArgs {
  pub title: String,
  pub body:  String
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct DateArgs {
  pub value: String
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct UiLogArg {
  pub event:  String,
  pub detail: String
}

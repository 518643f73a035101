//! List filtering and display labels.
//! Pure functions over [`TaskDto`] so
//! they run the same in the browser and
//! in native tests.

use crate::{
  RepeatInterval,
  TaskDto,
  TaskPriority,
  TaskStatus
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
  #[default]
  All,
  Only(TaskStatus)
}

impl StatusFilter {
  /// Parses a `<select>` value; unknown
  /// values mean no filtering.
  pub fn from_value(raw: &str) -> Self {
    TaskStatus::parse(raw)
      .map(Self::Only)
      .unwrap_or(Self::All)
  }

  pub fn value(self) -> &'static str {
    match self {
      | Self::All => "all",
      | Self::Only(status) => status.as_str()
    }
  }

  fn matches(
    self,
    status: TaskStatus
  ) -> bool {
    match self {
      | Self::All => true,
      | Self::Only(wanted) => wanted == status
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
  #[default]
  All,
  Unset,
  Only(TaskPriority)
}

impl PriorityFilter {
  pub fn from_value(raw: &str) -> Self {
    match raw {
      | "none" => Self::Unset,
      | other => TaskPriority::parse(other)
        .map(Self::Only)
        .unwrap_or(Self::All)
    }
  }

  pub fn value(self) -> &'static str {
    match self {
      | Self::All => "all",
      | Self::Unset => "none",
      | Self::Only(priority) => {
        priority.as_str()
      }
    }
  }

  fn matches(
    self,
    priority: Option<TaskPriority>
  ) -> bool {
    match self {
      | Self::All => true,
      | Self::Unset => priority.is_none(),
      | Self::Only(wanted) => {
        priority == Some(wanted)
      }
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
  pub status:   StatusFilter,
  pub priority: PriorityFilter,
  pub query:    String
}

impl TaskFilter {
  /// Visible subset in input order. A
  /// task that matches the query only
  /// through subtasks comes back with
  /// just those subtasks.
  pub fn apply(
    &self,
    tasks: &[TaskDto]
  ) -> Vec<TaskDto> {
    let query =
      self.query.trim().to_lowercase();

    tasks
      .iter()
      .filter(|task| {
        self.status.matches(task.status)
          && self
            .priority
            .matches(task.priority)
      })
      .filter_map(|task| {
        if query.is_empty()
          || task
            .title
            .to_lowercase()
            .contains(&query)
        {
          return Some(task.clone());
        }

        let subtasks: Vec<_> = task
          .subtasks
          .iter()
          .filter(|sub| {
            sub
              .title
              .to_lowercase()
              .contains(&query)
          })
          .cloned()
          .collect();
        if subtasks.is_empty() {
          return None;
        }

        let mut narrowed = task.clone();
        narrowed.subtasks = subtasks;
        Some(narrowed)
      })
      .collect()
  }

  pub fn is_active(&self) -> bool {
    self.status != StatusFilter::All
      || self.priority
        != PriorityFilter::All
      || !self.query.trim().is_empty()
  }
}

pub fn priority_label(
  priority: Option<TaskPriority>
) -> &'static str {
  priority
    .map(TaskPriority::as_str)
    .unwrap_or("N/A")
}

pub fn status_label(
  status: TaskStatus
) -> &'static str {
  match status {
    | TaskStatus::Todo => "To Do",
    | TaskStatus::InProgress => {
      "In Progress"
    }
    | TaskStatus::Completed => "Completed"
  }
}

pub fn repeat_label(
  repeat: Option<RepeatInterval>
) -> Option<String> {
  repeat.map(|repeat| match repeat {
    | RepeatInterval::Unspecified => {
      "(Repeats)".to_string()
    }
    | other => {
      format!("(Repeats {})", other.as_str())
    }
  })
}

pub fn toggle_label(
  status: TaskStatus
) -> &'static str {
  match status {
    | TaskStatus::Completed => {
      "Mark Incomplete"
    }
    | _ => "Mark Complete"
  }
}

/// Toasts for open tasks whose due date
/// has already passed.
pub fn overdue_notices(
  tasks: &[TaskDto]
) -> Vec<String> {
  tasks
    .iter()
    .filter(|task| {
      task.overdue
        && task.status
          != TaskStatus::Completed
    })
    .map(|task| {
      format!(
        "Reminder skipped: '{}' is overdue.",
        task.title
      )
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::SubtaskDto;

  fn task(
    id: &str,
    title: &str,
    status: TaskStatus,
    priority: Option<TaskPriority>,
    subtasks: &[&str]
  ) -> TaskDto {
    TaskDto {
      id: id.to_string(),
      title: title.to_string(),
      priority,
      status,
      due: None,
      due_display: None,
      overdue: false,
      repeat: None,
      subtasks: subtasks
        .iter()
        .enumerate()
        .map(|(n, title)| SubtaskDto {
          id: format!("{id}-sub-{n}"),
          title: title.to_string()
        })
        .collect(),
      created: "2026-10-18T08:00:00.000Z".to_string(),
      updated: "2026-10-18T08:00:00.000Z".to_string()
    }
  }

  fn sample() -> Vec<TaskDto> {
    vec![
      task("a", "Pay bills", TaskStatus::Completed, Some(TaskPriority::High), &[]),
      task("b", "Groceries", TaskStatus::Todo, None, &["buy milk", "eggs"]),
      task("c", "Report", TaskStatus::InProgress, Some(TaskPriority::Low), &[]),
      task("d", "Call mum", TaskStatus::Completed, None, &[])
    ]
  }

  #[test]
  fn completed_status_filter_yields_exactly_completed_tasks() {
    let filter = TaskFilter {
      status: StatusFilter::from_value("completed"),
      priority: PriorityFilter::from_value("all"),
      query: String::new()
    };
    let ids: Vec<String> = filter
      .apply(&sample())
      .into_iter()
      .map(|task| task.id)
      .collect();
    assert_eq!(ids, vec!["a", "d"]);
  }

  #[test]
  fn default_filter_shows_everything_in_order() {
    let shown = TaskFilter::default().apply(&sample());
    assert_eq!(shown, sample());
    assert!(!TaskFilter::default().is_active());
  }

  #[test]
  fn unset_priority_filter_matches_missing_priority() {
    let filter = TaskFilter {
      priority: PriorityFilter::from_value("none"),
      ..TaskFilter::default()
    };
    let ids: Vec<String> =
      filter.apply(&sample()).into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec!["b", "d"]);
  }

  #[test]
  fn query_matches_title_case_insensitively() {
    let filter = TaskFilter {
      query: "  BILLS ".to_string(),
      ..TaskFilter::default()
    };
    let shown = filter.apply(&sample());
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, "Pay bills");
    assert!(filter.is_active());
  }

  #[test]
  fn subtask_only_match_narrows_subtasks() {
    let filter = TaskFilter {
      query: "milk".to_string(),
      ..TaskFilter::default()
    };
    let shown = filter.apply(&sample());
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].id, "b");
    assert_eq!(shown[0].subtasks.len(), 1);
    assert_eq!(shown[0].subtasks[0].title, "buy milk");
  }

  #[test]
  fn title_match_keeps_all_subtasks() {
    let filter = TaskFilter {
      query: "groc".to_string(),
      ..TaskFilter::default()
    };
    assert_eq!(filter.apply(&sample())[0].subtasks.len(), 2);
  }

  #[test]
  fn labels() {
    assert_eq!(priority_label(None), "N/A");
    assert_eq!(priority_label(Some(TaskPriority::Medium)), "medium");
    assert_eq!(status_label(TaskStatus::InProgress), "In Progress");
    assert_eq!(repeat_label(Some(RepeatInterval::Unspecified)).as_deref(), Some("(Repeats)"));
    assert_eq!(repeat_label(Some(RepeatInterval::Weekly)).as_deref(), Some("(Repeats weekly)"));
    assert_eq!(toggle_label(TaskStatus::Completed), "Mark Incomplete");
  }

  #[test]
  fn overdue_notices_skip_completed_tasks() {
    let mut open = task("x", "Dentist", TaskStatus::Todo, None, &[]);
    open.overdue = true;
    let mut done = task("y", "Taxes", TaskStatus::Completed, None, &[]);
    done.overdue = true;
    assert_eq!(
      overdue_notices(&[open, done]),
      vec!["Reminder skipped: 'Dentist' is overdue.".to_string()]
    );
  }
}

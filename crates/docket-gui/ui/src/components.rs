mod dialogs;
mod filter_bar;
mod subtask_list;
mod task_card;
mod task_form;
mod task_list;
mod toasts;

pub use dialogs::{
  ConfirmDialog,
  PromptDialog
};
pub use filter_bar::FilterBar;
pub use subtask_list::SubtaskList;
pub use task_card::{
  RowIntent,
  TaskCard
};
pub use task_form::TaskForm;
pub use task_list::TaskList;
pub use toasts::ToastStack;

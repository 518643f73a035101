use std::collections::BTreeSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::task::Task;

/// Whole-file snapshot store: every write replaces the full collection.
#[derive(Debug)]
pub struct DataStore {
    pub path: PathBuf,
}

impl DataStore {
    #[tracing::instrument(skip(path))]
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let path = path.to_path_buf();
        let dir = parent_dir(&path);
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

        info!(
            file = %path.display(),
            exists = path.exists(),
            "opened task store"
        );

        Ok(Self { path })
    }

    /// Full snapshot in file order; empty when nothing was saved yet.
    #[tracing::instrument(skip(self))]
    pub fn load(&self) -> anyhow::Result<Vec<Task>> {
        let Some(raw) = self.read_raw()? else {
            return Ok(vec![]);
        };
        let mut tasks = decode_tasks(raw, &self.path)?;
        for task in &mut tasks {
            task.normalize();
        }
        warn_on_duplicate_ids(&tasks);
        debug!(count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    #[tracing::instrument(skip(self, tasks), fields(count = tasks.len()))]
    pub fn save(&self, tasks: &[Task]) -> anyhow::Result<()> {
        save_json_atomic(&self.path, tasks)
            .with_context(|| format!("failed to save {}", self.path.display()))
    }

    /// Rewrites the file once in canonical form when it holds records from
    /// earlier revisions. Returns whether a rewrite happened.
    #[tracing::instrument(skip(self))]
    pub fn migrate(&self) -> anyhow::Result<bool> {
        let Some(raw) = self.read_raw()? else {
            return Ok(false);
        };
        let mut tasks = decode_tasks(raw.clone(), &self.path)?;
        for task in &mut tasks {
            task.normalize();
        }

        let canonical = serde_json::to_value(&tasks).context("failed to encode tasks")?;
        if canonical == raw {
            debug!("task file already canonical");
            return Ok(false);
        }

        self.save(&tasks)?;
        info!(
            file = %self.path.display(),
            count = tasks.len(),
            "migrated task file to canonical form"
        );
        Ok(true)
    }

    fn read_raw(&self) -> anyhow::Result<Option<serde_json::Value>> {
        if !self.path.exists() {
            debug!(file = %self.path.display(), "task file missing; starting empty");
            return Ok(None);
        }

        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("failed reading {}", self.path.display()))?;
        if text.trim().is_empty() {
            return Ok(None);
        }

        let value = serde_json::from_str(&text)
            .with_context(|| format!("failed parsing {}", self.path.display()))?;
        Ok(Some(value))
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

fn decode_tasks(raw: serde_json::Value, path: &Path) -> anyhow::Result<Vec<Task>> {
    if !raw.is_array() {
        return Err(anyhow!(
            "{} does not hold a task array",
            path.display()
        ));
    }
    serde_json::from_value(raw).with_context(|| format!("failed decoding {}", path.display()))
}

fn warn_on_duplicate_ids(tasks: &[Task]) {
    let mut seen = BTreeSet::new();
    for task in tasks {
        if !seen.insert(&task.id) {
            warn!(id = %task.id, "duplicate task id in store");
        }
    }
}

#[tracing::instrument(skip(path, tasks))]
fn save_json_atomic(path: &Path, tasks: &[Task]) -> anyhow::Result<()> {
    debug!(file = %path.display(), count = tasks.len(), "saving task file");

    let temp = NamedTempFile::new_in(parent_dir(path))?;
    let mut writer = BufWriter::new(temp);
    serde_json::to_writer_pretty(&mut writer, tasks)?;
    writer.write_all(b"\n")?;
    let temp = writer
        .into_inner()
        .map_err(|err| anyhow!("failed to flush {}: {}", path.display(), err.error()))?;

    temp.persist(path)
        .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::tempdir;

    use super::DataStore;
    use crate::task::{NewTask, Status};

    #[test]
    fn missing_and_blank_files_load_empty() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("tasks.json");
        let store = DataStore::open(&path).expect("open store");
        assert!(store.load().expect("load missing").is_empty());

        std::fs::write(&path, "  \n").expect("write blank");
        assert!(store.load().expect("load blank").is_empty());
    }

    #[test]
    fn non_array_file_is_an_error() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("tasks.json");
        std::fs::write(&path, r#"{"id": "x"}"#).expect("write object");
        let store = DataStore::open(&path).expect("open store");
        assert!(store.load().is_err());
    }

    #[test]
    fn migrate_rewrites_legacy_file_once() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("tasks.json");
        std::fs::write(
            &path,
            r#"[{"id":"a1","title":"Shop","taskPriority":"high","taskStatus":"todo",
                "dueDate":"","repeat":false,"subtasks":["milk"],
                "createdDate":"2024-05-01T10:00:00.000Z","updatedDate":"2024-05-01T10:00:00.000Z"}]"#,
        )
        .expect("write legacy");

        let store = DataStore::open(&path).expect("open store");
        assert!(store.migrate().expect("first migrate"));
        assert!(!store.migrate().expect("second migrate"));

        let tasks = store.load().expect("load");
        assert_eq!(tasks[0].subtasks[0].id.as_str(), "a1-sub-0");
        assert_eq!(tasks[0].subtasks[0].title, "milk");
    }

    #[test]
    fn save_then_load_keeps_order_and_fields() {
        let temp = tempdir().expect("tempdir");
        let store = DataStore::open(&temp.path().join("tasks.json")).expect("open store");
        let now = Utc::now();

        let first = NewTask::titled("first").into_task(now);
        let mut second = NewTask::titled("second").into_task(now);
        second.status = Status::Completed;

        store.save(&[first.clone(), second.clone()]).expect("save");
        let loaded = store.load().expect("load");
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, first.id);
        assert_eq!(loaded[1].status, Status::Completed);
    }
}

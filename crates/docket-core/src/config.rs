use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::Context;
use serde::Deserialize;
use tracing::{
  debug,
  info,
  warn
};

use crate::datetime::{
  TIMEZONE_ENV_VAR,
  Zone
};
use crate::reminder::DEFAULT_REMINDER_TITLE;

pub const CONFIG_ENV_VAR: &str =
  "DOCKET_CONFIG";
pub const DATA_ENV_VAR: &str =
  "DOCKET_DATA";
pub const CONFIG_FILE_NAME: &str =
  "docket.toml";
pub const DEFAULT_TASKS_FILE: &str =
  "tasks.json";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub storage:     StorageConfig,
  pub time:        TimeConfig,
  pub reminders:   ReminderConfig,
  #[serde(skip)]
  pub loaded_from: Option<PathBuf>
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
  pub data_dir:  Option<PathBuf>,
  pub file_name: String
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self {
      data_dir:  None,
      file_name: DEFAULT_TASKS_FILE
        .to_string()
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
  /// IANA id or `local`.
  pub timezone: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
  pub enabled:          bool,
  pub rearm_on_startup: bool,
  pub title:            String
}

impl Default for ReminderConfig {
  fn default() -> Self {
    Self {
      enabled:          true,
      rearm_on_startup: true,
      title:            DEFAULT_REMINDER_TITLE
        .to_string()
    }
  }
}

impl Config {
  /// Loads the first config file found
  /// on the lookup path, then applies
  /// environment overrides. A missing
  /// file means defaults.
  #[tracing::instrument]
  pub fn load() -> anyhow::Result<Self> {
    let found = candidate_config_paths()
      .into_iter()
      .find(|path| path.is_file());

    let mut cfg = match found {
      | Some(path) => {
        info!(config = %path.display(), "loading config");
        Self::from_path(&path)?
      }
      | None => {
        debug!("no config file found; using defaults");
        Self::default()
      }
    };

    cfg.apply_overrides(
      std::env::var(DATA_ENV_VAR).ok(),
      std::env::var(TIMEZONE_ENV_VAR).ok()
    );
    Ok(cfg)
  }

  pub fn from_path(
    path: &Path
  ) -> anyhow::Result<Self> {
    let raw = fs::read_to_string(path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    let mut cfg = Self::parse(&raw)
      .with_context(|| {
        format!(
          "failed to parse TOML {}",
          path.display()
        )
      })?;
    cfg.loaded_from =
      Some(path.to_path_buf());
    Ok(cfg)
  }

  pub fn parse(
    raw: &str
  ) -> anyhow::Result<Self> {
    toml::from_str::<Self>(raw)
      .map_err(anyhow::Error::new)
  }

  /// Blank values are ignored.
  pub fn apply_overrides(
    &mut self,
    data_dir: Option<String>,
    timezone: Option<String>
  ) {
    if let Some(dir) = data_dir
      .as_deref()
      .map(str::trim)
      .filter(|dir| !dir.is_empty())
    {
      debug!(data_dir = dir, "data dir overridden from environment");
      self.storage.data_dir =
        Some(PathBuf::from(dir));
    }
    if let Some(tz) = timezone
      .as_deref()
      .map(str::trim)
      .filter(|tz| !tz.is_empty())
    {
      debug!(timezone = tz, "timezone overridden from environment");
      self.time.timezone =
        Some(tz.to_string());
    }
  }

  pub fn data_dir(&self) -> PathBuf {
    match self.storage.data_dir.as_deref()
    {
      | Some(dir) => expand_tilde(dir),
      | None => default_data_dir()
    }
  }

  pub fn tasks_path(&self) -> PathBuf {
    let name =
      self.storage.file_name.trim();
    let name = if name.is_empty() {
      DEFAULT_TASKS_FILE
    } else {
      name
    };
    self.data_dir().join(name)
  }

  pub fn log_dir(&self) -> PathBuf {
    self.data_dir().join("logs")
  }

  /// Configured zone; an unknown id
  /// falls back to the system zone.
  pub fn zone(&self) -> Zone {
    match self.time.timezone.as_deref() {
      | None => Zone::Local,
      | Some(raw) => {
        Zone::parse(raw).unwrap_or_else(|| {
          warn!(timezone = raw, "unknown timezone; using local");
          Zone::Local
        })
      }
    }
  }
}

fn candidate_config_paths() -> Vec<PathBuf>
{
  let mut candidates =
    Vec::<PathBuf>::new();

  if let Ok(path) =
    std::env::var(CONFIG_ENV_VAR)
  {
    let trimmed = path.trim();
    if !trimmed.is_empty() {
      candidates.push(expand_tilde(
        Path::new(trimmed)
      ));
    }
  }

  if let Ok(cwd) = std::env::current_dir()
  {
    let mut cursor = Some(cwd.as_path());
    while let Some(path) = cursor {
      candidates
        .push(path.join(CONFIG_FILE_NAME));
      cursor = path.parent();
    }
  }

  if let Some(config_dir) =
    dirs::config_dir()
  {
    candidates.push(
      config_dir
        .join("docket")
        .join(CONFIG_FILE_NAME)
    );
  }

  let mut unique = Vec::<PathBuf>::new();
  for candidate in candidates {
    if !unique.contains(&candidate) {
      unique.push(candidate);
    }
  }
  unique
}

fn default_data_dir() -> PathBuf {
  match dirs::data_dir() {
    | Some(dir) => dir.join("docket"),
    | None => {
      warn!("no platform data directory; using ./.docket_data");
      PathBuf::from(".docket_data")
    }
  }
}

fn expand_tilde(path: &Path) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use tempfile::tempdir;

  use super::{
    Config,
    DEFAULT_TASKS_FILE
  };
  use crate::datetime::Zone;

  #[test]
  fn empty_file_yields_defaults() {
    let cfg = Config::parse("").expect("parse empty");
    assert!(cfg.reminders.enabled);
    assert!(cfg.reminders.rearm_on_startup);
    assert_eq!(cfg.reminders.title, "Task Reminder");
    assert_eq!(cfg.storage.file_name, DEFAULT_TASKS_FILE);
    assert_eq!(cfg.zone(), Zone::Local);
  }

  #[test]
  fn sections_override_defaults() {
    let cfg = Config::parse(
      r#"
        [storage]
        data_dir = "/tmp/docket-test"
        file_name = "todo.json"

        [time]
        timezone = "Europe/Berlin"

        [reminders]
        enabled = false
        title = "Heads up"
      "#
    )
    .expect("parse config");

    assert_eq!(
      cfg.tasks_path(),
      PathBuf::from("/tmp/docket-test/todo.json")
    );
    assert_eq!(cfg.zone().to_string(), "Europe/Berlin");
    assert!(!cfg.reminders.enabled);
    assert!(cfg.reminders.rearm_on_startup);
    assert_eq!(cfg.reminders.title, "Heads up");
  }

  #[test]
  fn unknown_timezone_falls_back_to_local() {
    let cfg = Config::parse("[time]\ntimezone = \"Mars/Olympus\"\n")
      .expect("parse config");
    assert_eq!(cfg.zone(), Zone::Local);
  }

  #[test]
  fn overrides_win_and_blanks_are_ignored() {
    let mut cfg = Config::parse("[storage]\ndata_dir = \"/a\"\n")
      .expect("parse config");
    cfg.apply_overrides(Some("  ".to_string()), None);
    assert_eq!(cfg.data_dir(), PathBuf::from("/a"));

    cfg.apply_overrides(
      Some("/b".to_string()),
      Some("UTC".to_string())
    );
    assert_eq!(cfg.data_dir(), PathBuf::from("/b"));
    assert_eq!(cfg.log_dir(), PathBuf::from("/b/logs"));
    assert_eq!(cfg.zone().to_string(), "UTC");
  }

  #[test]
  fn from_path_records_source_and_rejects_bad_toml() {
    let temp = tempdir().expect("tempdir");
    let good = temp.path().join("docket.toml");
    std::fs::write(&good, "[reminders]\nenabled = true\n")
      .expect("write config");
    let cfg = Config::from_path(&good).expect("load config");
    assert_eq!(cfg.loaded_from.as_deref(), Some(good.as_path()));

    let bad = temp.path().join("bad.toml");
    std::fs::write(&bad, "[reminders\n").expect("write bad config");
    assert!(Config::from_path(&bad).is_err());
  }
}

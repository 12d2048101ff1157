//! Configuration management.
//!
//! taskr keeps one JSON config file, by default at `~/.taskr/config.json`:
//!
//! ```json
//! {
//!   "taskwarrior": { "command": "task", "data_location": null },
//!   "syncs": {
//!     "taskd":     { "exports_enabled": true, "exports_auto": false,
//!                    "imports_enabled": false, "imports_auto": false, "options": {} },
//!     "reminders": { "exports_enabled": true, "exports_auto": false,
//!                    "imports_enabled": true, "imports_auto": false,
//!                    "options": { "default_list": "Tasks" } }
//!   }
//! }
//! ```
//!
//! A missing file means defaults. Unknown sync target names resolve to
//! `None`/`false`, never to an error, so callers decide how to report them.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "TASKR_CONFIG";

/// Option key naming the Reminders list used when none is given.
pub const DEFAULT_LIST_OPTION: &str = "default_list";

/// Full taskr configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskrConfig {
    #[serde(default)]
    pub taskwarrior: TaskwarriorSettings,
    #[serde(default)]
    pub syncs: SyncConfig,
}

/// How to reach the `task` binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskwarriorSettings {
    #[serde(default = "default_task_command")]
    pub command: String,
    #[serde(default)]
    pub data_location: Option<PathBuf>,
}

fn default_task_command() -> String {
    "task".to_string()
}

impl Default for TaskwarriorSettings {
    fn default() -> Self {
        Self {
            command: default_task_command(),
            data_location: None,
        }
    }
}

/// Per-target enablement flags and free-form options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncTargetConfig {
    #[serde(default = "enabled")]
    pub exports_enabled: bool,
    #[serde(default)]
    pub exports_auto: bool,
    #[serde(default = "enabled")]
    pub imports_enabled: bool,
    #[serde(default)]
    pub imports_auto: bool,
    #[serde(default)]
    pub options: BTreeMap<String, serde_json::Value>,
}

fn enabled() -> bool {
    true
}

impl Default for SyncTargetConfig {
    fn default() -> Self {
        Self {
            exports_enabled: true,
            exports_auto: false,
            imports_enabled: true,
            imports_auto: false,
            options: BTreeMap::new(),
        }
    }
}

fn default_taskd() -> SyncTargetConfig {
    SyncTargetConfig {
        imports_enabled: false,
        ..SyncTargetConfig::default()
    }
}

/// Configuration for every known sync target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_taskd")]
    pub taskd: SyncTargetConfig,
    #[serde(default)]
    pub reminders: SyncTargetConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            taskd: default_taskd(),
            reminders: SyncTargetConfig::default(),
        }
    }
}

/// Partial update of a target's settings; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetUpdate {
    pub exports_enabled: Option<bool>,
    pub exports_auto: Option<bool>,
    pub imports_enabled: Option<bool>,
    pub imports_auto: Option<bool>,
    pub options: BTreeMap<String, serde_json::Value>,
}

impl SyncConfig {
    /// Settings for a target by (canonical) name.
    #[must_use]
    pub fn target(&self, name: &str) -> Option<&SyncTargetConfig> {
        match name {
            "taskd" => Some(&self.taskd),
            "reminders" => Some(&self.reminders),
            _ => None,
        }
    }

    fn target_mut(&mut self, name: &str) -> Option<&mut SyncTargetConfig> {
        match name {
            "taskd" => Some(&mut self.taskd),
            "reminders" => Some(&mut self.reminders),
            _ => None,
        }
    }

    /// Merge `update` into the named target. Returns `false` for unknown targets.
    pub fn update_target(&mut self, name: &str, update: &TargetUpdate) -> bool {
        let Some(target) = self.target_mut(name) else {
            return false;
        };
        if let Some(v) = update.exports_enabled {
            target.exports_enabled = v;
        }
        if let Some(v) = update.exports_auto {
            target.exports_auto = v;
        }
        if let Some(v) = update.imports_enabled {
            target.imports_enabled = v;
        }
        if let Some(v) = update.imports_auto {
            target.imports_auto = v;
        }
        for (key, value) in &update.options {
            target.options.insert(key.clone(), value.clone());
        }
        true
    }
}

/// Resolve the config file path.
///
/// Priority:
/// 1. `explicit_path` (the `--config` flag)
/// 2. `TASKR_CONFIG` environment variable
/// 3. `~/.taskr/config.json`
pub fn config_path(explicit_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    directories::BaseDirs::new()
        .map(|b| b.home_dir().join(".taskr").join("config.json"))
        .ok_or(Error::Config("Could not determine home directory".into()))
}

/// Load the configuration, falling back to defaults when the file is absent.
pub fn load_config(path: &Path) -> Result<TaskrConfig> {
    if !path.exists() {
        return Ok(TaskrConfig::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config file: {e}")))
}

/// Save the configuration, creating its directory if needed.
pub fn save_config(path: &Path, config: &TaskrConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|_| Error::ConfigNotWritable {
            path: path.to_path_buf(),
        })?;
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;

    fs::write(path, content).map_err(|_| Error::ConfigNotWritable {
        path: path.to_path_buf(),
    })?;

    Ok(())
}

/// Load, apply `update` to one target, and save.
///
/// Returns `Ok(false)` without touching the file when the target is unknown.
pub fn update_target_config(path: &Path, name: &str, update: &TargetUpdate) -> Result<bool> {
    let mut config = load_config(path)?;
    if !config.syncs.update_target(name, update) {
        return Ok(false);
    }
    save_config(path, &config)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_per_target() {
        let config = SyncConfig::default();
        assert!(config.taskd.exports_enabled);
        assert!(!config.taskd.imports_enabled);
        assert!(config.reminders.exports_enabled);
        assert!(config.reminders.imports_enabled);
        assert!(!config.reminders.imports_auto);
    }

    #[test]
    fn test_unknown_target_is_none() {
        let mut config = SyncConfig::default();
        assert!(config.target("dropbox").is_none());
        assert!(!config.update_target("dropbox", &TargetUpdate::default()));
    }

    #[test]
    fn test_update_target_merges_only_given_fields() {
        let mut config = SyncConfig::default();
        let mut update = TargetUpdate {
            imports_auto: Some(true),
            ..TargetUpdate::default()
        };
        update
            .options
            .insert(DEFAULT_LIST_OPTION.to_string(), serde_json::json!("Tasks"));

        assert!(config.update_target("reminders", &update));
        assert!(config.reminders.imports_auto);
        assert!(config.reminders.exports_enabled);
        assert_eq!(config.reminders.options[DEFAULT_LIST_OPTION], "Tasks");
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config(&temp_dir.path().join("nope.json")).unwrap();
        assert_eq!(config, TaskrConfig::default());
        assert_eq!(config.taskwarrior.command, "task");
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let update = TargetUpdate {
            exports_auto: Some(true),
            ..TargetUpdate::default()
        };
        assert!(update_target_config(&path, "taskd", &update).unwrap());

        let config = load_config(&path).unwrap();
        assert!(config.syncs.taskd.exports_auto);
        assert!(!config.syncs.taskd.imports_enabled);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"syncs": {"reminders": {"imports_auto": true}}}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert!(config.syncs.reminders.imports_auto);
        assert!(config.syncs.reminders.imports_enabled);
        assert!(!config.syncs.taskd.imports_enabled);
    }

    #[test]
    fn test_config_path_explicit_wins() {
        let explicit = PathBuf::from("/custom/taskr.json");
        assert_eq!(config_path(Some(&explicit)).unwrap(), explicit);
    }
}

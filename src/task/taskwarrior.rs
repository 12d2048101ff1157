//! Taskwarrior-backed task store.
//!
//! Queries go through `task <filter> export`; creates and modifies go
//! through `task import`, feeding one JSON task on stdin. Import keys on the
//! UUID, so a create picks its own UUID up front and a modify re-imports the
//! merged record. Only the process result contract (exit code, stdout,
//! stderr) is consumed.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use chrono::{NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

use super::{REMINDER_ID_KEY, TaskFields, TaskRecord, TaskStatus, TaskStore};
use crate::config::TaskwarriorSettings;
use crate::error::{Error, Result};

/// Taskwarrior's compact UTC timestamp format.
const TW_TIMESTAMP: &str = "%Y%m%dT%H%M%SZ";

/// Result of one `task` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Task store that shells out to the `task` binary.
#[derive(Debug, Clone)]
pub struct TaskwarriorStore {
    command: String,
    data_location: Option<PathBuf>,
}

impl TaskwarriorStore {
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            data_location: None,
        }
    }

    #[must_use]
    pub fn from_settings(settings: &TaskwarriorSettings) -> Self {
        Self {
            command: settings.command.clone(),
            data_location: settings.data_location.clone(),
        }
    }

    /// rc overrides prepended to every invocation.
    fn rc_args(&self) -> Vec<String> {
        let mut args = vec![
            "rc.confirmation=off".to_string(),
            format!("rc.uda.{REMINDER_ID_KEY}.type=string"),
            format!("rc.uda.{REMINDER_ID_KEY}.label=Reminder"),
        ];
        if let Some(location) = &self.data_location {
            args.push(format!("rc.data.location={}", location.display()));
        }
        args
    }

    /// Run `task` with the given arguments, optionally feeding stdin.
    ///
    /// # Errors
    ///
    /// Returns an error only if the process cannot be spawned or fed; a
    /// nonzero exit is reported through [`CommandOutput::code`].
    pub fn run(&self, args: &[String], input: Option<&str>) -> Result<CommandOutput> {
        let mut all_args = self.rc_args();
        all_args.extend(args.iter().cloned());
        debug!(command = %self.command, args = ?all_args, "running task command");

        let mut child = Command::new(&self.command)
            .args(&all_args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let (Some(data), Some(mut stdin)) = (input, child.stdin.take()) {
            stdin.write_all(data.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        let result = CommandOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if result.code != 0 {
            debug!(code = result.code, stderr = %result.stderr.trim(), "task command failed");
        }
        Ok(result)
    }

    /// Export a single task by UUID, any status.
    fn fetch(&self, uuid: &str) -> Result<TaskRecord> {
        let output = self.run(&[uuid.to_string(), "export".to_string(), "rc.json.array=on".to_string()], None)?;
        if output.code != 0 {
            return Err(command_error(output));
        }
        parse_export(&output.stdout)?
            .into_iter()
            .find(|t| t.uuid == uuid)
            .ok_or_else(|| Error::TaskNotFound {
                uuid: uuid.to_string(),
            })
    }

    /// Import one task record, creating or replacing it by UUID.
    fn import(&self, task: &TaskRecord) -> Result<()> {
        let payload = serde_json::to_string(&import_payload(task))?;
        let output = self.run(&["import".to_string()], Some(&payload))?;
        if output.code != 0 {
            return Err(command_error(output));
        }
        Ok(())
    }
}

fn command_error(output: CommandOutput) -> Error {
    Error::TaskCommand {
        code: output.code,
        stderr: output.stderr.trim().to_string(),
    }
}

/// Arguments for a filtered export query.
#[must_use]
pub(crate) fn query_args(filter: &[String], include_all: bool) -> Vec<String> {
    let mut args = Vec::new();
    if !include_all {
        args.push("status:pending".to_string());
    }
    args.extend(filter.iter().cloned());
    args.push("export".to_string());
    args.push("rc.json.array=on".to_string());
    args
}

/// Parse `task export` output (a JSON array, or one object per line).
pub(crate) fn parse_export(stdout: &str) -> Result<Vec<TaskRecord>> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }
    trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line.trim_end_matches(',')).map_err(Error::from))
        .collect()
}

/// Normalize a due value into Taskwarrior's timestamp form.
///
/// `YYYY-MM-DD` becomes midnight UTC; anything else passes through.
#[must_use]
pub(crate) fn to_taskwarrior_date(value: &str) -> String {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map_or_else(|| value.to_string(), |dt| dt.format(TW_TIMESTAMP).to_string())
}

/// JSON accepted by `task import` for this record.
fn import_payload(task: &TaskRecord) -> serde_json::Value {
    let mut record = task.clone();
    record.id = None;
    record.due = record.due.as_deref().map(to_taskwarrior_date);

    let now = Utc::now().format(TW_TIMESTAMP).to_string();
    record
        .attributes
        .entry("entry".to_string())
        .or_insert_with(|| serde_json::Value::String(now.clone()));
    if record.status == TaskStatus::Completed {
        record
            .attributes
            .entry("end".to_string())
            .or_insert_with(|| serde_json::Value::String(now.clone()));
    }
    record.attributes.remove("urgency");
    record
        .attributes
        .insert("modified".to_string(), serde_json::Value::String(now.clone()));
    for annotation in &mut record.annotations {
        if annotation.entry.is_none() {
            annotation.entry = Some(now.clone());
        }
    }

    serde_json::to_value(&record).unwrap_or(serde_json::Value::Null)
}

impl TaskStore for TaskwarriorStore {
    fn query(&self, filter: &[String], include_all: bool) -> Result<Vec<TaskRecord>> {
        let output = self.run(&query_args(filter, include_all), None)?;

        if output.code != 0 {
            if output.stderr.contains("No matches") {
                return Ok(Vec::new());
            }
            return Err(command_error(output));
        }

        let tasks = parse_export(&output.stdout)
            .map_err(|e| Error::TaskOutput(e.to_string()))?;
        Ok(tasks
            .into_iter()
            .filter(|t| t.status != TaskStatus::Deleted)
            .collect())
    }

    fn create(&mut self, fields: &TaskFields) -> Result<TaskRecord> {
        let description = fields
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| Error::InvalidArgument("task description is required".to_string()))?;

        let mut task = TaskRecord {
            uuid: Uuid::new_v4().to_string(),
            description: description.to_string(),
            ..TaskRecord::default()
        };
        task.apply(fields);
        self.import(&task)?;
        self.fetch(&task.uuid)
    }

    fn modify(&mut self, uuid: &str, fields: &TaskFields) -> Result<TaskRecord> {
        let mut task = self.fetch(uuid)?;
        task.apply(fields);
        self.import(&task)?;
        self.fetch(uuid)
    }
}

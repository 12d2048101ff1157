//! In-process task store.
//!
//! Keeps tasks in a `Vec` with the same contract as the Taskwarrior store:
//! pending-only queries by default, UUIDs assigned on create, additive
//! tags and annotations on modify. Filters support `key:value` equality on
//! `status`, `project`, `priority` and UDA keys, plus `+tag` / `-tag`.

use uuid::Uuid;

use super::{TaskFields, TaskRecord, TaskStatus, TaskStore};
use crate::error::{Error, Result};

/// Task store backed by memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryTaskStore {
    tasks: Vec<TaskRecord>,
}

impl MemoryTaskStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing tasks; missing UUIDs are assigned.
    #[must_use]
    pub fn with_tasks(tasks: Vec<TaskRecord>) -> Self {
        let mut store = Self::new();
        for mut task in tasks {
            if task.uuid.is_empty() {
                task.uuid = Uuid::new_v4().to_string();
            }
            store.tasks.push(task);
        }
        store.renumber();
        store
    }

    /// All tasks, every status.
    #[must_use]
    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    #[must_use]
    pub fn get(&self, uuid: &str) -> Option<&TaskRecord> {
        self.tasks.iter().find(|t| t.uuid == uuid)
    }

    /// Working-set numbering: pending tasks count from 1, the rest have none.
    fn renumber(&mut self) {
        let mut next = 1;
        for task in &mut self.tasks {
            if matches!(task.status, TaskStatus::Pending | TaskStatus::Waiting) {
                task.id = Some(next);
                next += 1;
            } else {
                task.id = None;
            }
        }
    }
}

fn matches_filter(task: &TaskRecord, term: &str) -> bool {
    if let Some(tag) = term.strip_prefix('+') {
        return task.has_tag(tag);
    }
    if let Some(tag) = term.strip_prefix('-') {
        return !task.has_tag(tag);
    }
    let Some((key, value)) = term.split_once(':') else {
        return task.description.contains(term);
    };
    match key {
        "status" => task.status.as_str() == value,
        "project" => task.project.as_deref() == Some(value),
        "priority" => task.priority.map(|p| p.code().to_string()).as_deref() == Some(value),
        "uuid" => task.uuid == value,
        other => task
            .attributes
            .get(other)
            .and_then(serde_json::Value::as_str)
            == Some(value),
    }
}

impl TaskStore for MemoryTaskStore {
    fn query(&self, filter: &[String], include_all: bool) -> Result<Vec<TaskRecord>> {
        Ok(self
            .tasks
            .iter()
            .filter(|t| {
                if include_all {
                    t.status != TaskStatus::Deleted
                } else {
                    t.status == TaskStatus::Pending
                }
            })
            .filter(|t| filter.iter().all(|term| matches_filter(t, term)))
            .cloned()
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
        let uuid = task.uuid.clone();
        self.tasks.push(task);
        self.renumber();

        self.get(&uuid)
            .cloned()
            .ok_or(Error::TaskNotFound { uuid })
    }

    fn modify(&mut self, uuid: &str, fields: &TaskFields) -> Result<TaskRecord> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.uuid == uuid)
            .ok_or_else(|| Error::TaskNotFound {
                uuid: uuid.to_string(),
            })?;
        task.apply(fields);
        self.renumber();

        self.get(uuid).cloned().ok_or_else(|| Error::TaskNotFound {
            uuid: uuid.to_string(),
        })
    }
}

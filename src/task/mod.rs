//! Task store collaborator.
//!
//! This module owns the task-tracking side of a sync:
//!
//! - [`TaskRecord`] - one task as Taskwarrior exports it
//! - [`TaskFields`] - the mutation payload for create/modify
//! - [`TaskStore`] - the query/create/modify contract the sync engine consumes
//! - [`TaskwarriorStore`] - the `task` binary behind that contract
//! - [`MemoryTaskStore`] - an in-process store with the same contract
//!
//! Tasks are addressed by UUID. Taskwarrior's numeric ids are display
//! positions that collapse to 0 once a task is completed, so they are
//! never used as keys.

mod memory;
mod taskwarrior;

pub use memory::MemoryTaskStore;
pub use taskwarrior::{CommandOutput, TaskwarriorStore};

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::validate::normalize_priority;

/// Attribute-bag key holding the Reminders id of a linked task.
pub const REMINDER_ID_KEY: &str = "reminder_id";

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
    Deleted,
    Waiting,
    Recurring,
}

impl TaskStatus {
    /// Status keyword as Taskwarrior spells it.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Deleted => "deleted",
            Self::Waiting => "waiting",
            Self::Recurring => "recurring",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Taskwarrior priority code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "H")]
    High,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "L")]
    Low,
}

impl Priority {
    /// One-letter code.
    #[must_use]
    pub const fn code(&self) -> &str {
        match self {
            Self::High => "H",
            Self::Medium => "M",
            Self::Low => "L",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match normalize_priority(s) {
            Ok(code) => match code.as_str() {
                "H" => Ok(Self::High),
                "M" => Ok(Self::Medium),
                _ => Ok(Self::Low),
            },
            Err((input, _)) => Err(crate::error::Error::InvalidPriority(input)),
        }
    }
}

/// Accept any priority string; values outside H/M/L read as no priority.
fn lenient_priority<'de, D>(deserializer: D) -> std::result::Result<Option<Priority>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value.parse::<Priority>() {
        Ok(priority) => Some(priority),
        Err(_) => {
            tracing::debug!(priority = %value, "ignoring unrecognized task priority");
            None
        }
    }))
}

/// A task annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    pub description: String,
}

/// One task, shaped like a Taskwarrior export entry.
///
/// Keys without a dedicated field (`entry`, `modified`, `urgency`, UDAs
/// such as [`REMINDER_ID_KEY`]) land in `attributes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(
        default,
        deserialize_with = "lenient_priority",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl TaskRecord {
    /// Reminders id stored on this task, if any.
    #[must_use]
    pub fn external_id(&self) -> Option<&str> {
        self.attributes
            .get(REMINDER_ID_KEY)
            .and_then(serde_json::Value::as_str)
            .filter(|id| !id.is_empty())
    }

    /// Attach a Reminders id to this in-memory record.
    pub fn set_external_id(&mut self, id: &str) {
        self.attributes.insert(
            REMINDER_ID_KEY.to_string(),
            serde_json::Value::String(id.to_string()),
        );
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Merge a mutation payload into this record.
    ///
    /// Scalars are replaced when supplied, tags and annotations are added
    /// (existing annotation texts are not duplicated), attributes are upserted.
    pub fn apply(&mut self, fields: &TaskFields) {
        if let Some(description) = &fields.description {
            self.description.clone_from(description);
        }
        if let Some(status) = fields.status {
            self.status = status;
        }
        if fields.priority.is_some() {
            self.priority = fields.priority;
        }
        if fields.project.is_some() {
            self.project.clone_from(&fields.project);
        }
        if fields.due.is_some() {
            self.due.clone_from(&fields.due);
        }
        for tag in &fields.tags {
            if !self.has_tag(tag) {
                self.tags.push(tag.clone());
            }
        }
        for text in &fields.annotations {
            if !self.annotations.iter().any(|a| &a.description == text) {
                self.annotations.push(Annotation {
                    entry: None,
                    description: text.clone(),
                });
            }
        }
        for (key, value) in &fields.attributes {
            self.attributes
                .insert(key.clone(), serde_json::Value::String(value.clone()));
        }
    }
}

/// Fields to set when creating or modifying a task.
///
/// `None` leaves a field untouched on modify; `tags` and `annotations` are
/// additive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFields {
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub project: Option<String>,
    pub tags: Vec<String>,
    pub due: Option<String>,
    pub annotations: Vec<String>,
    pub attributes: BTreeMap<String, String>,
}

impl TaskFields {
    /// Payload that only links a task to a Reminders id.
    #[must_use]
    pub fn link(external_id: &str) -> Self {
        let mut fields = Self::default();
        fields
            .attributes
            .insert(REMINDER_ID_KEY.to_string(), external_id.to_string());
        fields
    }
}

/// The task-tracking store consumed by the sync engine.
pub trait TaskStore {
    /// Tasks matching `filter`; pending only unless `include_all`.
    fn query(&self, filter: &[String], include_all: bool) -> Result<Vec<TaskRecord>>;

    /// Create a task and return it as stored.
    fn create(&mut self, fields: &TaskFields) -> Result<TaskRecord>;

    /// Modify the task with this UUID and return it as stored.
    fn modify(&mut self, uuid: &str, fields: &TaskFields) -> Result<TaskRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_taskwarrior_export_entry() {
        let json = r#"{
            "id": 3,
            "description": "Buy milk",
            "due": "20240422T000000Z",
            "entry": "20240401T101010Z",
            "priority": "H",
            "project": "errands",
            "status": "pending",
            "tags": ["errands", "critical"],
            "uuid": "8a2f0c1e-0000-4000-8000-000000000001",
            "annotations": [{"entry": "20240401T101500Z", "description": "whole milk"}],
            "reminder_id": "x-apple-reminder://ABC",
            "urgency": 9.1
        }"#;

        let task: TaskRecord = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, Some(3));
        assert_eq!(task.priority, Some(Priority::High));
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.external_id(), Some("x-apple-reminder://ABC"));
        assert!(task.has_tag("critical"));
        assert_eq!(task.annotations[0].description, "whole milk");
        assert!(task.attributes.contains_key("urgency"));
    }

    #[test]
    fn test_unknown_priority_reads_as_none() {
        let task: TaskRecord =
            serde_json::from_str(r#"{"uuid": "u1", "description": "x", "priority": "Z"}"#).unwrap();
        assert_eq!(task.priority, None);
    }

    #[test]
    fn test_empty_external_id_is_absent() {
        let task: TaskRecord =
            serde_json::from_str(r#"{"uuid": "u1", "description": "x", "reminder_id": ""}"#)
                .unwrap();
        assert_eq!(task.external_id(), None);
    }

    #[test]
    fn test_apply_adds_tags_and_annotations_once() {
        let mut task = TaskRecord {
            uuid: "u1".to_string(),
            description: "Old".to_string(),
            tags: vec!["home".to_string()],
            annotations: vec![Annotation {
                entry: None,
                description: "note".to_string(),
            }],
            ..TaskRecord::default()
        };

        let fields = TaskFields {
            description: Some("New".to_string()),
            tags: vec!["home".to_string(), "critical".to_string()],
            annotations: vec!["note".to_string(), "second".to_string()],
            ..TaskFields::link("x-apple-reminder://1")
        };
        task.apply(&fields);

        assert_eq!(task.description, "New");
        assert_eq!(task.tags, vec!["home", "critical"]);
        assert_eq!(task.annotations.len(), 2);
        assert_eq!(task.external_id(), Some("x-apple-reminder://1"));
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("h".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("medium".parse::<Priority>().unwrap(), Priority::Medium);
        assert!("soon".parse::<Priority>().is_err());
    }
}

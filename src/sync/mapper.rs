//! Conversion between reminders and tasks.
//!
//! Both directions drop information on purpose: remind-me dates, tags other
//! than `critical`, and annotations after the first are not carried across.

use chrono::{NaiveDate, NaiveTime};
use tracing::{error, warn};

use crate::reminders::{DEFAULT_CONTAINER, ReminderRecord};
use crate::task::{Priority, REMINDER_ID_KEY, TaskFields, TaskRecord, TaskStatus};

/// Tag that mirrors the Reminders `flagged` property.
pub const CRITICAL_TAG: &str = "critical";

/// Reminders priority for a task priority: H=9, M=5, L=1, none=0.
#[must_use]
pub const fn priority_to_reminder(priority: Option<Priority>) -> u8 {
    match priority {
        Some(Priority::High) => 9,
        Some(Priority::Medium) => 5,
        Some(Priority::Low) => 1,
        None => 0,
    }
}

/// Task priority for a Reminders priority: 7+ H, 4+ M, 1+ L, 0 none.
#[must_use]
pub const fn priority_from_reminder(priority: u8) -> Option<Priority> {
    match priority {
        7..=u8::MAX => Some(Priority::High),
        4..=6 => Some(Priority::Medium),
        1..=3 => Some(Priority::Low),
        0 => None,
    }
}

/// Parse a task due value into a calendar date.
///
/// Accepts, in order: `YYYYMMDD`, `YYYYMMDDTHHMMSSZ` (date part) and a
/// `YYYY-MM-DD` prefix. Anything else is logged and yields `None`.
#[must_use]
pub fn parse_due(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    let parsed = if value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit()) {
        NaiveDate::parse_from_str(value, "%Y%m%d")
    } else if value.len() >= 10 && value.contains('T') {
        let date_part = value.split('T').next().unwrap_or_default();
        if date_part.len() != 8 {
            error!(due = value, "unrecognized due date format");
            return None;
        }
        NaiveDate::parse_from_str(date_part, "%Y%m%d")
    } else if value.len() >= 10 && value.is_char_boundary(10) {
        NaiveDate::parse_from_str(&value[..10], "%Y-%m-%d")
    } else {
        error!(due = value, "unrecognized due date format");
        return None;
    };

    parsed
        .inspect_err(|e| error!(due = value, error = %e, "could not parse due date"))
        .ok()
}

/// Reminder for a task (export direction).
///
/// The container is the task's project; the reminder id comes from the
/// task's stored link, if any.
#[must_use]
pub fn to_reminder(task: &TaskRecord) -> ReminderRecord {
    ReminderRecord {
        name: task.description.clone(),
        body: task.annotations.first().map(|a| a.description.clone()),
        container: task.project.clone(),
        due: task
            .due
            .as_deref()
            .and_then(parse_due)
            .map(|date| date.and_time(NaiveTime::MIN)),
        priority: priority_to_reminder(task.priority),
        completed: task.status == TaskStatus::Completed,
        id: task.external_id().map(str::to_string),
        flagged: task.has_tag(CRITICAL_TAG),
        ..ReminderRecord::default()
    }
}

/// Task fields for a reminder (import direction).
///
/// The list becomes project and tag unless it is the default list. The body
/// becomes a single annotation. A reminder with an empty title leaves the
/// description unset.
#[must_use]
pub fn to_task_fields(record: &ReminderRecord) -> TaskFields {
    let project = record
        .container
        .as_deref()
        .filter(|c| !c.is_empty() && *c != DEFAULT_CONTAINER)
        .map(str::to_string);

    let mut tags = Vec::new();
    if let Some(project) = &project {
        tags.push(project.clone());
    }
    if record.flagged {
        tags.push(CRITICAL_TAG.to_string());
    }

    let mut fields = TaskFields {
        description: Some(record.name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string),
        status: Some(if record.completed {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        }),
        priority: priority_from_reminder(record.priority),
        project,
        tags,
        due: record.due.map(|dt| dt.date().format("%Y-%m-%d").to_string()),
        annotations: record.body.iter().cloned().collect(),
        ..TaskFields::default()
    };

    match &record.id {
        Some(id) => {
            fields
                .attributes
                .insert(REMINDER_ID_KEY.to_string(), id.clone());
        }
        None => warn!(name = %record.name, "reminder has no id, task will not be linked"),
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Annotation;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_priority_bucket_boundaries() {
        assert_eq!(priority_from_reminder(0), None);
        assert_eq!(priority_from_reminder(1), Some(Priority::Low));
        assert_eq!(priority_from_reminder(3), Some(Priority::Low));
        assert_eq!(priority_from_reminder(4), Some(Priority::Medium));
        assert_eq!(priority_from_reminder(6), Some(Priority::Medium));
        assert_eq!(priority_from_reminder(7), Some(Priority::High));
        assert_eq!(priority_from_reminder(9), Some(Priority::High));
    }

    #[test]
    fn test_priority_encode() {
        assert_eq!(priority_to_reminder(Some(Priority::High)), 9);
        assert_eq!(priority_to_reminder(Some(Priority::Medium)), 5);
        assert_eq!(priority_to_reminder(Some(Priority::Low)), 1);
        assert_eq!(priority_to_reminder(None), 0);
    }

    #[test]
    fn test_parse_due_formats() {
        assert_eq!(parse_due("20240422"), Some(date(2024, 4, 22)));
        assert_eq!(parse_due("20240422T150000Z"), Some(date(2024, 4, 22)));
        assert_eq!(parse_due("2024-04-22"), Some(date(2024, 4, 22)));
        assert_eq!(parse_due("2024-04-22 10:00"), Some(date(2024, 4, 22)));
    }

    #[test]
    fn test_parse_due_rejects_unknown_formats() {
        assert_eq!(parse_due("tomorrow"), None);
        assert_eq!(parse_due("2024042"), None);
        assert_eq!(parse_due("2024-4-2T1"), None);
        assert_eq!(parse_due("22/04/2024"), None);
    }

    #[test]
    fn test_to_reminder() {
        let mut task = TaskRecord {
            uuid: "u1".to_string(),
            description: "Buy milk".to_string(),
            priority: Some(Priority::High),
            project: Some("errands".to_string()),
            tags: vec!["errands".to_string(), CRITICAL_TAG.to_string()],
            due: Some("20240422T000000Z".to_string()),
            annotations: vec![
                Annotation {
                    entry: None,
                    description: "whole milk".to_string(),
                },
                Annotation {
                    entry: None,
                    description: "dropped".to_string(),
                },
            ],
            ..TaskRecord::default()
        };
        task.set_external_id("x-apple-reminder://1");

        let reminder = to_reminder(&task);

        assert_eq!(reminder.name, "Buy milk");
        assert_eq!(reminder.priority, 9);
        assert_eq!(reminder.body.as_deref(), Some("whole milk"));
        assert_eq!(reminder.container.as_deref(), Some("errands"));
        assert_eq!(reminder.due, date(2024, 4, 22).and_hms_opt(0, 0, 0));
        assert!(reminder.flagged);
        assert_eq!(reminder.id.as_deref(), Some("x-apple-reminder://1"));
    }

    #[test]
    fn test_to_reminder_with_bad_due_keeps_going() {
        let task = TaskRecord {
            uuid: "u1".to_string(),
            description: "Someday".to_string(),
            due: Some("someday".to_string()),
            ..TaskRecord::default()
        };
        let reminder = to_reminder(&task);
        assert_eq!(reminder.due, None);
        assert_eq!(reminder.priority, 0);
        assert!(!reminder.flagged);
    }

    #[test]
    fn test_to_task_fields() {
        let record = ReminderRecord {
            name: "Call mom".to_string(),
            body: Some("about sunday, and dinner".to_string()),
            container: Some("Family".to_string()),
            due: date(2024, 5, 6).and_hms_opt(18, 30, 0),
            priority: 5,
            completed: true,
            id: Some("x-apple-reminder://2".to_string()),
            flagged: true,
            ..ReminderRecord::default()
        };

        let fields = to_task_fields(&record);

        assert_eq!(fields.description.as_deref(), Some("Call mom"));
        assert_eq!(fields.status, Some(TaskStatus::Completed));
        assert_eq!(fields.priority, Some(Priority::Medium));
        assert_eq!(fields.project.as_deref(), Some("Family"));
        assert_eq!(fields.tags, vec!["Family", CRITICAL_TAG]);
        assert_eq!(fields.due.as_deref(), Some("2024-05-06"));
        assert_eq!(fields.annotations, vec!["about sunday, and dinner"]);
        assert_eq!(
            fields.attributes.get(REMINDER_ID_KEY).map(String::as_str),
            Some("x-apple-reminder://2")
        );
    }

    #[test]
    fn test_default_list_sets_no_project() {
        let record = ReminderRecord {
            name: "Water plants".to_string(),
            container: Some(DEFAULT_CONTAINER.to_string()),
            ..ReminderRecord::default()
        };

        let fields = to_task_fields(&record);

        assert_eq!(fields.project, None);
        assert!(fields.tags.is_empty());
        assert!(fields.annotations.is_empty());
        assert_eq!(fields.status, Some(TaskStatus::Pending));
        assert_eq!(fields.priority, None);
    }

    #[test]
    fn test_empty_title_leaves_description_unset() {
        let record = ReminderRecord {
            id: Some("x-apple-reminder://2".to_string()),
            ..ReminderRecord::default()
        };

        let fields = to_task_fields(&record);

        assert_eq!(fields.description, None);
        assert_eq!(
            fields.attributes.get(REMINDER_ID_KEY).map(String::as_str),
            Some("x-apple-reminder://2")
        );
    }
}

//! The reminder record as the sync layer sees it.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, warn};

use super::date::OsaDate;
use super::parse::{MISSING_VALUE, RawRecord};
use super::value::Properties;

/// One Apple Reminders reminder.
///
/// Lives only for the duration of a sync call; nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReminderRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// List the reminder lives in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<NaiveDateTime>,
    /// 0 (none) through 9 (highest).
    pub priority: u8,
    pub completed: bool,
    /// Reminders-assigned id; the cross-store join key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub flagged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remind_me: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modification: Option<String>,
}

fn present<'a>(fields: &'a RawRecord, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && *v != MISSING_VALUE)
}

fn flag(fields: &RawRecord, key: &str) -> bool {
    present(fields, key).is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Decode a date property. Decoding literals is unsupported, so a present
/// value is logged and dropped.
fn date(fields: &RawRecord, key: &str) -> Option<NaiveDateTime> {
    let literal = present(fields, key)?;
    let Some(parsed) = OsaDate::parse(literal) else {
        warn!(property = key, value = literal, "unrecognized date value");
        return None;
    };
    match parsed.to_datetime() {
        Ok(dt) => Some(dt),
        Err(e) => {
            debug!(property = key, error = %e, "date left unset");
            None
        }
    }
}

impl ReminderRecord {
    /// Build a record from decoded bulk output.
    ///
    /// A reminder whose title was cleared keeps its id with an empty name.
    /// Returns `None` only if the record has neither name nor id.
    #[must_use]
    pub fn from_fields(fields: &RawRecord, container: Option<&str>) -> Option<Self> {
        let name = present(fields, "name").unwrap_or_default();
        let id = present(fields, "id");
        if name.is_empty() && id.is_none() {
            warn!(?fields, "reminder without name or id skipped");
            return None;
        }

        let priority = present(fields, "priority").map_or(0, |p| {
            p.parse::<u8>().map(|n| n.min(9)).unwrap_or_else(|_| {
                debug!(value = p, "unreadable priority, using 0");
                0
            })
        });

        Some(Self {
            name: name.to_string(),
            body: present(fields, "body").map(str::to_string),
            container: container.map(str::to_string),
            due: date(fields, "due date"),
            priority,
            completed: flag(fields, "completed"),
            id: id.map(str::to_string),
            flagged: flag(fields, "flagged"),
            remind_me: date(fields, "remind me date"),
            creation: present(fields, "creation date").map(str::to_string),
            modification: present(fields, "modification date").map(str::to_string),
        })
    }

    /// Property payload for create and update.
    ///
    /// Absent values are left out rather than cleared.
    #[must_use]
    pub fn to_properties(&self) -> Properties {
        let mut props = Properties::new().with("name", self.name.as_str());
        if let Some(body) = &self.body {
            props.insert("body", body.as_str());
        }
        if let Some(due) = self.due {
            props.insert("due date", due);
        }
        if self.priority > 0 {
            props.insert("priority", self.priority);
        }
        if self.flagged {
            props.insert("flagged", true);
        }
        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_from_fields_reads_every_property() {
        let fields = raw(&[
            ("name", "Buy milk"),
            ("body", "whole milk"),
            ("due date", "Monday, April 22, 2024 at 6:00:00 PM"),
            ("priority", "5"),
            ("completed", "false"),
            ("id", "x-apple-reminder://1"),
            ("flagged", "true"),
        ]);

        let record = ReminderRecord::from_fields(&fields, Some("Tasks")).unwrap();
        assert_eq!(record.name, "Buy milk");
        assert_eq!(record.body.as_deref(), Some("whole milk"));
        assert_eq!(record.container.as_deref(), Some("Tasks"));
        assert_eq!(record.priority, 5);
        assert!(!record.completed);
        assert!(record.flagged);
        assert_eq!(record.id.as_deref(), Some("x-apple-reminder://1"));
        // Literal decoding is unsupported; the due date stays unset.
        assert_eq!(record.due, None);
    }

    #[test]
    fn test_missing_values_are_absent() {
        let fields = raw(&[
            ("name", "Call mom"),
            ("body", "missing value"),
            ("priority", "missing value"),
            ("id", "x-apple-reminder://2"),
        ]);

        let record = ReminderRecord::from_fields(&fields, None).unwrap();
        assert_eq!(record.body, None);
        assert_eq!(record.priority, 0);
        assert!(!record.flagged);
    }

    #[test]
    fn test_record_without_name_or_id_is_skipped() {
        assert!(ReminderRecord::from_fields(&raw(&[("name", "missing value")]), None).is_none());
        assert!(
            ReminderRecord::from_fields(&raw(&[("name", ""), ("id", "missing value")]), None)
                .is_none()
        );
    }

    #[test]
    fn test_nameless_record_keeps_id() {
        let record = ReminderRecord::from_fields(
            &raw(&[("name", "missing value"), ("id", "x-apple-reminder://2")]),
            Some("Tasks"),
        )
        .unwrap();
        assert_eq!(record.name, "");
        assert_eq!(record.id.as_deref(), Some("x-apple-reminder://2"));
        assert_eq!(record.container.as_deref(), Some("Tasks"));
    }

    #[test]
    fn test_out_of_range_priority() {
        let record =
            ReminderRecord::from_fields(&raw(&[("name", "x"), ("priority", "12")]), None).unwrap();
        assert_eq!(record.priority, 9);
        let record =
            ReminderRecord::from_fields(&raw(&[("name", "x"), ("priority", "high")]), None).unwrap();
        assert_eq!(record.priority, 0);
    }

    #[test]
    fn test_to_properties_omits_empty_values() {
        let record = ReminderRecord {
            name: "Buy milk".to_string(),
            ..ReminderRecord::default()
        };
        assert_eq!(record.to_properties().to_script(), "name:\"Buy milk\"");

        let record = ReminderRecord {
            name: "Buy milk".to_string(),
            body: Some("whole".to_string()),
            due: NaiveDate::from_ymd_opt(2024, 4, 22).unwrap().and_hms_opt(0, 0, 0),
            priority: 9,
            flagged: true,
            ..ReminderRecord::default()
        };
        assert_eq!(
            record.to_properties().to_script(),
            "name:\"Buy milk\", body:\"whole\", due date:date \"Monday, April 22, 2024 at 12:00:00 AM\", priority:9, flagged:true"
        );
    }
}

//! Sync report types.

use serde::Serialize;

/// Per-run counts for one sync direction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    /// Records created on the receiving side.
    pub created: usize,
    /// Existing records updated on the receiving side.
    pub updated: usize,
    /// Records left alone (no description, no id, or completed).
    pub skipped: usize,
    /// Records whose create/update failed; logged and not retried.
    pub failed: usize,
}

impl SyncStats {
    /// Affected records: `created + updated`.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.created + self.updated
    }

    /// Returns true if nothing was created or updated.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// A task newly linked to a reminder during export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub task_uuid: String,
    pub external_id: String,
}

/// Outcome of an export.
///
/// `links` holds the ids assigned to newly created reminders. They live only
/// on the in-memory task records until passed to
/// [`ReminderSync::persist_links`](super::ReminderSync::persist_links);
/// without that, the next export creates those reminders again.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    #[serde(flatten)]
    pub stats: SyncStats,
    pub links: Vec<Link>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_counts_created_and_updated_only() {
        let stats = SyncStats {
            created: 2,
            updated: 3,
            skipped: 4,
            failed: 1,
        };
        assert_eq!(stats.total(), 5);
        assert!(!stats.is_empty());
        assert!(SyncStats::default().is_empty());
    }

    #[test]
    fn test_export_report_serializes_flat() {
        let report = ExportReport {
            stats: SyncStats {
                created: 1,
                ..SyncStats::default()
            },
            links: vec![Link {
                task_uuid: "u1".to_string(),
                external_id: "x-apple-reminder://1".to_string(),
            }],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["created"], 1);
        assert_eq!(json["links"][0]["task_uuid"], "u1");
    }
}

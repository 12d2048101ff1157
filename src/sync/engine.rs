//! Reminders reconciliation.
//!
//! Nothing persists between runs: every export and import rescans both
//! stores and matches records on the reminder id stored in each task's
//! `reminder_id` attribute. The first task found with a given id wins;
//! duplicates are not detected.
//!
//! Export attaches the ids of newly created reminders to its in-memory task
//! records only. Callers that want the link to survive must hand the
//! returned links to [`ReminderSync::persist_links`]; otherwise the next
//! export creates those reminders again.

use std::collections::{HashMap, HashSet};

use tracing::{debug, error, info, warn};

use super::mapper::{to_reminder, to_task_fields};
use super::target::TargetSettings;
use super::types::{ExportReport, Link, SyncStats};
use crate::reminders::ReminderStore;
use crate::task::{TaskFields, TaskStore};

/// Sync between a task store and one Reminders list.
pub struct ReminderSync<'a, R, T> {
    reminders: &'a R,
    tasks: &'a mut T,
    list: Option<String>,
    settings: TargetSettings,
}

impl<'a, R: ReminderStore, T: TaskStore> ReminderSync<'a, R, T> {
    /// Create a sync for `list`, creating the list if it does not exist.
    ///
    /// With no list, reads span every list and new reminders go to the
    /// Reminders default list.
    pub fn new(
        reminders: &'a R,
        tasks: &'a mut T,
        list: Option<String>,
        settings: TargetSettings,
    ) -> Self {
        let list = list.filter(|l| !l.trim().is_empty());
        if let Some(name) = &list {
            if !reminders.ensure_container(name) {
                warn!(list = %name, "could not create reminders list");
            }
        }
        Self {
            reminders,
            tasks,
            list,
            settings,
        }
    }

    #[must_use]
    pub fn list(&self) -> Option<&str> {
        self.list.as_deref()
    }

    #[must_use]
    pub const fn settings(&self) -> &TargetSettings {
        &self.settings
    }

    /// Push tasks matching `filter` to Reminders.
    ///
    /// Tasks already linked to a reminder that still exists are updated;
    /// everything else is created in this sync's list.
    pub fn export(&mut self, filter: &[String]) -> ExportReport {
        let mut report = ExportReport::default();
        if !self.settings.can_export() {
            warn!(target_name = "reminders", "exports are disabled for this target");
            return report;
        }

        let mut tasks = match self.tasks.query(filter, false) {
            Ok(tasks) => tasks,
            Err(e) => {
                error!(error = %e, "could not query tasks for export");
                return report;
            }
        };
        if tasks.is_empty() {
            debug!(?filter, "no tasks to export");
            return report;
        }

        let existing: HashSet<String> = self
            .reminders
            .get_records(self.list())
            .into_iter()
            .filter_map(|r| r.id)
            .collect();

        for task in &mut tasks {
            if task.description.trim().is_empty() {
                report.stats.skipped += 1;
                continue;
            }

            let mut reminder = to_reminder(task);
            let linked = reminder.id.as_ref().is_some_and(|id| existing.contains(id));

            if linked {
                if self.reminders.update_record(&reminder) {
                    report.stats.updated += 1;
                } else {
                    warn!(task = %task.uuid, external_id = ?reminder.id, "reminder update failed");
                    report.stats.failed += 1;
                }
                continue;
            }

            reminder.id = None;
            match self
                .reminders
                .create_record(self.list.as_deref(), &reminder.to_properties())
            {
                Some(id) => {
                    task.set_external_id(&id);
                    report.links.push(Link {
                        task_uuid: task.uuid.clone(),
                        external_id: id,
                    });
                    report.stats.created += 1;
                }
                None => {
                    warn!(task = %task.uuid, "reminder create failed");
                    report.stats.failed += 1;
                }
            }
        }

        info!(
            created = report.stats.created,
            updated = report.stats.updated,
            failed = report.stats.failed,
            "exported tasks to reminders"
        );
        report
    }

    /// Store export links on their tasks. Returns how many were written.
    pub fn persist_links(&mut self, links: &[Link]) -> usize {
        let mut written = 0;
        for link in links {
            match self
                .tasks
                .modify(&link.task_uuid, &TaskFields::link(&link.external_id))
            {
                Ok(_) => written += 1,
                Err(e) => error!(
                    task = %link.task_uuid,
                    external_id = %link.external_id,
                    error = %e,
                    "could not store reminder link"
                ),
            }
        }
        debug!(written, "stored reminder links");
        written
    }

    /// Pull reminders from this sync's list into the task store.
    ///
    /// Completed reminders are skipped unless `include_completed`. Reminders
    /// without an id cannot be matched and are skipped.
    pub fn import(&mut self, include_completed: bool) -> SyncStats {
        let mut stats = SyncStats::default();
        if !self.settings.can_import() {
            warn!(target_name = "reminders", "imports are disabled for this target");
            return stats;
        }

        let mut records = self.reminders.get_records(self.list());
        if records.is_empty() {
            info!(list = ?self.list, "no reminders found");
            return stats;
        }
        if !include_completed {
            let before = records.len();
            records.retain(|r| !r.completed);
            stats.skipped += before - records.len();
        }

        let known = match self.tasks.query(&[], true) {
            Ok(tasks) => {
                let mut known: HashMap<String, String> = HashMap::new();
                for task in tasks {
                    if let Some(id) = task.external_id() {
                        known.entry(id.to_string()).or_insert_with(|| task.uuid.clone());
                    }
                }
                known
            }
            Err(e) => {
                error!(error = %e, "could not query tasks for import");
                return stats;
            }
        };

        for record in &records {
            let Some(id) = record.id.as_deref() else {
                debug!(name = %record.name, "reminder without id skipped");
                stats.skipped += 1;
                continue;
            };

            let fields = to_task_fields(record);
            let (result, counter) = match known.get(id) {
                Some(uuid) => (self.tasks.modify(uuid, &fields), &mut stats.updated),
                None => (self.tasks.create(&fields), &mut stats.created),
            };
            match result {
                Ok(_) => *counter += 1,
                Err(e) => {
                    warn!(external_id = id, error = %e, "could not import reminder");
                    stats.failed += 1;
                }
            }
        }

        info!(
            created = stats.created,
            updated = stats.updated,
            failed = stats.failed,
            "imported reminders"
        );
        stats
    }
}

//! Taskwarrior server sync.

use tracing::{error, info, warn};

use super::target::TargetSettings;
use crate::task::TaskwarriorStore;

/// Export-only target that runs `task sync`.
pub struct TaskdSync<'a> {
    store: &'a TaskwarriorStore,
    settings: TargetSettings,
}

impl<'a> TaskdSync<'a> {
    #[must_use]
    pub const fn new(store: &'a TaskwarriorStore, settings: TargetSettings) -> Self {
        Self { store, settings }
    }

    #[must_use]
    pub const fn settings(&self) -> &TargetSettings {
        &self.settings
    }

    /// Run `task sync` and return the number of changes it reports.
    ///
    /// Any failure is logged and reported as 0.
    pub fn export(&self) -> usize {
        if !self.settings.can_export() {
            warn!(target_name = "taskd", "exports are disabled for this target");
            return 0;
        }

        let output = match self.store.run(&["sync".to_string()], None) {
            Ok(output) => output,
            Err(e) => {
                error!(error = %e, "could not run task sync");
                return 0;
            }
        };
        if output.code != 0 {
            warn!(code = output.code, stderr = output.stderr.trim(), "task sync exited with an error");
        }

        let changes = parse_sync_changes(&format!("{}\n{}", output.stdout, output.stderr));
        info!(changes, "taskd sync finished");
        changes
    }
}

/// Change count from `task sync` output.
///
/// Reads the first line mentioning both `Sync` and `changes` and returns the
/// first all-digit word on it.
#[must_use]
pub fn parse_sync_changes(output: &str) -> usize {
    output
        .lines()
        .find(|line| line.contains("Sync") && line.contains("changes"))
        .and_then(|line| {
            line.split_whitespace()
                .find(|word| !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit()))
        })
        .and_then(|word| word.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::target::SyncTarget;

    #[test]
    fn test_parse_sync_changes() {
        let output = "Syncing with taskd.example.com:53589\n\nSync successful.  3 changes uploaded.\n";
        assert_eq!(parse_sync_changes(output), 3);
    }

    #[test]
    fn test_parse_sync_changes_needs_both_keywords() {
        assert_eq!(parse_sync_changes("Sync successful.  No changes.\n"), 0);
        assert_eq!(parse_sync_changes("4 changes pending\n"), 0);
        assert_eq!(parse_sync_changes(""), 0);
    }

    #[test]
    fn test_parse_sync_changes_ignores_non_numeric_words() {
        assert_eq!(parse_sync_changes("Sync successful. 12a changes, 7 changes uploaded"), 7);
    }

    #[test]
    fn test_disabled_export_does_not_run() {
        let store = TaskwarriorStore::new("/nonexistent/task-binary");
        let mut settings = TargetSettings::resolve(SyncTarget::Taskd, None);
        settings.exports_enabled = false;

        assert_eq!(TaskdSync::new(&store, settings).export(), 0);
    }

    #[test]
    fn test_spawn_failure_reports_zero() {
        let store = TaskwarriorStore::new("/nonexistent/task-binary");
        let settings = TargetSettings::resolve(SyncTarget::Taskd, None);

        assert_eq!(TaskdSync::new(&store, settings).export(), 0);
    }
}

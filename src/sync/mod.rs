//! Sync targets.
//!
//! - **Reminders**: two-way sync between tasks and one Apple Reminders list
//!   ([`ReminderSync`]), using [`mapper`] to cross between the two shapes
//! - **Taskd**: `task sync` against a Taskwarrior server ([`TaskdSync`]),
//!   export only
//!
//! Each target's directions are gated by [`TargetSettings`]: supported by the
//! target, enabled in config, and for unattended runs, marked auto.
//!
//! # Failure model
//!
//! Per-record failures are logged and counted in [`SyncStats::failed`]; a
//! batch never stops early and earlier changes are never rolled back. A
//! disabled direction logs a warning and reports zero.
//!
//! # Example
//!
//! ```ignore
//! use taskr::reminders::{Osascript, RemindersClient};
//! use taskr::sync::{ReminderSync, SyncTarget, TargetSettings};
//! use taskr::task::TaskwarriorStore;
//!
//! let reminders = RemindersClient::new(Osascript::default());
//! let mut tasks = TaskwarriorStore::new("task");
//! let settings = TargetSettings::resolve(SyncTarget::Reminders, None);
//! let mut sync = ReminderSync::new(&reminders, &mut tasks, Some("Tasks".into()), settings);
//!
//! let imported = sync.import(false);
//! let report = sync.export(&[]);
//! sync.persist_links(&report.links);
//! ```

mod engine;
pub mod mapper;
mod status;
mod target;
mod taskd;
mod types;

pub use engine::ReminderSync;
pub use status::{print_status, status_lines};
pub use target::{Capabilities, SyncTarget, TargetSettings};
pub use taskd::{TaskdSync, parse_sync_changes};
pub use types::{ExportReport, Link, SyncStats};

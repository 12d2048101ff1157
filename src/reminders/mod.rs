//! Apple Reminders, driven through AppleScript.
//!
//! The pieces, leaves first:
//!
//! - [`value`] - typed property payloads and their AppleScript rendering
//! - [`date`] - the date literal grammar (encode and recognize only)
//! - [`command`] - one `tell application "Reminders"` command per verb
//! - [`executor`] - one `osascript` process per command, failures folded into [`ScriptOutput::Failed`]
//! - [`parse`] - bulk query output back into records
//! - [`record`] - the reminder record
//! - [`client`] - the [`ReminderStore`] contract and its AppleScript implementation
//!
//! Nothing in this module returns an error: host failures are logged and
//! surface as empty, `false` or `None` results.

pub mod client;
pub mod command;
pub mod date;
pub mod executor;
pub mod parse;
pub mod record;
pub mod value;

pub use client::{ReminderStore, RemindersClient};
pub use command::{Command, CommandBuilder, Verb, VerbalIndex};
pub use date::{OsaDate, is_osa_date};
pub use executor::{Osascript, ScriptExecutor, ScriptOutput, ScriptResult, ScriptRunner};
pub use record::ReminderRecord;
pub use value::{OsaValue, Properties};

/// The list Reminders files reminders into when none is named.
pub const DEFAULT_CONTAINER: &str = "Reminders";

//! taskr - a Taskwarrior companion that syncs tasks with Apple Reminders
//! and a Taskwarrior server.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`reminders`] - AppleScript command building, execution and output parsing
//! - [`task`] - Task store backed by the `task` binary
//! - [`sync`] - Reminders and taskd sync targets, and the task/reminder mapping
//! - [`config`] - Configuration management
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod reminders;
pub mod sync;
pub mod task;
pub mod validate;

pub use error::{Error, Result};

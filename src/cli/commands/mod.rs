//! Command implementations.

pub mod completions;
pub mod reminders;
pub mod sync;
pub mod version;

use crate::config::{TaskrConfig, config_path, load_config};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Resolve and load the config file for a command.
pub(crate) fn load(explicit: Option<&Path>) -> Result<(PathBuf, TaskrConfig)> {
    let path = config_path(explicit)?;
    let config = load_config(&path)?;
    Ok((path, config))
}

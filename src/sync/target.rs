//! Sync targets and direction gating.
//!
//! A target declares which directions it supports. A direction runs only if
//! it is supported and enabled in the config, and runs automatically only if
//! it also has its auto flag set.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::config::{DEFAULT_LIST_OPTION, SyncTargetConfig, TaskrConfig};
use crate::error::Error;
use crate::validate::normalize_target;

/// A known sync target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncTarget {
    /// Taskwarrior server, via `task sync`. Export only.
    Taskd,
    /// Apple Reminders. Import and export.
    Reminders,
}

/// Directions a target can sync in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub can_import: bool,
    pub can_export: bool,
}

impl SyncTarget {
    pub const ALL: [Self; 2] = [Self::Taskd, Self::Reminders];

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Taskd => "taskd",
            Self::Reminders => "reminders",
        }
    }

    /// Human label for status output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Taskd => "Taskwarrior server (taskd)",
            Self::Reminders => "Apple Reminders",
        }
    }

    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        match self {
            Self::Taskd => Capabilities {
                can_import: false,
                can_export: true,
            },
            Self::Reminders => Capabilities {
                can_import: true,
                can_export: true,
            },
        }
    }
}

impl fmt::Display for SyncTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SyncTarget {
    type Err = Error;

    /// Parse a target name, accepting synonyms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_target(s) {
            Ok(name) if name == "taskd" => Ok(Self::Taskd),
            Ok(name) if name == "reminders" => Ok(Self::Reminders),
            Ok(name) | Err((name, _)) => Err(Error::UnknownSyncTarget { name }),
        }
    }
}

/// Effective per-direction permissions for one target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetSettings {
    pub target: SyncTarget,
    pub exports_enabled: bool,
    pub exports_auto: bool,
    pub imports_enabled: bool,
    pub imports_auto: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, serde_json::Value>,
}

impl TargetSettings {
    /// Combine a target's capabilities with its config.
    ///
    /// Without config the supported directions are enabled and nothing is
    /// automatic.
    #[must_use]
    pub fn resolve(target: SyncTarget, config: Option<&SyncTargetConfig>) -> Self {
        let caps = target.capabilities();
        match config {
            Some(cfg) => Self {
                target,
                exports_enabled: caps.can_export && cfg.exports_enabled,
                exports_auto: caps.can_export && cfg.exports_auto,
                imports_enabled: caps.can_import && cfg.imports_enabled,
                imports_auto: caps.can_import && cfg.imports_auto,
                options: cfg.options.clone(),
            },
            None => Self {
                target,
                exports_enabled: caps.can_export,
                exports_auto: false,
                imports_enabled: caps.can_import,
                imports_auto: false,
                options: BTreeMap::new(),
            },
        }
    }

    /// Settings for `target` from a loaded config.
    #[must_use]
    pub fn from_config(target: SyncTarget, config: &TaskrConfig) -> Self {
        Self::resolve(target, config.syncs.target(target.name()))
    }

    #[must_use]
    pub const fn can_import(&self) -> bool {
        self.target.capabilities().can_import && self.imports_enabled
    }

    #[must_use]
    pub const fn can_export(&self) -> bool {
        self.target.capabilities().can_export && self.exports_enabled
    }

    #[must_use]
    pub const fn should_auto_import(&self) -> bool {
        self.can_import() && self.imports_auto
    }

    #[must_use]
    pub const fn should_auto_export(&self) -> bool {
        self.can_export() && self.exports_auto
    }

    /// String option, if set and non-empty.
    #[must_use]
    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.options
            .get(key)
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// The configured default Reminders list.
    #[must_use]
    pub fn default_list(&self) -> Option<&str> {
        self.option_str(DEFAULT_LIST_OPTION)
    }
}

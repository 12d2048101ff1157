//! Error types for taskr.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (3=not_found, 4=validation, 6=task store, 7=config, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers
//!
//! Failures of the Reminders host (process, parse and mapping failures) never
//! surface here: the sync layer logs them and reports empty or `false`
//! results instead. Only the task store and configuration layers return
//! these errors.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for taskr operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Not Found (exit 3)
    TaskNotFound,

    // Validation (exit 4)
    InvalidArgument,
    InvalidPriority,

    // Task store (exit 6)
    TaskCommandFailed,

    // Config (exit 7)
    ConfigError,
    UnknownSyncTarget,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::InvalidPriority => "INVALID_PRIORITY",
            Self::TaskCommandFailed => "TASK_COMMAND_FAILED",
            Self::ConfigError => "CONFIG_ERROR",
            Self::UnknownSyncTarget => "UNKNOWN_SYNC_TARGET",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::TaskNotFound => 3,
            Self::InvalidArgument | Self::InvalidPriority => 4,
            Self::TaskCommandFailed => 6,
            Self::ConfigError | Self::UnknownSyncTarget => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether retrying with corrected input can succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument | Self::InvalidPriority | Self::UnknownSyncTarget
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in taskr operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Task not found: {uuid}")]
    TaskNotFound { uuid: String },

    #[error("Unknown sync target: {name}")]
    UnknownSyncTarget { name: String },

    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    #[error("Task command failed (exit {code}): {stderr}")]
    TaskCommand { code: i32, stderr: String },

    #[error("Could not read task command output: {0}")]
    TaskOutput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not writable: {}", path.display())]
    ConfigNotWritable { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::TaskNotFound { .. } => ErrorCode::TaskNotFound,
            Self::UnknownSyncTarget { .. } => ErrorCode::UnknownSyncTarget,
            Self::InvalidPriority(_) => ErrorCode::InvalidPriority,
            Self::TaskCommand { .. } | Self::TaskOutput(_) => ErrorCode::TaskCommandFailed,
            Self::Config(_) | Self::ConfigNotWritable { .. } => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::UnknownSyncTarget { .. } => {
                Some("Valid targets are: taskd, reminders".to_string())
            }
            Self::InvalidPriority(_) => {
                Some("Valid priorities: H, M, L (or high, medium, low)".to_string())
            }
            Self::TaskNotFound { uuid } => Some(format!(
                "No task with UUID '{uuid}'. Use `task {uuid} info` to check it still exists."
            )),
            Self::TaskCommand { .. } => Some(
                "Check `taskwarrior.command` in the taskr config and that `task` runs on its own."
                    .to_string(),
            ),
            Self::ConfigNotWritable { path } => Some(format!(
                "Make sure {} is writable, or point TASKR_CONFIG somewhere else.",
                path.display()
            )),
            Self::TaskOutput(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::InvalidArgument(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_target_is_config_category() {
        let err = Error::UnknownSyncTarget {
            name: "dropbox".to_string(),
        };
        assert_eq!(err.exit_code(), 7);
        assert_eq!(err.error_code().as_str(), "UNKNOWN_SYNC_TARGET");
        assert!(err.hint().is_some());
    }

    #[test]
    fn test_structured_json_carries_hint() {
        let err = Error::InvalidPriority("urgent".to_string());
        let json = err.to_structured_json();
        assert_eq!(json["error"]["code"], "INVALID_PRIORITY");
        assert_eq!(json["error"]["exit_code"], 4);
        assert_eq!(json["error"]["retryable"], true);
        assert!(json["error"]["hint"].is_string());
    }

    #[test]
    fn test_task_command_failure_exit_code() {
        let err = Error::TaskCommand {
            code: 2,
            stderr: "No matches.".to_string(),
        };
        assert_eq!(err.exit_code(), 6);
        assert!(err.to_string().contains("No matches."));
    }
}

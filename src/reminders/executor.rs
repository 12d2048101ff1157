//! Script execution.
//!
//! One command, one blocking `osascript` process. Failures never escape as
//! errors: they are logged and folded into [`ScriptOutput::Failed`].

use std::io;
use std::process::{Command as Process, Stdio};

use tracing::{debug, error, warn};

use super::command::Command;

/// Raw result of one interpreter run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptResult {
    /// Exit code; `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Runs AppleScript source and captures its output.
pub trait ScriptRunner {
    /// Run `script` to completion.
    ///
    /// # Errors
    ///
    /// Returns an error only if the interpreter could not be started.
    fn run(&self, script: &str) -> io::Result<ScriptResult>;
}

/// The system `osascript` interpreter.
#[derive(Debug, Clone)]
pub struct Osascript {
    program: String,
}

impl Osascript {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Osascript {
    fn default() -> Self {
        Self::new("osascript")
    }
}

impl ScriptRunner for Osascript {
    fn run(&self, script: &str) -> io::Result<ScriptResult> {
        let output = Process::new(&self.program)
            .arg("-e")
            .arg(script)
            .stdin(Stdio::null())
            .output()?;

        Ok(ScriptResult {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Decoded outcome of one command.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptOutput {
    /// Process failure, or no output where output was required.
    Failed,
    /// Side effect applied; nothing printed.
    Done,
    /// Trimmed stdout.
    Text(String),
    /// Stdout that decoded as JSON.
    Structured(serde_json::Value),
}

impl ScriptOutput {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Executes built commands through a [`ScriptRunner`].
#[derive(Debug, Clone, Default)]
pub struct ScriptExecutor<R> {
    runner: R,
}

impl<R: ScriptRunner> ScriptExecutor<R> {
    pub const fn new(runner: R) -> Self {
        Self { runner }
    }

    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// Run one command and classify its output.
    pub fn execute(&self, command: &Command) -> ScriptOutput {
        let verb = command.verb();
        debug!(%verb, script = command.script(), "running script");

        let result = match self.runner.run(command.script()) {
            Ok(result) => result,
            Err(e) => {
                error!(%verb, error = %e, "could not start script interpreter");
                return ScriptOutput::Failed;
            }
        };

        let stderr = result.stderr.trim();
        if result.code != Some(0) || !stderr.is_empty() {
            error!(%verb, code = ?result.code, stderr, "script failed");
            return ScriptOutput::Failed;
        }

        let stdout = result.stdout.trim();
        if stdout.is_empty() {
            if verb.expects_output() {
                warn!(%verb, "script produced no output");
                return ScriptOutput::Failed;
            }
            return ScriptOutput::Done;
        }

        if stdout.starts_with('{') || stdout.starts_with('[') {
            match serde_json::from_str(stdout) {
                Ok(value) => return ScriptOutput::Structured(value),
                Err(e) => debug!(%verb, error = %e, "output is not JSON, keeping text"),
            }
        }

        ScriptOutput::Text(stdout.to_string())
    }
}

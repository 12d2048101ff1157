//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// taskr - Taskwarrior companion with Apple Reminders and taskd sync
#[derive(Parser, Debug)]
#[command(name = "taskr", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (default: ~/.taskr/config.json)
    #[arg(long, global = true, env = "TASKR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print version information
    Version,

    /// Sync tasks with external targets
    Sync {
        #[command(subcommand)]
        command: SyncCommands,
    },

    /// Inspect and manage Apple Reminders lists
    Reminders {
        #[command(subcommand)]
        command: RemindersCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ============================================================================
// Sync Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum SyncCommands {
    /// Import from and export to Apple Reminders
    ///
    /// Import runs first and copies each reminder's completed state onto its
    /// linked task: a task completed in Taskwarrior whose reminder is still
    /// open goes back to pending. Use --no-import to push local changes only.
    Reminders(SyncRemindersArgs),

    /// Sync with a Taskwarrior server (task sync)
    Taskd {
        /// Turn automatic export on or off for future `sync auto` runs
        #[arg(long)]
        auto_export: Option<bool>,
    },

    /// Show per-target sync settings
    Status,

    /// Run every sync direction marked automatic
    Auto,

    /// Enable or disable sync directions for a target
    Enable(SyncEnableArgs),
}

#[derive(Args, Debug, Default)]
pub struct SyncRemindersArgs {
    /// Reminders list to sync with (default: the configured default list)
    #[arg(short, long)]
    pub list: Option<String>,

    /// Skip importing reminders as tasks (keeps task status as is)
    #[arg(long)]
    pub no_import: bool,

    /// Skip exporting tasks as reminders
    #[arg(long)]
    pub no_export: bool,

    /// Import completed reminders too
    #[arg(long)]
    pub include_completed: bool,

    /// Do not store new reminder ids on exported tasks
    #[arg(long)]
    pub no_link: bool,

    /// Turn automatic import on or off for future `sync auto` runs
    #[arg(long)]
    pub auto_import: Option<bool>,

    /// Turn automatic export on or off for future `sync auto` runs
    #[arg(long)]
    pub auto_export: Option<bool>,

    /// Taskwarrior filter for tasks to export (e.g. project:errands +home)
    pub filter: Vec<String>,
}

#[derive(Args, Debug)]
pub struct SyncEnableArgs {
    /// Sync target (taskd, reminders)
    pub target: String,

    /// Disable imports
    #[arg(long)]
    pub no_import: bool,

    /// Disable exports
    #[arg(long)]
    pub no_export: bool,

    /// Import automatically during `sync auto`
    #[arg(long)]
    pub auto_import: bool,

    /// Export automatically during `sync auto`
    #[arg(long)]
    pub auto_export: bool,

    /// Default Reminders list
    #[arg(long)]
    pub default_list: Option<String>,
}

// ============================================================================
// Reminders Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum RemindersCommands {
    /// List Reminders lists
    Lists,

    /// Create a Reminders list
    CreateList {
        /// List name
        name: String,
    },

    /// Show reminders in a list
    Show {
        /// List to show (default: the configured default list, else all)
        #[arg(short, long)]
        list: Option<String>,

        /// Include completed reminders
        #[arg(long)]
        include_completed: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_sync_reminders_collects_filter() {
        let cli = Cli::parse_from([
            "taskr", "sync", "reminders", "--list", "Tasks", "--no-import", "project:errands", "+home",
        ]);
        let Commands::Sync {
            command: SyncCommands::Reminders(args),
        } = cli.command
        else {
            panic!("expected sync reminders");
        };
        assert_eq!(args.list.as_deref(), Some("Tasks"));
        assert!(args.no_import);
        assert_eq!(args.filter, vec!["project:errands", "+home"]);
    }

    #[test]
    fn test_auto_flags_take_values() {
        let cli = Cli::parse_from(["taskr", "sync", "taskd", "--auto-export", "true"]);
        assert!(matches!(
            cli.command,
            Commands::Sync {
                command: SyncCommands::Taskd {
                    auto_export: Some(true)
                }
            }
        ));
    }
}

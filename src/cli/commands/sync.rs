//! Sync command implementations.
//!
//! Each run loads the config file, resolves the target's settings, then
//! drives the sync engine against the real `task` binary and Reminders.

use crate::cli::{SyncCommands, SyncEnableArgs, SyncRemindersArgs};
use crate::config::{
    DEFAULT_LIST_OPTION, TargetUpdate, TaskrConfig, config_path, load_config, update_target_config,
};
use crate::error::{Error, Result};
use crate::reminders::{Osascript, RemindersClient};
use crate::sync::{
    ExportReport, ReminderSync, SyncStats, SyncTarget, TargetSettings, TaskdSync, print_status,
    status_lines,
};
use crate::task::TaskwarriorStore;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

/// Execute sync commands.
pub fn execute(command: &SyncCommands, config: Option<&Path>, json: bool) -> Result<()> {
    match command {
        SyncCommands::Reminders(args) => reminders(args, config, json),
        SyncCommands::Taskd { auto_export } => taskd(*auto_export, config, json),
        SyncCommands::Status => status(config, json),
        SyncCommands::Auto => auto(config, json),
        SyncCommands::Enable(args) => enable(args, config, json),
    }
}

#[derive(Serialize)]
struct RemindersOutput<'a> {
    target: &'a str,
    list: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    imported: Option<SyncStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exported: Option<ExportReport>,
    linked: usize,
}

fn reminders(args: &SyncRemindersArgs, config: Option<&Path>, json: bool) -> Result<()> {
    let (path, mut cfg) = super::load(config)?;

    if args.auto_import.is_some() || args.auto_export.is_some() {
        let update = TargetUpdate {
            imports_auto: args.auto_import,
            exports_auto: args.auto_export,
            ..TargetUpdate::default()
        };
        update_target_config(&path, SyncTarget::Reminders.name(), &update)?;
        cfg = load_config(&path)?;
    }

    let settings = TargetSettings::from_config(SyncTarget::Reminders, &cfg);
    let list = args
        .list
        .clone()
        .or_else(|| settings.default_list().map(ToString::to_string));

    let client = RemindersClient::new(Osascript::default());
    let mut store = TaskwarriorStore::from_settings(&cfg.taskwarrior);
    let mut sync = ReminderSync::new(&client, &mut store, list, settings);

    let imported = (!args.no_import).then(|| sync.import(args.include_completed));
    let exported = (!args.no_export).then(|| sync.export(&args.filter));
    let linked = match &exported {
        Some(report) if !args.no_link => sync.persist_links(&report.links),
        _ => 0,
    };

    if json {
        let output = RemindersOutput {
            target: SyncTarget::Reminders.name(),
            list: sync.list(),
            imported,
            exported,
            linked,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    let list_label = sync.list().unwrap_or("all lists");
    println!("{} {}", "Reminders sync:".cyan().bold(), list_label);
    if let Some(stats) = imported {
        print_stats("Imported", &stats);
    }
    if let Some(report) = exported {
        print_stats("Exported", &report.stats);
        if linked > 0 {
            println!("  Linked {linked} new reminder(s) to their tasks");
        } else if args.no_link && !report.links.is_empty() {
            println!(
                "  {}",
                format!("{} new reminder(s) left unlinked", report.links.len()).dimmed()
            );
        }
    }
    Ok(())
}

fn print_stats(direction: &str, stats: &SyncStats) {
    if stats.is_empty() {
        println!("  {direction}: {}", "nothing to do".dimmed());
        return;
    }
    println!(
        "  {direction}: {} created, {} updated, {} skipped, {}",
        stats.created,
        stats.updated,
        stats.skipped,
        if stats.failed > 0 {
            format!("{} failed", stats.failed).red()
        } else {
            "0 failed".normal()
        }
    );
}

fn taskd(auto_export: Option<bool>, config: Option<&Path>, json: bool) -> Result<()> {
    let (path, mut cfg) = super::load(config)?;

    if auto_export.is_some() {
        let update = TargetUpdate {
            exports_auto: auto_export,
            ..TargetUpdate::default()
        };
        update_target_config(&path, SyncTarget::Taskd.name(), &update)?;
        cfg = load_config(&path)?;
    }

    let changes = run_taskd(&cfg);

    if json {
        let output = serde_json::json!({
            "target": SyncTarget::Taskd.name(),
            "changes": changes,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{} {changes} change(s)", "Taskd sync:".cyan().bold());
    }
    Ok(())
}

fn run_taskd(cfg: &TaskrConfig) -> usize {
    let store = TaskwarriorStore::from_settings(&cfg.taskwarrior);
    let settings = TargetSettings::from_config(SyncTarget::Taskd, cfg);
    TaskdSync::new(&store, settings).export()
}

fn status(config: Option<&Path>, json: bool) -> Result<()> {
    let (path, cfg) = super::load(config)?;
    let targets: Vec<TargetSettings> = SyncTarget::ALL
        .iter()
        .map(|target| TargetSettings::from_config(*target, &cfg))
        .collect();

    if json {
        let output = serde_json::json!({
            "config": path.display().to_string(),
            "targets": targets,
        });
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    print_status(&targets);
    println!();
    println!("{}", format!("Config: {}", path.display()).dimmed());
    Ok(())
}

#[derive(Serialize, Default)]
struct AutoOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    taskd_changes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reminders_imported: Option<SyncStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reminders_exported: Option<SyncStats>,
}

/// Run every direction whose settings say it should happen unattended.
fn auto(config: Option<&Path>, json: bool) -> Result<()> {
    let (_, cfg) = super::load(config)?;
    let mut output = AutoOutput::default();

    let taskd = TargetSettings::from_config(SyncTarget::Taskd, &cfg);
    if taskd.should_auto_export() {
        output.taskd_changes = Some(run_taskd(&cfg));
    }

    let settings = TargetSettings::from_config(SyncTarget::Reminders, &cfg);
    let (auto_import, auto_export) = (settings.should_auto_import(), settings.should_auto_export());
    if auto_import || auto_export {
        let list = settings.default_list().map(ToString::to_string);
        let client = RemindersClient::new(Osascript::default());
        let mut store = TaskwarriorStore::from_settings(&cfg.taskwarrior);
        let mut sync = ReminderSync::new(&client, &mut store, list, settings);

        if auto_import {
            output.reminders_imported = Some(sync.import(false));
        }
        if auto_export {
            let report = sync.export(&[]);
            sync.persist_links(&report.links);
            output.reminders_exported = Some(report.stats);
        }
    }

    if json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    let mut ran = false;
    if let Some(changes) = output.taskd_changes {
        println!("{} {changes} change(s)", "Taskd sync:".cyan().bold());
        ran = true;
    }
    if output.reminders_imported.is_some() || output.reminders_exported.is_some() {
        println!("{}", "Reminders sync:".cyan().bold());
        if let Some(stats) = &output.reminders_imported {
            print_stats("Imported", stats);
        }
        if let Some(stats) = &output.reminders_exported {
            print_stats("Exported", stats);
        }
        ran = true;
    }
    if !ran {
        println!("No automatic syncs are enabled.");
    }
    Ok(())
}

fn enable(args: &SyncEnableArgs, config: Option<&Path>, json: bool) -> Result<()> {
    let target: SyncTarget = args.target.parse()?;
    let path = config_path(config)?;

    let mut update = TargetUpdate {
        exports_enabled: Some(!args.no_export),
        exports_auto: Some(args.auto_export),
        imports_enabled: Some(!args.no_import),
        imports_auto: Some(args.auto_import),
        ..TargetUpdate::default()
    };
    if let Some(list) = &args.default_list {
        update
            .options
            .insert(DEFAULT_LIST_OPTION.to_string(), serde_json::json!(list));
    }

    if !update_target_config(&path, target.name(), &update)? {
        return Err(Error::UnknownSyncTarget {
            name: args.target.clone(),
        });
    }

    let cfg = load_config(&path)?;
    let settings = TargetSettings::from_config(target, &cfg);

    if json {
        println!("{}", serde_json::to_string(&settings)?);
        return Ok(());
    }

    println!("{} {}", "Updated".green(), target.label().bold());
    for line in status_lines(&settings) {
        println!("{line}");
    }
    Ok(())
}

//! Reminders command implementations.

use crate::cli::RemindersCommands;
use crate::error::{Error, Result};
use crate::reminders::{Osascript, ReminderRecord, ReminderStore, RemindersClient};
use crate::sync::mapper::priority_from_reminder;
use crate::sync::{SyncTarget, TargetSettings};
use colored::Colorize;
use std::path::Path;

/// Execute reminders commands.
pub fn execute(command: &RemindersCommands, config: Option<&Path>, json: bool) -> Result<()> {
    let client = RemindersClient::new(Osascript::default());

    match command {
        RemindersCommands::Lists => lists(&client, json),
        RemindersCommands::CreateList { name } => create_list(&client, name, json),
        RemindersCommands::Show {
            list,
            include_completed,
        } => {
            let list = match list {
                Some(list) => Some(list.clone()),
                None => {
                    let (_, cfg) = super::load(config)?;
                    TargetSettings::from_config(SyncTarget::Reminders, &cfg)
                        .default_list()
                        .map(ToString::to_string)
                }
            };
            show(&client, list.as_deref(), *include_completed, json)
        }
    }
}

fn lists(store: &impl ReminderStore, json: bool) -> Result<()> {
    let names = store.list_containers();

    if json {
        println!("{}", serde_json::to_string(&names)?);
    } else if names.is_empty() {
        println!("No lists found.");
    } else {
        for name in &names {
            println!("{name}");
        }
    }
    Ok(())
}

fn create_list(store: &impl ReminderStore, name: &str, json: bool) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidArgument("List name cannot be empty".to_string()));
    }
    if !store.ensure_container(name) {
        return Err(Error::Other(format!("Could not create Reminders list '{name}'")));
    }

    if json {
        let output = serde_json::json!({ "list": name, "created": true });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{} {}", "Created list".green(), name.bold());
    }
    Ok(())
}

fn show(
    store: &impl ReminderStore,
    list: Option<&str>,
    include_completed: bool,
    json: bool,
) -> Result<()> {
    let records: Vec<ReminderRecord> = store
        .get_records(list)
        .into_iter()
        .filter(|r| include_completed || !r.completed)
        .collect();

    if json {
        println!("{}", serde_json::to_string(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No reminders found.");
        return Ok(());
    }

    for record in &records {
        println!("{}", format_line(record));
    }
    println!();
    println!("{}", format!("{} reminder(s)", records.len()).dimmed());
    Ok(())
}

fn format_line(record: &ReminderRecord) -> String {
    let check = if record.completed { "[x]" } else { "[ ]" };
    let mut line = format!("{check} {}", record.name);

    if let Some(priority) = priority_from_reminder(record.priority) {
        line.push_str(&format!(" ({})", priority.code()));
    }
    if record.flagged {
        line.push_str(" !");
    }
    if let Some(due) = record.due {
        line.push_str(&format!(" due {}", due.format("%Y-%m-%d")));
    }
    if let Some(list) = &record.container {
        line.push_str(&format!(" @{list}"));
    }
    line
}

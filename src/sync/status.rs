//! Sync status display.

use colored::Colorize;

use super::target::TargetSettings;
use crate::config::DEFAULT_LIST_OPTION;

fn on_off(value: bool) -> colored::ColoredString {
    if value {
        "yes".green()
    } else {
        "no".dimmed()
    }
}

/// Lines describing one target's effective settings.
#[must_use]
pub fn status_lines(settings: &TargetSettings) -> Vec<String> {
    let caps = settings.target.capabilities();
    let mut lines = Vec::new();

    if caps.can_export {
        lines.push(format!("  Export enabled: {}", on_off(settings.can_export())));
        lines.push(format!("  Auto-export:    {}", on_off(settings.should_auto_export())));
    }
    if caps.can_import {
        lines.push(format!("  Import enabled: {}", on_off(settings.can_import())));
        lines.push(format!("  Auto-import:    {}", on_off(settings.should_auto_import())));
        let list = settings
            .default_list()
            .map_or_else(|| "not set".dimmed().to_string(), ToString::to_string);
        lines.push(format!("  Default list:   {list}"));
    }
    for (key, value) in &settings.options {
        if key != DEFAULT_LIST_OPTION {
            lines.push(format!("  {key}: {value}"));
        }
    }

    lines
}

/// Print every target's status for humans.
pub fn print_status(targets: &[TargetSettings]) {
    println!("{}", "Sync Status:".cyan().bold());

    for settings in targets {
        println!();
        println!(
            "{} {}",
            settings.target.label().bold(),
            format!("({})", settings.target).dimmed()
        );
        for line in status_lines(settings) {
            println!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::target::SyncTarget;

    #[test]
    fn test_taskd_shows_export_only() {
        colored::control::set_override(false);
        let lines = status_lines(&TargetSettings::resolve(SyncTarget::Taskd, None));
        assert_eq!(
            lines,
            vec!["  Export enabled: yes", "  Auto-export:    no"]
        );
    }

    #[test]
    fn test_reminders_shows_default_list() {
        colored::control::set_override(false);
        let mut settings = TargetSettings::resolve(SyncTarget::Reminders, None);
        settings
            .options
            .insert(DEFAULT_LIST_OPTION.to_string(), serde_json::json!("Tasks"));

        let lines = status_lines(&settings);
        assert!(lines.contains(&"  Import enabled: yes".to_string()));
        assert!(lines.contains(&"  Default list:   Tasks".to_string()));
    }
}

//! Binary-level tests. Each test points `TASKR_CONFIG` at its own temp dir,
//! and only exercises commands that never reach `task` or `osascript`.

use assert_cmd::Command;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> PathBuf {
    dir.path().join("taskr").join("config.json")
}

fn taskr(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("taskr").unwrap();
    cmd.env("TASKR_CONFIG", config).env_remove("RUST_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

fn target<'a>(status: &'a Value, name: &str) -> &'a Value {
    status["targets"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["target"] == name)
        .unwrap()
}

#[test]
fn test_version_json() {
    let dir = TempDir::new().unwrap();
    let json = stdout_json(taskr(&config_in(&dir)).args(["version", "--json"]));

    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["targets"], serde_json::json!(["taskd", "reminders"]));
}

#[test]
fn test_status_defaults_without_config_file() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let status = stdout_json(taskr(&config).args(["sync", "status", "--json"]));

    let taskd = target(&status, "taskd");
    assert_eq!(taskd["exports_enabled"], true);
    assert_eq!(taskd["imports_enabled"], false);

    let reminders = target(&status, "reminders");
    assert_eq!(reminders["imports_enabled"], true);
    assert_eq!(reminders["imports_auto"], false);
    assert!(!config.exists());
}

#[test]
fn test_enable_unknown_target_exits_with_config_error() {
    let dir = TempDir::new().unwrap();
    let output = taskr(&config_in(&dir))
        .args(["sync", "enable", "dropbox"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(7));
    let err: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(err["error"]["code"], "UNKNOWN_SYNC_TARGET");
}

#[test]
fn test_enable_persists_settings() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    taskr(&config)
        .args([
            "sync",
            "enable",
            "reminders",
            "--auto-import",
            "--default-list",
            "Tasks",
        ])
        .assert()
        .success();
    assert!(config.exists());

    let status = stdout_json(taskr(&config).args(["sync", "status", "--json"]));
    let reminders = target(&status, "reminders");
    assert_eq!(reminders["imports_auto"], true);
    assert_eq!(reminders["exports_auto"], false);
    assert_eq!(reminders["options"]["default_list"], "Tasks");
}

#[test]
fn test_enable_accepts_synonym() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let settings = stdout_json(taskr(&config).args(["sync", "enable", "apple", "--no-export"]));
    assert_eq!(settings["target"], "reminders");
    assert_eq!(settings["exports_enabled"], false);
    assert_eq!(settings["imports_enabled"], true);
}

#[test]
fn test_import_flag_ignored_for_export_only_target() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let settings = stdout_json(taskr(&config).args(["sync", "enable", "taskd", "--auto-import"]));
    assert_eq!(settings["imports_enabled"], false);
    assert_eq!(settings["imports_auto"], false);
}

#[test]
fn test_disabled_taskd_sync_reports_no_changes() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    taskr(&config)
        .args(["sync", "enable", "taskd", "--no-export"])
        .assert()
        .success();

    let result = stdout_json(taskr(&config).args(["sync", "taskd", "--json"]));
    assert_eq!(result["target"], "taskd");
    assert_eq!(result["changes"], 0);
}

#[test]
fn test_auto_with_nothing_enabled() {
    let dir = TempDir::new().unwrap();
    let result = stdout_json(taskr(&config_in(&dir)).args(["sync", "auto", "--json"]));
    assert_eq!(result, serde_json::json!({}));
}

#[test]
fn test_bash_completions() {
    let dir = TempDir::new().unwrap();
    let output = taskr(&config_in(&dir))
        .args(["completions", "bash"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("taskr"));
}

#[test]
fn test_sync_reminders_help_warns_about_status_import() {
    let dir = TempDir::new().unwrap();
    let output = taskr(&config_in(&dir))
        .args(["sync", "reminders", "--help"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    assert!(help.contains("goes back to pending"));
    assert!(help.contains("--no-import"));
}

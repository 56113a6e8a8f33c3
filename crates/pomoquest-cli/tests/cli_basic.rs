//! Basic CLI E2E tests.
//!
//! Each test drives the built binary against its own temporary data directory.

use std::path::Path;
use std::process::Command;

use pomoquest_core::{Database, SnapshotStore};
use serde_json::Value;
use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_pomoquest"))
        .args(args)
        .env("POMOQUEST_DATA_DIR", dir)
        .env_remove("POMOQUEST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Run a command that must succeed and parse its stdout as JSON.
fn run_json(dir: &Path, args: &[&str]) -> Value {
    let (stdout, stderr, code) = run_cli(dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("{args:?} printed non-JSON ({e}): {stdout}"))
}

fn event_types(outcome: &Value) -> Vec<String> {
    outcome["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["type"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn fresh_status_shows_defaults() {
    let dir = TempDir::new().unwrap();
    let status = run_json(dir.path(), &["status"]);
    assert_eq!(status["remaining_secs"], 1500);
    assert_eq!(status["clock"], "25:00");
    assert_eq!(status["phase"], "work");
    assert_eq!(status["rank"], "Time Novice");
    assert_eq!(status["level"], 1);
    assert_eq!(status["session_number"], 1);
    assert_eq!(status["total_sessions"], 4);
}

#[test]
fn ticking_through_a_session_scores_fifty() {
    let dir = TempDir::new().unwrap();
    let outcome = run_json(dir.path(), &["tick", "1500"]);
    assert!(event_types(&outcome).contains(&"SessionEnded".to_string()));
    assert_eq!(outcome["status"]["points"], 50);
    assert_eq!(outcome["status"]["phase"], "break");
    assert_eq!(outcome["status"]["remaining_secs"], 300);
    assert_eq!(outcome["status"]["is_running"], false);

    let status = run_json(dir.path(), &["status"]);
    assert_eq!(status["points"], 50);
    assert_eq!(status["streak"], 1);
    assert_eq!(status["session_number"], 2);
}

#[test]
fn partial_ticks_persist_remaining_time() {
    let dir = TempDir::new().unwrap();
    run_json(dir.path(), &["tick", "100"]);
    let status = run_json(dir.path(), &["status"]);
    assert_eq!(status["remaining_secs"], 1400);
    assert_eq!(status["clock"], "23:20");
}

#[test]
fn tick_zero_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let outcome = run_json(dir.path(), &["tick", "0"]);
    assert!(event_types(&outcome).is_empty());
    assert_eq!(outcome["status"]["remaining_secs"], 1500);
}

/// Overwrite one stored field after the first command has created the store.
fn store_field(dir: &Path, key: &str, json: &str) {
    run_json(dir, &["status"]);
    let mut db = Database::open_at(&dir.join("pomoquest.db")).unwrap();
    db.set(key, json).unwrap();
}

#[test]
fn run_counts_down_in_real_time_until_the_phase_ends() {
    let dir = TempDir::new().unwrap();
    store_field(dir.path(), "time", "2");

    let (stdout, stderr, code) = run_cli(dir.path(), &["run"]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stderr.contains("Pomodoro Timer 00:01"), "stderr: {stderr}");

    let outcome: Value = serde_json::from_str(&stdout).unwrap();
    let types = event_types(&outcome);
    assert_eq!(types.first().map(String::as_str), Some("TimerStarted"));
    assert!(types.contains(&"SessionEnded".to_string()));
    assert_eq!(outcome["status"]["phase"], "break");
    assert_eq!(outcome["status"]["is_running"], false);

    let status = run_json(dir.path(), &["status"]);
    assert_eq!(status["points"], 50);
    assert_eq!(status["remaining_secs"], 300);
}

#[test]
fn snapshot_left_at_zero_finishes_its_phase() {
    let dir = TempDir::new().unwrap();
    store_field(dir.path(), "time", "0");

    let status = run_json(dir.path(), &["status"]);
    assert_eq!(status["phase"], "break");
    assert_eq!(status["remaining_secs"], 300);
    assert_eq!(status["points"], 50);

    let outcome = run_json(dir.path(), &["tick", "300"]);
    assert!(event_types(&outcome).contains(&"BreakEnded".to_string()));
    assert_eq!(outcome["status"]["points"], 60);
}

#[test]
fn set_durations_and_reject_out_of_range() {
    let dir = TempDir::new().unwrap();
    let outcome = run_json(dir.path(), &["set", "session", "10"]);
    assert_eq!(outcome["status"]["remaining_secs"], 600);

    let (_, stderr, code) = run_cli(dir.path(), &["set", "session", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"), "stderr: {stderr}");

    let (_, _, code) = run_cli(dir.path(), &["set", "break", "45"]);
    assert_eq!(code, 1);

    let status = run_json(dir.path(), &["status"]);
    assert_eq!(status["session_length_min"], 10);
    assert_eq!(status["break_length_min"], 5);
}

#[test]
fn task_lifecycle() {
    let dir = TempDir::new().unwrap();
    let outcome = run_json(dir.path(), &["task", "add", "Write", "report"]);
    assert_eq!(event_types(&outcome), vec!["TaskAdded"]);

    let tasks = run_json(dir.path(), &["task", "list"]);
    let task = &tasks[0];
    assert_eq!(task["name"], "Write report");
    let id = task["id"].as_i64().unwrap().to_string();

    let outcome = run_json(dir.path(), &["task", "activate", &id]);
    assert_eq!(outcome["status"]["active_task"]["name"], "Write report");

    run_json(dir.path(), &["tick", "30"]);
    let tasks = run_json(dir.path(), &["task", "list"]);
    assert_eq!(tasks[0]["elapsedTime"], 30);

    let outcome = run_json(dir.path(), &["task", "complete", &id]);
    assert_eq!(outcome["status"]["points"], 25);

    let (_, stderr, code) = run_cli(dir.path(), &["task", "complete", "12345"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Task not found"));
}

#[test]
fn preset_tasks_are_added_once() {
    let dir = TempDir::new().unwrap();
    run_json(dir.path(), &["task", "preset", "Meditate"]);
    let second = run_json(dir.path(), &["task", "preset", "Meditate"]);
    assert!(event_types(&second).is_empty());

    let presets = run_json(dir.path(), &["task", "preset"]);
    let meditate = presets
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == "Meditate")
        .unwrap();
    assert_eq!(meditate["added"], true);

    let (_, _, code) = run_cli(dir.path(), &["task", "preset", "Juggle"]);
    assert_eq!(code, 1);
}

#[test]
fn reset_keeps_history() {
    let dir = TempDir::new().unwrap();
    run_json(dir.path(), &["task", "add", "Plan"]);
    run_json(dir.path(), &["tick", "1500"]);

    let outcome = run_json(dir.path(), &["reset"]);
    assert_eq!(outcome["status"]["points"], 0);
    assert_eq!(outcome["status"]["phase"], "work");

    let tasks = run_json(dir.path(), &["task", "list"]);
    assert_eq!(tasks.as_array().unwrap().len(), 0);

    let history = run_json(dir.path(), &["history", "list"]);
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["duration"], 25);

    let summary = run_json(dir.path(), &["history", "summary"]);
    assert_eq!(summary["total_sessions"], 1);
    assert_eq!(summary["total_focus_min"], 25);
}

#[test]
fn progress_reports_next_thresholds() {
    let dir = TempDir::new().unwrap();
    let progress = run_json(dir.path(), &["progress"]);
    assert_eq!(progress["next_level_at"], 100);
    assert_eq!(progress["next_rank"], "Focus Apprentice");
    assert_eq!(progress["next_rank_at"], 100);
}

#[test]
fn corrupt_snapshot_field_falls_back_to_default() {
    let dir = TempDir::new().unwrap();
    run_json(dir.path(), &["tick", "1500"]);
    store_field(dir.path(), "points", "\"not a number\"");
    let status = run_json(dir.path(), &["status"]);
    assert_eq!(status["points"], 0);
    assert_eq!(status["streak"], 1);
}

#[test]
fn notification_permission_round_trip() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["notifications", "status"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "not-asked");

    run_cli(dir.path(), &["notifications", "grant"]);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "notifications.permission"]);
    assert_eq!(stdout.trim(), "granted");

    run_cli(dir.path(), &["config", "set", "notifications.bell", "false"]);
    let (_, stderr, code) = run_cli(dir.path(), &["tick", "1500"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("[Session ended] Time for a break!"), "stderr: {stderr}");
}

#[test]
fn denied_notifications_stay_silent() {
    let dir = TempDir::new().unwrap();
    run_cli(dir.path(), &["notifications", "deny"]);
    let (_, stderr, code) = run_cli(dir.path(), &["tick", "1500"]);
    assert_eq!(code, 0);
    assert!(!stderr.contains("Session ended"), "stderr: {stderr}");
}

#[test]
fn config_commands() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "timer.session_length"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "25");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "timer.session_length", "50"]);
    assert_eq!(code, 0);
    // A fresh data dir picks up the configured length.
    let status = run_json(dir.path(), &["status"]);
    assert_eq!(status["remaining_secs"], 3000);

    let (_, _, code) = run_cli(dir.path(), &["config", "get", "timer.nope"]);
    assert_eq!(code, 1);

    let list = run_json(dir.path(), &["config", "list"]);
    assert_eq!(list["timer"]["session_length"], 50);

    let (_, _, code) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "timer.session_length"]);
    assert_eq!(stdout.trim(), "25");
}

#[test]
fn completions_are_generated() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("pomoquest"));
}

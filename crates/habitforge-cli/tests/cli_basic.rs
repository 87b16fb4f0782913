//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own data directory.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    run_cli_with_input(data_dir, args, "")
}

fn run_cli_with_input(data_dir: &Path, args: &[&str], input: &str) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_habitforge"))
        .args(args)
        .env("HABITFORGE_DATA_DIR", data_dir)
        .env_remove("HABITFORGE_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

/// Create a habit and return its id.
fn add_habit(data_dir: &Path, name: &str) -> String {
    let (code, stdout, stderr) = run_cli(data_dir, &["habit", "add", name]);
    assert_eq!(code, 0, "habit add failed: {stderr}");
    let first = stdout.lines().next().unwrap();
    first
        .strip_prefix("Habit created: ")
        .expect("missing created line")
        .to_string()
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("stdout is not JSON")
}

#[test]
fn test_habit_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_habit(dir.path(), "Read 10 pages");

    let (code, stdout, _) = run_cli(dir.path(), &["habit", "list"]);
    assert_eq!(code, 0);
    let habits = json(&stdout);
    assert_eq!(habits.as_array().unwrap().len(), 1);
    assert_eq!(habits[0]["id"].to_string(), id);
    assert_eq!(habits[0]["name"], "Read 10 pages");
    assert_eq!(habits[0]["progress"]["goal"], 66);
    assert_eq!(habits[0]["current_streak"], 0);
}

#[test]
fn test_habit_add_rejects_blank_name() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["habit", "add", "   "]);
    assert_eq!(code, 1);
    assert!(stderr.contains("habit name"));
}

#[test]
fn test_done_marks_today() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_habit(dir.path(), "Stretch");

    let (code, stdout, _) = run_cli(dir.path(), &["habit", "done", &id]);
    assert_eq!(code, 0);
    assert!(stdout.contains("day 1: done"));
    assert!(stdout.contains("1/66"));

    let (code, stdout, _) = run_cli(dir.path(), &["today", "--json"]);
    assert_eq!(code, 0);
    let tasks = json(&stdout);
    assert_eq!(tasks["day"], "today");
    assert_eq!(tasks["completed"], 1);
    assert_eq!(tasks["tasks"][0]["completed"], true);

    let (_, stdout, _) = run_cli(dir.path(), &["score"]);
    assert_eq!(json(&stdout)["total"], 100);
}

#[test]
fn test_tomorrow_is_preview_only() {
    let dir = tempfile::tempdir().unwrap();
    add_habit(dir.path(), "Stretch");

    let (code, stdout, _) = run_cli(dir.path(), &["tomorrow", "--json"]);
    assert_eq!(code, 0);
    let tasks = json(&stdout);
    assert_eq!(tasks["tasks"][0]["target_day"], 2);
    assert_eq!(tasks["tasks"][0]["toggleable"], false);
}

#[test]
fn test_toggle_rejects_day_zero() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_habit(dir.path(), "Stretch");
    let (code, _, stderr) = run_cli(dir.path(), &["habit", "toggle", &id, "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid day number 0"));
}

#[test]
fn test_delete_asks_for_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_habit(dir.path(), "Journal");

    let (code, stdout, _) = run_cli_with_input(dir.path(), &["habit", "delete", &id], "n\n");
    assert_eq!(code, 0);
    assert!(stdout.contains("cancelled"));

    let (code, stdout, _) = run_cli(dir.path(), &["habit", "delete", &id, "--yes"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Habit deleted"));

    let (_, stdout, _) = run_cli(dir.path(), &["habit", "list"]);
    assert!(json(&stdout).as_array().unwrap().is_empty());
}

#[test]
fn test_delete_unknown_habit() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["habit", "delete", "42", "--yes"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_reflection_requires_a_field() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["reflect", "add"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("at least one field"));

    let (code, stdout, _) = run_cli(
        dir.path(),
        &["reflect", "add", "--worked", "early mornings"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("Reflection saved"));

    let (_, stdout, _) = run_cli(dir.path(), &["reflect", "list"]);
    assert!(stdout.contains("What worked: early mornings"));
    assert!(!stdout.contains("What didn't"));

    let (_, stdout, _) = run_cli(dir.path(), &["reflect", "list", "--json"]);
    let list = json(&stdout);
    assert_eq!(list[0]["worked"], "early mornings");
    assert_eq!(list[0]["didnt"], "");

    let (_, stdout, _) = run_cli(dir.path(), &["reflect", "check"]);
    assert!(stdout.starts_with("not due"));
}

#[test]
fn test_config_default_goal_applies_to_new_habits() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["config", "set", "habits.default_goal", "30"]);
    assert_eq!(code, 0);

    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "habits.default_goal"]);
    assert_eq!(stdout.trim(), "30");

    add_habit(dir.path(), "Walk");
    let (_, stdout, _) = run_cli(dir.path(), &["habit", "list"]);
    assert_eq!(json(&stdout)[0]["progress"]["goal"], 30);
}

#[test]
fn test_config_rejects_zero_default_goal() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "habits.default_goal", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("habits.default_goal"));

    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "habits.default_goal"]);
    assert_eq!(stdout.trim(), "66");
}

#[test]
fn test_config_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
}

#[test]
fn test_history_brackets_only_today() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_habit(dir.path(), "Stretch");
    let (code, stdout, _) = run_cli(dir.path(), &["habit", "history", &id]);
    assert_eq!(code, 0);
    assert_eq!(stdout.matches('[').count(), 1);
}

#[test]
fn test_milestone_left_from_earlier_run_is_announced() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_habit(dir.path(), "Meditate");
    for day in (1..=14).chain(16..=30) {
        let (code, _, stderr) = run_cli(dir.path(), &["habit", "toggle", &id, &day.to_string()]);
        assert_eq!(code, 0, "toggle {day} failed: {stderr}");
    }

    // Closing the gap crosses 21 and 30 at once; only the higher one shows now
    let (_, stdout, _) = run_cli(dir.path(), &["habit", "toggle", &id, "15"]);
    assert!(stdout.contains("30 days. This is discipline."));
    assert!(!stdout.contains("21 days"));

    // The next run picks up 21 at startup and says so
    let (code, stdout, stderr) = run_cli(dir.path(), &["today", "--json"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("Milestone reached for Meditate: 21 days. The pattern is forming."));
    json(&stdout);

    let (_, stdout, _) = run_cli(dir.path(), &["milestone", "check"]);
    assert_eq!(stdout.trim(), "no new milestone");

    let (_, stdout, _) = run_cli(dir.path(), &["milestone", "list"]);
    assert_eq!(json(&stdout)[format!("habit-{id}")], serde_json::json!([7, 30, 21]));
}

#[test]
fn test_milestone_check_reports_pending_milestone() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_habit(dir.path(), "Meditate");
    for day in (1..=6).chain(8..=21) {
        run_cli(dir.path(), &["habit", "toggle", &id, &day.to_string()]);
    }
    let (_, stdout, _) = run_cli(dir.path(), &["habit", "toggle", &id, "7"]);
    assert!(stdout.contains("21 days. The pattern is forming."));

    let (code, stdout, stderr) = run_cli(dir.path(), &["milestone", "check"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("7 days. Most people quit before this."));
    assert!(!stderr.contains("Milestone reached"));
}

#[test]
fn test_milestone_thresholds() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["milestone", "thresholds"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.lines().count(), 5);
    assert!(stdout.contains("365 days"));
}

#[test]
fn test_help() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("habit"));
    assert!(stdout.contains("reflect"));
}

#[test]
fn test_completions() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("habitforge"));
}

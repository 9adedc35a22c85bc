//! Integration tests for the calispro binary.
//!
//! These tests verify end-to-end behavior including:
//! - Workout generation and plan persistence
//! - Workout logging and entry parsing
//! - Readiness, stage, and unlock-key reporting

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI with config isolated from the host machine
fn cli(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("calispro"));
    cmd.env("HOME", home);
    cmd.env("XDG_CONFIG_HOME", home.join(".config"));
    cmd.env("XDG_DATA_HOME", home.join(".local/share"));
    cmd
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Calisthenics progression and workout generation",
        ));
}

#[test]
fn test_plan_dry_run_does_not_save() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    cli(temp_dir.path())
        .arg("plan")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--dry-run")
        .arg("--seed")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));

    assert!(!data_dir.join("plans.jsonl").exists());
}

#[test]
fn test_plan_saves_plan_record() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    cli(temp_dir.path())
        .arg("plan")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--seed")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan saved"));

    let contents = std::fs::read_to_string(data_dir.join("plans.jsonl")).unwrap();
    assert!(contents.contains("readiness_score"));
}

#[test]
fn test_plan_with_level_override() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    cli(temp_dir.path())
        .arg("plan")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--level")
        .arg("advanced")
        .arg("--dry-run")
        .arg("--seed")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Strength focus"));
}

#[test]
fn test_log_writes_workout_record() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    cli(temp_dir.path())
        .arg("log")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--date")
        .arg("2026-03-01")
        .arg("push_up=12:3:met")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout logged"));

    let contents = std::fs::read_to_string(data_dir.join("workouts.jsonl")).unwrap();
    assert!(contents.contains("push_up"));
    assert!(contents.contains("completed"));
}

#[test]
fn test_log_skipped_day() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    cli(temp_dir.path())
        .arg("log")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--date")
        .arg("2026-03-01")
        .arg("--skipped")
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped day recorded"));

    let contents = std::fs::read_to_string(data_dir.join("workouts.jsonl")).unwrap();
    assert!(contents.contains("skipped"));
}

#[test]
fn test_log_rejects_malformed_entry() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    cli(temp_dir.path())
        .arg("log")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("push_up")
        .assert()
        .failure();

    assert!(!data_dir.join("workouts.jsonl").exists());
}

#[test]
fn test_readiness_reflects_mastery() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    // Two qualifying push_up sessions -> mastered -> push sub-score 40,
    // total 40 * 0.20 = 8 (the sessions are outside the bonus window).
    for date in ["2026-03-01", "2026-03-02"] {
        cli(temp_dir.path())
            .arg("log")
            .arg("--data-dir")
            .arg(&data_dir)
            .arg("--date")
            .arg(date)
            .arg("push_up=15:3:met")
            .assert()
            .success();
    }

    cli(temp_dir.path())
        .arg("readiness")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--date")
        .arg("2026-03-20")
        .assert()
        .success()
        .stdout(predicate::str::contains("8 / 100"));
}

#[test]
fn test_readiness_empty_history_is_zero() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    cli(temp_dir.path())
        .arg("readiness")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 / 100"));
}

#[test]
fn test_stage_unlocks_after_prerequisite_mastered() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    // Fresh user: the wall handstand is gated behind the pike push-up
    cli(temp_dir.path())
        .arg("stage")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("handstand")
        .assert()
        .success()
        .stdout(predicate::str::contains("no open rung"));

    for date in ["2026-03-01", "2026-03-03"] {
        cli(temp_dir.path())
            .arg("log")
            .arg("--data-dir")
            .arg(&data_dir)
            .arg("--date")
            .arg(date)
            .arg("pike_push_up=12:2:met")
            .assert()
            .success();
    }

    cli(temp_dir.path())
        .arg("stage")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("handstand")
        .assert()
        .success()
        .stdout(predicate::str::contains("wall_handstand_hold"));
}

#[test]
fn test_stage_without_skill_lists_all_ladders() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    cli(temp_dir.path())
        .arg("stage")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("handstand")
                .and(predicate::str::contains("l_sit"))
                .and(predicate::str::contains("front_lever")),
        );
}

#[test]
fn test_unlock_keys_ranked_output() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    cli(temp_dir.path())
        .arg("unlock-keys")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("pull_up"));
}

#[test]
fn test_seeded_plans_are_reproducible() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    let run = || {
        cli(temp_dir.path())
            .arg("plan")
            .arg("--data-dir")
            .arg(&data_dir)
            .arg("--skill")
            .arg("handstand")
            .arg("--dry-run")
            .arg("--seed")
            .arg("42")
            .output()
            .unwrap()
    };

    let first = run();
    let second = run();
    assert_eq!(first.stdout, second.stdout);
}

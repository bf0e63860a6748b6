//! Corruption recovery tests for kcal.
//!
//! These tests verify the system can handle:
//! - Corrupted profile files
//! - Corrupted meal log lines
//! - Malformed food tables

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write as IoWrite;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("kcal"))
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

#[test]
fn test_corrupted_profile_is_replaced() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let profile_path = data_dir.join("profile.json");
    fs::write(&profile_path, "{ invalid json }}}}").expect("Failed to write corrupted profile");

    // Unreadable profile behaves like a missing one
    cli()
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("summary")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no profile yet"));

    cli()
        .arg("--data-dir")
        .arg(&data_dir)
        .args([
            "profile", "set", "--gender", "female", "--age", "25", "--weight", "60", "--height",
            "165", "--activity", "1.375",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Daily target: 1850 kcal"));

    let contents = fs::read_to_string(&profile_path).unwrap();
    serde_json::from_str::<serde_json::Value>(&contents).expect("Profile should be valid JSON");
}

#[test]
fn test_corrupted_meal_log_lines_are_skipped() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("--data-dir")
        .arg(&data_dir)
        .args([
            "--date", "2024-05-01", "meal", "add", "--food", "porridge", "--grams", "300",
            "--kcal", "320", "--time", "08:00",
        ])
        .assert()
        .success();

    // Simulate a torn write at the end of the log
    let log_path = data_dir.join("meals.jsonl");
    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(&log_path)
        .unwrap();
    writeln!(file, "{{\"id\": \"truncated").unwrap();
    drop(file);

    cli()
        .arg("--data-dir")
        .arg(&data_dir)
        .args(["--date", "2024-05-01", "meal", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("porridge"));

    // New entries still append after the bad line
    cli()
        .arg("--data-dir")
        .arg(&data_dir)
        .args([
            "--date", "2024-05-01", "meal", "add", "--food", "apple", "--grams", "150", "--kcal",
            "80", "--time", "15:00",
        ])
        .assert()
        .success();

    cli()
        .arg("--data-dir")
        .arg(&data_dir)
        .args(["--date", "2024-05-01", "meal", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("porridge"))
        .stdout(predicate::str::contains("apple"));
}

#[test]
fn test_missing_data_dir_is_created() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("nested/kcal");

    cli()
        .arg("--data-dir")
        .arg(&data_dir)
        .args(["meal", "add", "--food", "tea", "--grams", "250", "--kcal", "2"])
        .assert()
        .success();

    assert!(data_dir.join("meals.jsonl").exists());
}

#[test]
fn test_malformed_food_table_is_an_error() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    fs::write(data_dir.join("foods.json"), "not json").unwrap();

    cli()
        .arg("--data-dir")
        .arg(&data_dir)
        .args(["meal", "add", "--food", "rice", "--grams", "100"])
        .assert()
        .failure();

    // Manual entry does not need the table
    cli()
        .arg("--data-dir")
        .arg(&data_dir)
        .args(["meal", "add", "--food", "rice", "--grams", "100", "--kcal", "130"])
        .assert()
        .success();
}

//! Concurrency tests for kcal.
//!
//! These tests verify that multiple processes can safely:
//! - Append to the meal log simultaneously (file locking)
//! - Read the profile while another process updates it
//! - Update the profile simultaneously without losing changes
//! - Remove meals while others are being appended

use assert_cmd::Command;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("kcal"))
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

#[test]
fn test_concurrent_meal_logging() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let handles: Vec<_> = (0..5)
        .map(|i| {
            let data_dir = data_dir.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(i * 5));
                cli()
                    .arg("--data-dir")
                    .arg(&data_dir)
                    .args(["--date", "2024-05-01", "meal", "add", "--food"])
                    .arg(format!("snack {}", i))
                    .args(["--grams", "100", "--kcal", "120"])
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    // Every append landed as its own line
    let log = std::fs::read_to_string(data_dir.join("meals.jsonl")).expect("Failed to read log");
    assert_eq!(log.lines().count(), 5);
    for line in log.lines() {
        serde_json::from_str::<serde_json::Value>(line).expect("Each line is valid JSON");
    }
}

#[test]
fn test_concurrent_reads_and_writes() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("--data-dir")
        .arg(&data_dir)
        .args([
            "profile", "set", "--gender", "male", "--age", "30", "--weight", "80", "--height",
            "180", "--activity", "1.2",
        ])
        .assert()
        .success();

    let reader_dir = data_dir.clone();
    let reader = thread::spawn(move || {
        for _ in 0..5 {
            cli()
                .arg("--data-dir")
                .arg(&reader_dir)
                .args(["--date", "2024-05-01", "summary"])
                .assert()
                .success();
        }
    });

    for _ in 0..5 {
        cli()
            .arg("--data-dir")
            .arg(&data_dir)
            .args(["--date", "2024-05-01", "water", "add", "100"])
            .assert()
            .success();
    }

    reader.join().expect("Reader panicked");

    let json = std::fs::read_to_string(data_dir.join("profile.json")).unwrap();
    let profile: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(profile["water_ml"], 500);
}

#[test]
fn test_concurrent_profile_updates_are_not_lost() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("--data-dir")
        .arg(&data_dir)
        .args([
            "profile", "set", "--gender", "female", "--age", "25", "--weight", "60", "--height",
            "165", "--activity", "1.375",
        ])
        .assert()
        .success();

    // Water adds race with meal logging, which records activity on the same file
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let data_dir = data_dir.clone();
            thread::spawn(move || {
                let mut cmd = cli();
                cmd.arg("--data-dir")
                    .arg(&data_dir)
                    .args(["--date", "2024-05-01"]);
                if i % 2 == 0 {
                    cmd.args(["water", "add", "250"]);
                } else {
                    cmd.args(["meal", "add", "--food", "pear", "--grams", "150", "--kcal", "85"]);
                }
                cmd.assert().success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let json = std::fs::read_to_string(data_dir.join("profile.json")).unwrap();
    let profile: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(profile["water_ml"], 1000);
    assert_eq!(profile["last_active_on"], "2024-05-01");
    assert_eq!(profile["daily_target_kcal"], 1850);
}

#[test]
fn test_meal_removal_races_with_appends() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let ids: Vec<String> = (0..5)
        .map(|i| {
            let output = cli()
                .arg("--data-dir")
                .arg(&data_dir)
                .args(["--date", "2024-05-01", "meal", "add", "--food"])
                .arg(format!("old {}", i))
                .args(["--grams", "100", "--kcal", "50"])
                .output()
                .expect("Failed to run meal add");
            assert!(output.status.success());
            String::from_utf8(output.stdout)
                .unwrap()
                .lines()
                .find_map(|line| line.trim().strip_prefix("id: ").map(str::to_string))
                .expect("meal id in output")
        })
        .collect();

    let remover_dir = data_dir.clone();
    let remover = thread::spawn(move || {
        for id in ids {
            cli()
                .arg("--data-dir")
                .arg(&remover_dir)
                .args(["meal", "rm"])
                .arg(id)
                .assert()
                .success();
        }
    });

    for i in 0..5 {
        cli()
            .arg("--data-dir")
            .arg(&data_dir)
            .args(["--date", "2024-05-01", "meal", "add", "--food"])
            .arg(format!("new {}", i))
            .args(["--grams", "100", "--kcal", "50"])
            .assert()
            .success();
    }

    remover.join().expect("Remover panicked");

    let log = std::fs::read_to_string(data_dir.join("meals.jsonl")).unwrap();
    let names: Vec<String> = log
        .lines()
        .map(|line| {
            let meal: serde_json::Value = serde_json::from_str(line).unwrap();
            meal["food_name"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(names.len(), 5);
    assert!(names.iter().all(|name| name.starts_with("new ")));
}

#![forbid(unsafe_code)]
#![cfg(feature = "serde")]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn cli(request: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("shiftplan-cli").unwrap();
    cmd.arg("--request").arg(request);
    cmd
}

#[test]
fn init_solve_and_check() {
    let dir = tempdir().unwrap();
    let request = dir.path().join("request.json");
    let grid = dir.path().join("grid.csv");
    let summary = dir.path().join("summary.csv");
    let roster = dir.path().join("roster.json");

    cli(&request)
        .args(["init", "--workers", "5", "--days", "7", "--requested", "4"])
        .args(["--special", "", "--start", "2025-09-01"])
        .assert()
        .success();

    cli(&request)
        .args(["set-requirement", "--weekdays", "all", "--count", "3"])
        .assert()
        .success();

    cli(&request)
        .args(["set-worker", "--worker", "Worker2", "--date-off", "1;2"])
        .assert()
        .success();

    cli(&request)
        .arg("solve")
        .arg("--out-csv")
        .arg(&grid)
        .arg("--summary-csv")
        .arg(&summary)
        .arg("--out-json")
        .arg(&roster)
        .assert()
        .success()
        .stdout(predicate::str::contains("headcount"))
        .stdout(predicate::str::contains("total deviation: 1"));

    let grid = fs::read_to_string(grid).unwrap();
    let lines: Vec<&str> = grid.lines().collect();
    assert_eq!(lines[0], "worker,Day1,Day2,Day3,Day4,Day5,Day6,Day7,workdays");
    assert_eq!(lines.len(), 7);
    assert!(lines[2].starts_with("Worker2,休,休,"));
    assert_eq!(lines[6], "headcount,3,3,3,3,3,3,3,21");

    let summary = fs::read_to_string(summary).unwrap();
    assert!(summary.starts_with("worker,requested,actual,delta"));
    assert_eq!(summary.lines().count(), 6);

    cli(&request)
        .arg("check")
        .arg("--roster-json")
        .arg(&roster)
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: no violations"));
}

#[test]
fn check_flags_a_tampered_roster() {
    let dir = tempdir().unwrap();
    let request = dir.path().join("request.json");
    let roster = dir.path().join("roster.json");
    let report = dir.path().join("violations.csv");

    cli(&request)
        .args(["init", "--workers", "3", "--days", "7", "--requested", "3"])
        .args(["--special", ""])
        .assert()
        .success();
    cli(&request)
        .args(["set-requirement", "--weekdays", "all", "--count", "1"])
        .assert()
        .success();
    cli(&request)
        .arg("solve")
        .arg("--out-json")
        .arg(&roster)
        .assert()
        .success();

    // le premier membre prend aussi le jour 1 de tout le monde
    let mut json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&roster).unwrap()).unwrap();
    for w in json["workers"].as_array_mut().unwrap() {
        w["cells"][0] = serde_json::Value::from("〇");
    }
    fs::write(&roster, serde_json::to_string(&json).unwrap()).unwrap();

    cli(&request)
        .arg("check")
        .arg("--roster-json")
        .arg(&roster)
        .arg("--report")
        .arg(&report)
        .assert()
        .code(2);
    let report = fs::read_to_string(report).unwrap();
    assert!(report.contains("headcount"));
}

#[test]
fn init_refuses_out_of_range_sizes() {
    let dir = tempdir().unwrap();
    let request = dir.path().join("request.json");
    cli(&request)
        .args(["init", "--workers", "2"])
        .assert()
        .failure();
    cli(&request)
        .args(["init", "--days", "32"])
        .assert()
        .failure();
}

#[test]
fn init_refuses_unknown_special_member() {
    let dir = tempdir().unwrap();
    let request = dir.path().join("request.json");
    cli(&request)
        .args(["init", "--workers", "3", "--special", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("special member 5"));
    assert!(!request.exists());
}

#[test]
fn check_flags_a_truncated_roster() {
    let dir = tempdir().unwrap();
    let request = dir.path().join("request.json");
    let roster = dir.path().join("roster.json");
    let report = dir.path().join("violations.csv");

    cli(&request)
        .args(["init", "--workers", "5", "--days", "7", "--requested", "4"])
        .args(["--special", ""])
        .assert()
        .success();
    cli(&request)
        .args(["set-requirement", "--weekdays", "all", "--count", "3"])
        .assert()
        .success();
    cli(&request)
        .arg("solve")
        .arg("--out-json")
        .arg(&roster)
        .assert()
        .success();

    // on ne garde que le premier jour
    let mut json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&roster).unwrap()).unwrap();
    for w in json["workers"].as_array_mut().unwrap() {
        w["cells"].as_array_mut().unwrap().truncate(1);
    }
    json["daily_headcount"].as_array_mut().unwrap().truncate(1);
    fs::write(&roster, serde_json::to_string(&json).unwrap()).unwrap();

    cli(&request)
        .arg("check")
        .arg("--roster-json")
        .arg(&roster)
        .arg("--report")
        .arg(&report)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("OK").not());
    let report = fs::read_to_string(report).unwrap();
    assert!(report.contains("shape"));
}

#[test]
fn infeasible_request_exits_with_warning_code() {
    let dir = tempdir().unwrap();
    let request = dir.path().join("request.json");
    cli(&request)
        .args(["init", "--workers", "3", "--days", "7", "--requested", "5"])
        .args(["--special", ""])
        .assert()
        .success();
    // 3 présents chaque jour : chacun travaillerait 7 jours d'affilée
    cli(&request)
        .args(["set-requirement", "--weekdays", "all", "--count", "3"])
        .assert()
        .success();
    cli(&request)
        .arg("solve")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No roster"));
}

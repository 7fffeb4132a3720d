use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

const AT: &str = "2026-02-18 14:30:00";

fn reltime() -> Command {
    let mut cmd = Command::cargo_bin("reltime").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_minutes_from_now() {
    reltime()
        .args(["--at", AT, "in", "5", "minutes"])
        .assert()
        .success()
        .stdout("2026-02-18 14:35:00\t2\n");
}

#[test]
fn test_quoted_phrase() {
    reltime()
        .args(["--at", AT, "5 minutes ago"])
        .assert()
        .success()
        .stdout("2026-02-18 14:25:00\t2\n");
}

#[test]
fn test_tomorrow_anchors_to_nine() {
    reltime()
        .args(["--at", AT, "tomorrow"])
        .assert()
        .success()
        .stdout("2026-02-19 09:00:00\t1\n");
}

#[test]
fn test_no_match_is_success() {
    reltime()
        .args(["--at", AT, "whenever"])
        .assert()
        .success()
        .stdout("2026-02-18 14:30:00\t0\n");
}

#[test]
fn test_json_output() {
    let output = reltime()
        .args(["--at", AT, "--json", "1 week from now"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["flag"], 3);
    assert_eq!(json["rule"], "days relative");
    assert_eq!(json["instant"]["day"], 25);
    assert_eq!(json["instant"]["hour"], 14);
    assert_eq!(json["instant"]["is_dst"], -1);
}

#[test]
fn test_json_now_keeps_dst_flag() {
    let output = reltime()
        .args([
            "--at",
            "2026-07-15T12:00:00Z",
            "--tz",
            "America/New_York",
            "--json",
            "now",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["flag"], 2);
    assert_eq!(json["instant"]["hour"], 8);
    assert_eq!(json["instant"]["is_dst"], 1);
}

#[test]
fn test_without_at_uses_clock() {
    reltime()
        .args(["now"])
        .assert()
        .success()
        .stdout(predicate::str::ends_with("\t2\n"));
}

#[test]
fn test_invalid_reference() {
    reltime()
        .args(["--at", "2026-02-30 10:00:00", "now"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid reference"));
}

#[test]
fn test_invalid_timezone() {
    reltime()
        .args(["--tz", "Invalid/Zone", "now"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid time zone"));
}

#[test]
fn test_overflow_is_an_error() {
    reltime()
        .args(["--at", AT, "in 99999999999999999999999 minutes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Overflow"));
}

#[test]
fn test_missing_phrase() {
    reltime().assert().failure();
}

#[test]
fn test_config_file() {
    let path: PathBuf =
        std::env::temp_dir().join(format!("reltime-config-{}.json", std::process::id()));
    fs::write(
        &path,
        r#"{"anchor_time": "07:45:00", "numerals": {"dozen": 12}}"#,
    )
    .unwrap();

    reltime()
        .arg("--config")
        .arg(&path)
        .args(["--at", AT, "today"])
        .assert()
        .success()
        .stdout("2026-02-18 07:45:00\t1\n");

    reltime()
        .arg("--config")
        .arg(&path)
        .args(["--at", AT, "in dozen days"])
        .assert()
        .success()
        .stdout("2026-03-02 14:30:00\t1\n");

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_bad_config_file() {
    reltime()
        .args(["--config", "/nonexistent/reltime.json", "now"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read config"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    reltime()
        .args(["-v", "--at", AT, "in 2 days"])
        .assert()
        .success()
        .stdout("2026-02-20 14:30:00\t1\n")
        .stderr(predicate::str::contains("rule matched"));
}

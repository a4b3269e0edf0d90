use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use tempfile::tempdir;

mod common;
use common::{cb, cb_config};

#[test]
fn test_clock_in_and_out_via_cli() {
    let dir = tempdir().unwrap();

    cb(dir.path())
        .args(["clock-in", "--user", "111", "--name", "Ann"])
        .assert()
        .success()
        .stdout(contains("CLOCKED IN"));

    cb(dir.path())
        .args(["status", "--user", "111"])
        .assert()
        .success()
        .stdout(contains("Clocked in"));

    cb(dir.path())
        .args(["clock-out", "--user", "111"])
        .assert()
        .success()
        .stdout(contains("CLOCKED OUT"));

    let raw = fs::read_to_string(dir.path().join("timesheet.json")).unwrap();
    assert!(raw.contains("\"displayName\": \"Ann\""));
    assert!(!raw.contains("\"active\""));
}

#[test]
fn test_double_clock_in_fails() {
    let dir = tempdir().unwrap();

    cb(dir.path())
        .args(["clock-in", "--user", "111"])
        .assert()
        .success();

    cb(dir.path())
        .args(["clock-in", "--user", "111"])
        .assert()
        .failure()
        .stderr(contains("❌ You are already clocked in.").and(contains("Error:").not()));
}

#[test]
fn test_clock_out_without_session_fails() {
    let dir = tempdir().unwrap();

    cb(dir.path())
        .args(["clock-out", "--user", "111"])
        .assert()
        .failure()
        .stderr(contains("Not clocked in"));
}

#[test]
fn test_force_clock_out_is_idempotent() {
    let dir = tempdir().unwrap();

    cb(dir.path())
        .args(["force-clock-out", "--user", "111"])
        .assert()
        .success()
        .stdout(contains("was not clocked in"));

    cb(dir.path())
        .args(["clock-in", "--user", "111"])
        .assert()
        .success();

    cb(dir.path())
        .args(["force-clock-out", "--user", "111", "--reason", "end of shift"])
        .assert()
        .success()
        .stdout(contains("clocked out").and(contains("was not").not()));
}

#[test]
fn test_timesheet_view_lists_sessions_in_range() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("timesheet.json"),
        r#"{
  "111": {
    "version": 2,
    "userId": "111",
    "displayName": "Ann",
    "logs": [
      { "start": "2024-01-01T00:00:00Z", "end": "2024-01-01T02:30:00Z", "hours": 2.5 },
      { "start": "2024-01-02T10:00:00Z", "end": "2024-01-02T11:00:00Z", "hours": 1.0 }
    ]
  }
}"#,
    )
    .unwrap();

    cb(dir.path())
        .args([
            "timesheet", "view", "--user", "111", "--start", "01/01/2024", "--end", "01/01/2024",
        ])
        .assert()
        .success()
        .stdout(
            contains("Ann")
                .and(contains("January 1, 2024, 00:00 - 02:30 UTC"))
                .and(contains("Total: 2.50h"))
                .and(contains("January 2").not()),
        );

    cb(dir.path())
        .args(["total"])
        .assert()
        .success()
        .stdout(contains("3.50h"));
}

#[test]
fn test_timesheet_view_rejects_inverted_range() {
    let dir = tempdir().unwrap();

    cb(dir.path())
        .args([
            "timesheet", "view", "--user", "111", "--start", "2024-01-05", "--end", "2024-01-01",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid date range"));
}

#[test]
fn test_timesheet_reset_moves_to_history() {
    let dir = tempdir().unwrap();

    cb(dir.path())
        .args(["clock-in", "--user", "111", "--name", "Ann"])
        .assert()
        .success();
    cb(dir.path())
        .args(["clock-out", "--user", "111"])
        .assert()
        .success();

    cb(dir.path())
        .args(["timesheet", "reset"])
        .assert()
        .success()
        .stdout(contains("Archived 1 session(s) from 1 user(s)"));

    let live = fs::read_to_string(dir.path().join("timesheet.json")).unwrap();
    assert_eq!(live.trim(), "{}");

    let history = fs::read_to_string(dir.path().join("timesheetHistory.json")).unwrap();
    assert!(history.contains("\"111\""));
}

#[test]
fn test_init_and_config_print() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");

    cb_config(dir.path())
        .args(["--data-dir", data.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(contains("initialization completed"));

    assert!(dir.path().join("clockbot.conf").exists());
    assert!(data.is_dir());

    cb_config(dir.path())
        .args(["config", "--print"])
        .assert()
        .success()
        .stdout(
            contains("warn_after_secs: 150")
                .and(contains("kick_after_secs: 300"))
                .and(contains("data")),
        );
}

#[test]
fn test_enabled_mirror_without_token_fails_at_startup() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("clockbot.conf"),
        "mirror:\n  enabled: true\n  owner: acme\n  repo: hours\n  token_env: CLOCKBOT_TEST_MISSING_TOKEN\n",
    )
    .unwrap();

    cb(dir.path())
        .env_remove("CLOCKBOT_TEST_MISSING_TOKEN")
        .args(["status", "--user", "111"])
        .assert()
        .failure()
        .stderr(
            contains("Error:")
                .and(contains("Missing credential"))
                .and(contains("CLOCKBOT_TEST_MISSING_TOKEN")),
        );
}

#[test]
fn test_serve_answers_commands_on_stdout() {
    let dir = tempdir().unwrap();
    let input = concat!(
        r#"{"type":"command","interactionId":"1","user":{"id":"111","displayName":"Ann"},"command":{"name":"clockin"}}"#,
        "\n",
    );

    // No voice roster entry yet: clock-in is refused.
    cb(dir.path())
        .arg("serve")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains(r#""interactionId":"1""#).and(contains("voice channel")));
}

#[test]
fn test_serve_accepts_voice_channel_reported_with_command() {
    let dir = tempdir().unwrap();
    let input = concat!(
        r#"{"type":"command","interactionId":"1","user":{"id":"111","displayName":"Ann"},"voiceChannel":"general","command":{"name":"clockin"}}"#,
        "\n",
    );

    cb(dir.path())
        .arg("serve")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains(r#""ok":true"#).and(contains("CLOCKED IN")));

    let raw = fs::read_to_string(dir.path().join("timesheet.json")).unwrap();
    assert!(raw.contains("\"active\""));
}

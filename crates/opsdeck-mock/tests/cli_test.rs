//! Integration tests for the `opsdeck-mock` binary.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command with config isolation so tests never read a real config.
fn mock_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("opsdeck-mock");
    cmd.env("HOME", "/tmp/opsdeck-mock-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/opsdeck-mock-test-nonexistent")
        .env_remove("OPSDECK_MOCK_BIND")
        .env_remove("OPSDECK_MOCK__FIXTURE_COUNT");
    cmd
}

fn fixtures_json(args: &[&str]) -> serde_json::Value {
    let output = mock_cmd()
        .arg("fixtures")
        .args(["--anchor", "2024-06-01"])
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    mock_cmd()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_fixtures_limit() {
    let users = fixtures_json(&["--env", "staging", "--limit", "3"]);
    assert_eq!(users.as_array().unwrap().len(), 3);
    assert!(users[0].get("firstName").is_some());
}

#[test]
fn test_fixtures_are_deterministic() {
    let a = fixtures_json(&["--kind", "cron-jobs", "--count", "5"]);
    let b = fixtures_json(&["--kind", "cron-jobs", "--count", "5"]);
    assert_eq!(a, b);
    assert_eq!(a.as_array().unwrap().len(), 5);
}

#[test]
fn test_fixtures_rejects_unknown_env() {
    mock_cmd()
        .args(["fixtures", "--env", "qa"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

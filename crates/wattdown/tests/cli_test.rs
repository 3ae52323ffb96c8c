//! Integration tests for the `wattdown` binary.
//!
//! Validate argument parsing, help output, shell completions, config
//! handling, and startup error codes -- all without a live backend.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `wattdown` binary with env isolation.
///
/// Clears all `WATTDOWN_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration
/// or keyring.
fn wattdown_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("wattdown");
    cmd.env("HOME", "/tmp/wattdown-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/wattdown-cli-test-nonexistent")
        .env_remove("WATTDOWN_CONFIG")
        .env_remove("WATTDOWN_METRICS_PASSWORD")
        .env_remove("WATTDOWN_METRICS_URL")
        .env_remove("WATTDOWN_DEVICE_PATTERN")
        .env_remove("WATTDOWN_DRY_RUN");
    cmd
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = wattdown_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    wattdown_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("standby")
            .and(predicate::str::contains("run"))
            .and(predicate::str::contains("check")),
    );
}

#[test]
fn test_version_flag() {
    wattdown_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wattdown"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    wattdown_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_path_respects_override() {
    wattdown_cmd()
        .args(["--config", "/tmp/custom-wattdown.toml", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/custom-wattdown.toml"));
}

#[test]
fn test_config_init_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let path_str = path.to_str().unwrap();

    wattdown_cmd()
        .args(["--config", path_str, "config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote starter config"));

    wattdown_cmd()
        .args(["--config", path_str, "config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("device_pattern")
                .and(predicate::str::contains("standby_duration")),
        );
}

// ── Startup errors ──────────────────────────────────────────────────

#[test]
fn test_check_without_password_exits_with_auth_code() {
    let output = wattdown_cmd().arg("check").output().unwrap();
    assert_eq!(output.status.code(), Some(3), "Expected auth exit code");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("password"),
        "Expected password hint in stderr:\n{stderr}"
    );
}

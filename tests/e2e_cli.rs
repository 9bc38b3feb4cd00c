//! CLI end-to-end tests
//!
//! Tests for the webmforge command-line interface. None of these need
//! ffmpeg: they stop before a tool would be spawned.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the webmforge binary
#[allow(deprecated)]
fn webmforge_cmd() -> Command {
    Command::cargo_bin("webmforge").unwrap()
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = webmforge_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = webmforge_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("webmforge"))
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("plan-scale"));
}

#[test]
fn test_cli_version_flag() {
    let mut cmd = webmforge_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("webmforge"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = webmforge_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_convert_help() {
    let mut cmd = webmforge_cmd();
    cmd.args(["convert", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--non-interactive"))
        .stdout(predicate::str::contains("--pause-on-error"));
}

#[test]
fn test_cli_check_tools_command() {
    let mut cmd = webmforge_cmd();
    cmd.arg("check-tools").assert().success().stdout(
        predicate::str::contains("ffmpeg").and(predicate::str::contains("ffprobe")),
    );
}

#[test]
fn test_cli_plan_scale_divides() {
    let mut cmd = webmforge_cmd();
    cmd.args(["plan-scale", "1600", "1200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/ 3 -> 533x400"));
}

#[test]
fn test_cli_plan_scale_in_range() {
    let mut cmd = webmforge_cmd();
    cmd.args(["plan-scale", "600", "600"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no resize needed"));
}

#[test]
fn test_cli_plan_scale_uses_config_range() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("webmforge.toml");
    fs::write(&config_file, "[image]\nmin_side = 100\nmax_side = 200\n").unwrap();

    let mut cmd = webmforge_cmd();
    cmd.args(["--config", config_file.to_str().unwrap()])
        .args(["plan-scale", "1600", "1200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/ 11 -> 145x109"));
}

#[test]
fn test_cli_validate_valid_config() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("webmforge.toml");
    fs::write(
        &config_file,
        r#"
[limits]
max_file_size = 8388608
min_bitrate = 64

[encoder]
timeout_secs = 0
"#,
    )
    .unwrap();

    let mut cmd = webmforge_cmd();
    cmd.args(["validate", config_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("8388608"));
}

#[test]
fn test_cli_validate_invalid_config() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("webmforge.toml");
    fs::write(&config_file, "[limits]\nmin_bitrate = 300\n").unwrap();

    let mut cmd = webmforge_cmd();
    cmd.args(["validate", config_file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("min_bitrate"));
}

#[test]
fn test_cli_validate_defaults() {
    let mut cmd = webmforge_cmd();
    cmd.arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("using defaults"))
        .stdout(predicate::str::contains("6291456"));
}

#[test]
fn test_cli_convert_requires_input() {
    let mut cmd = webmforge_cmd();
    cmd.arg("convert").assert().failure();
}

#[test]
fn test_cli_convert_too_many_inputs() {
    let mut cmd = webmforge_cmd();
    cmd.args(["convert", "a.flac", "b.jpg", "c.jpg", "--non-interactive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expected 1 or 2 input files, got 3"));
}

#[test]
fn test_cli_convert_no_audio_input() {
    let mut cmd = webmforge_cmd();
    cmd.args(["convert", "front.jpg", "back.png", "--non-interactive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("None of the inputs is an audio file"));
}

#[test]
fn test_cli_convert_nonexistent_file() {
    let mut cmd = webmforge_cmd();
    cmd.args(["convert", "/nonexistent/song.flac", "--non-interactive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_cli_convert_pauses_on_bad_config() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("webmforge.toml");
    fs::write(&config_file, "[limits]\nmin_bitrate = 300\n").unwrap();

    let mut cmd = webmforge_cmd();
    cmd.args(["--config", config_file.to_str().unwrap()])
        .args(["convert", "song.flac", "--pause-on-error"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("min_bitrate"))
        .stderr(predicate::str::contains("Press Enter to exit"));
}

#[test]
fn test_cli_probe_nonexistent_file() {
    let mut cmd = webmforge_cmd();
    cmd.args(["probe", "/nonexistent/song.flac"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

//! Tests for the `dlhub` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn dlhub() -> Command {
    let mut cmd = Command::cargo_bin("dlhub").unwrap();
    cmd.env_remove("DOWNLOAD_DIRECTORY")
        .env_remove("STATIC_DIRECTORY")
        .env_remove("DLHUB_LISTEN")
        .env_remove("DLHUB_LOG");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    dlhub()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_serve_help_lists_overrides() {
    dlhub()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--download-dir"))
        .stdout(predicate::str::contains("--listen"));
}

#[test]
fn test_check_succeeds_when_tools_exist() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("dlhub.toml");
    fs::write(&config, "[tools]\nyt_dlp = \"sh\"\nffmpeg = \"sh\"\n").unwrap();

    dlhub()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("yt-dlp"))
        .stdout(predicate::str::contains("ffmpeg"));
}

#[test]
fn test_check_fails_for_missing_tool() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(
        &config,
        "[tools]\nyt_dlp = \"sh\"\nffmpeg = \"dlhub-missing-ffmpeg\"\n",
    )
    .unwrap();

    dlhub()
        .arg("check")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stdout(predicate::str::contains("'dlhub-missing-ffmpeg' not found"));
}

#[test]
fn test_explicit_missing_config_is_an_error() {
    let dir = tempdir().unwrap();

    dlhub()
        .arg("check")
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn test_invalid_listen_flag_is_rejected() {
    let dir = tempdir().unwrap();

    dlhub()
        .current_dir(dir.path())
        .args(["serve", "--listen", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("listen address"));
}

//! Integration tests for the neopen binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use neopen::PageId;

use crate::helpers::{v1, v1_single_stroke, write_storage_file};

fn neopen() -> Command {
    let mut cmd = Command::cargo_bin("neopen").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// Help Output Tests
// ============================================================================

#[test]
fn help_lists_subcommands() {
    neopen()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract").and(predicate::str::contains("formats")));
}

#[test]
fn extract_requires_files() {
    neopen()
        .arg("extract")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<FILES>"));
}

#[test]
fn formats_lists_every_version() {
    neopen()
        .arg("formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 (legacy)").and(predicate::str::contains("1023")));
}

// ============================================================================
// Extract Tests
// ============================================================================

#[test]
fn extract_prints_pages_as_json() {
    let dir = TempDir::new().unwrap();
    let path = write_storage_file(
        dir.path(),
        551,
        1,
        1,
        &v1_single_stroke(PageId::new(3, 551, 1), 0, 4),
    );

    let output = neopen().arg("extract").arg(&path).output().unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    let page = &json["combined"]["pages"][0];
    assert_eq!(page["id"]["book_id"], 551);
    assert_eq!(page["strokes"][0]["dots"].as_array().unwrap().len(), 4);
    assert_eq!(json["files"][0]["warnings"].as_array().unwrap().len(), 0);
}

#[test]
fn fatal_file_sets_exit_status() {
    let dir = TempDir::new().unwrap();
    let good = write_storage_file(
        dir.path(),
        1,
        1,
        1,
        &v1_single_stroke(PageId::new(0, 1, 1), 0, 1),
    );
    let bad = dir.path().join("headerless.pen");
    std::fs::write(&bad, [0x03u8, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();

    let output = neopen()
        .arg("extract")
        .arg(&good)
        .arg(&bad)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("headerless.pen"));
    assert!(stderr.contains("no session header"));

    let json = stdout_json(&output);
    assert_eq!(json["combined"]["pages"].as_array().unwrap().len(), 1);
    assert_eq!(
        json["files"][1]["error"]["kind"],
        "unsupported_format_version"
    );
}

#[test]
fn warnings_are_reported_on_stderr() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stray.pen");
    std::fs::write(&path, v1().pen_up(0).finish()).unwrap();

    let output = neopen().arg("extract").arg(&path).output().unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning:"));
    assert!(stderr.contains("pen up without pen down"));
    let json = stdout_json(&output);
    assert_eq!(json["combined"]["warnings"][0]["kind"], "unmatched_pen_up");
}

#[test]
fn config_file_and_flags_are_applied() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("neopen.toml");
    std::fs::write(&config, "merge_pages_by_identity = false\n").unwrap();
    let page = PageId::new(0, 1, 1);
    let a = write_storage_file(dir.path(), 1, 1, 1, &v1_single_stroke(page, 0, 1));
    let b = write_storage_file(dir.path(), 1, 1, 2, &v1_single_stroke(page, 10, 1));

    let output = neopen()
        .arg("extract")
        .arg("--config")
        .arg(&config)
        .arg("--merge-pages")
        .arg(&a)
        .arg(&b)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    let pages = json["combined"]["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0]["strokes"].as_array().unwrap().len(), 2);
}

#[test]
fn invalid_format_version_flag_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.pen");
    std::fs::write(&path, b"").unwrap();

    neopen()
        .arg("extract")
        .arg("--format-version")
        .arg("7")
        .arg(&path)
        .assert()
        .failure();
}

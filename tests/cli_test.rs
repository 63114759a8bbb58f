// Exit-code tests for the iconforge binary
// Each run gets its own scratch directory and never waits for Enter

#![cfg(all(feature = "svg", feature = "ico"))]

use std::fs;
use std::path::Path;
use std::process::{Command, Output, Stdio};

const APP_ICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="128" height="128">
  <rect x="16" y="16" width="96" height="96" fill="#8a2be2"/>
</svg>"##;

fn iconforge(dir: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_iconforge"))
        .arg("--dir")
        .arg(dir)
        .args(extra)
        .env("NO_COLOR", "1")
        .stdin(Stdio::null())
        .output()
        .unwrap()
}

#[test]
fn test_success_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("app_icon.svg"), APP_ICON_SVG).unwrap();

    let out = iconforge(dir.path(), &["--no-pause"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(dir.path().join("app_icon.png").is_file());
    assert!(dir.path().join("app_icon.ico").is_file());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Icon generation completed successfully!"));
}

#[test]
fn test_missing_source_exits_one() {
    let dir = tempfile::tempdir().unwrap();

    let out = iconforge(dir.path(), &["--no-pause"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("SVG file not found"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_failure_without_terminal_does_not_wait() {
    // No --no-pause: stdin is not a terminal, so the run must still finish
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("app_icon.svg"), "<svg><broken").unwrap();

    let out = iconforge(dir.path(), &[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Error converting SVG to PNG"));
    assert!(!dir.path().join("app_icon.ico").exists());
}

#[test]
fn test_invalid_png_size_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("app_icon.svg"), APP_ICON_SVG).unwrap();

    let out = iconforge(dir.path(), &["--no-pause", "--size", "100000"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(!dir.path().join("app_icon.png").exists());
}

#[test]
fn test_inspect_lists_six_sizes() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("app_icon.svg"), APP_ICON_SVG).unwrap();
    assert_eq!(iconforge(dir.path(), &["--no-pause", "-q"]).status.code(), Some(0));

    let out = iconforge(dir.path(), &["inspect"]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("(6 images)"));
    assert!(stdout.contains("256x256"));
}

#[test]
fn test_check_reports_backends() {
    let dir = tempfile::tempdir().unwrap();
    let out = iconforge(dir.path(), &["check"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("All backends available."));
}

use assert_cmd::Command;
use predicates::prelude::*;
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn signalqr(work_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("signalqr").unwrap();
    // Keep a stray signalqr.toml in the repo from leaking into tests
    cmd.current_dir(work_dir.path())
        .env("RUST_LOG", "warn")
        .env_remove("SIGNALQR__EXPORT__OUTPUT_DIR");
    cmd
}

fn exported_path(output: &[u8]) -> PathBuf {
    let stdout = String::from_utf8(output.to_vec()).unwrap();
    PathBuf::from(stdout.trim())
}

#[test]
fn test_help_lists_commands() {
    let temp_dir = TempDir::new().unwrap();
    signalqr(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("show"));
}

#[test]
fn test_export_jpg_writes_timestamped_file() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    fs::create_dir(&out_dir).unwrap();

    let assert = signalqr(&temp_dir)
        .args(["export", "--text", "https://example.com", "--format", "jpg", "--out"])
        .arg(&out_dir)
        .assert()
        .success();

    let path = exported_path(&assert.get_output().stdout);
    assert_eq!(path.parent().unwrap(), out_dir);
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(Regex::new(r"^qr-\d+\.jpg$").unwrap().is_match(name), "bad name {}", name);

    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
}

#[cfg(feature = "pdf")]
#[test]
fn test_export_pdf_writes_document() {
    let temp_dir = TempDir::new().unwrap();

    let assert = signalqr(&temp_dir)
        .args(["export", "-t", "https://example.com", "-f", "pdf", "--out"])
        .arg(temp_dir.path())
        .assert()
        .success();

    let path = exported_path(&assert.get_output().stdout);
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(Regex::new(r"^qr-\d+\.pdf$").unwrap().is_match(name), "bad name {}", name);
    assert!(fs::read(&path).unwrap().starts_with(b"%PDF-"));
}

#[test]
fn test_export_defaults_to_working_directory() {
    let temp_dir = TempDir::new().unwrap();

    let assert = signalqr(&temp_dir)
        .args(["export", "--text", "hello"])
        .assert()
        .success();

    let path = exported_path(&assert.get_output().stdout);
    assert!(path.extension().unwrap() == "jpg");
    assert!(path.exists());
}

#[test]
fn test_export_empty_text_fails_without_file() {
    let temp_dir = TempDir::new().unwrap();

    signalqr(&temp_dir)
        .args(["export", "--text", "", "--out"])
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to export"));

    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_show_prints_terminal_qr() {
    let temp_dir = TempDir::new().unwrap();

    signalqr(&temp_dir)
        .args(["show", "--text", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("█").or(predicate::str::contains("▀")));
}

#[test]
fn test_generate_config_writes_example() {
    let temp_dir = TempDir::new().unwrap();

    signalqr(&temp_dir)
        .arg("--generate-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("signalqr.example.toml"));

    let content = fs::read_to_string(temp_dir.path().join("signalqr.example.toml")).unwrap();
    assert!(content.contains("[export]"));
    assert!(content.contains("jpeg_quality"));
}

//! Integration tests for sealpack-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use sealpack_core::test_utils::ZipBuilder;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

const HELLO_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

fn sealpack_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("sealpack");
    cmd.env_remove("SEALPACK_LOG");
    cmd
}

/// A small project tree: one file, one nested file, one empty directory.
fn sample_tree(temp: &TempDir) -> PathBuf {
    let source = temp.path().join("project");
    fs::create_dir_all(source.join("src")).unwrap();
    fs::create_dir_all(source.join("empty")).unwrap();
    fs::write(source.join("README.md"), "# project\n").unwrap();
    fs::write(source.join("src/main.rs"), "fn main() {}\n").unwrap();
    source
}

fn create_protected(temp: &TempDir, password: &str) -> PathBuf {
    let source = sample_tree(temp);
    let archive = temp.path().join("project.zip");
    sealpack_cmd()
        .arg("create")
        .arg(&source)
        .arg("-o")
        .arg(&archive)
        .args(["--password", password, "--iterations", "1"])
        .assert()
        .success();
    archive
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("stdout should be JSON")
}

#[test]
fn test_version_flag() {
    sealpack_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sealpack"));
}

#[test]
fn test_help_flag() {
    sealpack_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Command-line utility"));
}

#[test]
fn test_extract_help() {
    sealpack_cmd()
        .args(["extract", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Extract archive contents"));
}

#[test]
fn test_create_then_extract_round_trip() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_tree(&temp);
    let archive = temp.path().join("project.zip");
    let out = temp.path().join("out");

    sealpack_cmd()
        .arg("create")
        .arg(&source)
        .arg("-o")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Archive created"));

    sealpack_cmd()
        .arg("extract")
        .arg(&archive)
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Extraction complete"));

    assert_eq!(
        fs::read_to_string(out.join("project/README.md")).unwrap(),
        "# project\n"
    );
    assert_eq!(
        fs::read_to_string(out.join("project/src/main.rs")).unwrap(),
        "fn main() {}\n"
    );
    assert!(out.join("project/empty").is_dir());
}

#[test]
fn test_create_default_output_name() {
    let temp = TempDir::new().expect("failed to create temp dir");
    sample_tree(&temp);

    sealpack_cmd()
        .current_dir(temp.path())
        .args(["create", "project"])
        .assert()
        .success();

    assert!(temp.path().join("project.zip").is_file());
}

#[test]
fn test_create_refuses_to_overwrite_without_force() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_tree(&temp);
    let archive = temp.path().join("taken.zip");
    fs::write(&archive, b"keep me").unwrap();

    sealpack_cmd()
        .arg("create")
        .arg(&source)
        .arg("-o")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("HINT"));
    assert_eq!(fs::read(&archive).unwrap(), b"keep me");

    sealpack_cmd()
        .arg("create")
        .arg(&source)
        .arg("-o")
        .arg(&archive)
        .arg("--force")
        .assert()
        .success();
    assert_ne!(fs::read(&archive).unwrap(), b"keep me");
}

#[test]
fn test_create_json_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_tree(&temp);
    let archive = temp.path().join("project.zip");

    let json = json_stdout(
        sealpack_cmd()
            .arg("--json")
            .arg("create")
            .arg(&source)
            .arg("-o")
            .arg(&archive)
            .args(["--hash", "sha256"]),
    );

    assert_eq!(json["operation"], "create");
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["entry_count"], 4);
    assert_eq!(json["data"]["password_protected"], false);
    assert_eq!(json["data"]["digest"]["algorithm"], "sha256");
    assert_eq!(json["data"]["digest"]["hex"].as_str().unwrap().len(), 64);
}

#[test]
fn test_create_missing_source() {
    let temp = TempDir::new().expect("failed to create temp dir");

    sealpack_cmd()
        .arg("create")
        .arg(temp.path().join("nope"))
        .arg("-o")
        .arg(temp.path().join("nope.zip"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
    assert!(!temp.path().join("nope.zip").exists());
}

#[test]
fn test_extract_wrong_password_writes_nothing() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = create_protected(&temp, "p@ss");
    let out = temp.path().join("out");

    sealpack_cmd()
        .arg("extract")
        .arg(&archive)
        .arg(&out)
        .args(["--password", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Incorrect password"));

    assert!(!out.join("project").exists());

    sealpack_cmd()
        .arg("extract")
        .arg(&archive)
        .arg(&out)
        .args(["--password", "p@ss"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(out.join("project/README.md")).unwrap(),
        "# project\n"
    );
}

#[test]
fn test_extract_existing_file_requires_force() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_tree(&temp);
    let archive = temp.path().join("project.zip");
    let out = temp.path().join("out");
    sealpack_cmd()
        .arg("create")
        .arg(&source)
        .arg("-o")
        .arg(&archive)
        .assert()
        .success();

    fs::create_dir_all(out.join("project")).unwrap();
    fs::write(out.join("project/README.md"), "local edits\n").unwrap();

    sealpack_cmd()
        .arg("extract")
        .arg(&archive)
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--force"));
    assert_eq!(
        fs::read_to_string(out.join("project/README.md")).unwrap(),
        "local edits\n"
    );

    sealpack_cmd()
        .arg("extract")
        .arg(&archive)
        .arg(&out)
        .arg("--force")
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(out.join("project/README.md")).unwrap(),
        "# project\n"
    );
}

#[cfg(unix)]
#[test]
fn test_create_warns_about_unextractable_names() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_tree(&temp);
    fs::write(source.join("notes: draft.txt"), "x").unwrap();

    sealpack_cmd()
        .arg("create")
        .arg(&source)
        .arg("-o")
        .arg(temp.path().join("project.zip"))
        .assert()
        .success()
        .stdout(predicate::str::contains("notes: draft.txt"));
}

#[test]
fn test_extract_without_password_in_non_terminal() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = create_protected(&temp, "p@ss");

    sealpack_cmd()
        .arg("extract")
        .arg(&archive)
        .arg(temp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("password protected"))
        .stderr(predicate::str::contains("HINT"));
}

#[test]
fn test_verbose_logs_password_decision() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = create_protected(&temp, "p@ss");

    sealpack_cmd()
        .arg("--verbose")
        .arg("extract")
        .arg(&archive)
        .arg(temp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not prompting for a password"));
}

#[test]
fn test_password_on_plain_archive_is_ignored_with_warning() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_tree(&temp);
    let archive = temp.path().join("plain.zip");
    sealpack_cmd()
        .arg("create")
        .arg(&source)
        .arg("-o")
        .arg(&archive)
        .assert()
        .success();

    sealpack_cmd()
        .arg("extract")
        .arg(&archive)
        .arg(temp.path().join("out"))
        .args(["--password", "anything"])
        .assert()
        .success()
        .stderr(predicate::str::contains("not password protected"));
}

#[test]
fn test_check_reports_password_requirement() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = create_protected(&temp, "p@ss");

    sealpack_cmd()
        .arg("check")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("password required"));

    let json = json_stdout(sealpack_cmd().arg("--json").arg("check").arg(&archive));
    assert_eq!(json["data"]["password_required"], true);
    assert_eq!(json["data"]["total_entries"], 4);
}

#[test]
fn test_list_does_not_need_password() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = create_protected(&temp, "p@ss");

    sealpack_cmd()
        .arg("list")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("project/src/main.rs"))
        .stdout(predicate::str::contains("project/empty/"));

    sealpack_cmd()
        .args(["list", "--long", "-H"])
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 4 entries"))
        .stdout(predicate::str::contains("Password required"));
}

#[test]
fn test_list_json_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = create_protected(&temp, "p@ss");

    let json = json_stdout(sealpack_cmd().arg("--json").arg("list").arg(&archive));
    assert_eq!(json["operation"], "list");
    assert_eq!(json["data"]["password_protected"], true);
    let entries = json["data"]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 4);
    assert!(
        entries
            .iter()
            .any(|entry| entry["path"] == "project/empty" && entry["kind"] == "directory")
    );
}

#[test]
fn test_extract_skips_traversal_entries() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = temp.path().join("evil.zip");
    ZipBuilder::new()
        .file("../../etc/passed.txt", b"owned")
        .file("/etc/absolute.txt", b"owned")
        .file("ok.txt", b"fine")
        .write_to(&archive)
        .unwrap();
    let out = temp.path().join("a/b/out");

    let json = json_stdout(
        sealpack_cmd()
            .arg("--json")
            .arg("extract")
            .arg(&archive)
            .arg(&out),
    );

    assert_eq!(json["data"]["files_extracted"], 1);
    assert_eq!(json["data"]["skipped"], 2);
    assert!(
        json["data"]["warnings"][0]
            .as_str()
            .unwrap()
            .contains("../../etc/passed.txt")
    );
    assert!(!temp.path().join("a/etc").exists());
    assert_eq!(fs::read(out.join("ok.txt")).unwrap(), b"fine");
}

#[test]
fn test_extract_ratio_limit() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = temp.path().join("bomb.zip");
    ZipBuilder::new()
        .file("zeros.bin", &vec![0u8; 1 << 20])
        .write_to(&archive)
        .unwrap();

    sealpack_cmd()
        .arg("extract")
        .arg(&archive)
        .arg(temp.path().join("out"))
        .args(["--max-ratio", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("zip bomb"))
        .stderr(predicate::str::contains("--max-ratio"));
}

#[test]
fn test_extract_nonexistent_archive() {
    sealpack_cmd()
        .args(["extract", "/nonexistent/archive.zip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_extract_corrupt_archive() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = temp.path().join("junk.zip");
    fs::write(&archive, b"this is not a zip file").unwrap();

    sealpack_cmd()
        .arg("extract")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid archive"));
}

fn write_hello(dir: &Path) -> PathBuf {
    let file = dir.join("hello.txt");
    fs::write(&file, "hello world").unwrap();
    file
}

#[test]
fn test_hash_known_vector() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let file = write_hello(temp.path());

    sealpack_cmd()
        .arg("hash")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains(HELLO_SHA256));
}

#[test]
fn test_hash_expect_match_and_mismatch() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let file = write_hello(temp.path());

    sealpack_cmd()
        .arg("hash")
        .arg(&file)
        .args(["--expect", &HELLO_SHA256.to_uppercase()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Digest matches"));

    sealpack_cmd()
        .arg("hash")
        .arg(&file)
        .args(["--expect", &"0".repeat(64)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Digest mismatch"));
}

#[test]
fn test_hash_multiple_algorithms_json() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let file = write_hello(temp.path());

    let json = json_stdout(
        sealpack_cmd()
            .arg("--json")
            .arg("hash")
            .arg(&file)
            .args(["-a", "sha256", "-a", "SHA-512", "-a", "blake3"]),
    );

    let digests = json["data"]["digests"].as_array().unwrap();
    assert_eq!(digests.len(), 3);
    assert_eq!(digests[0]["hex"], HELLO_SHA256);
    assert_eq!(digests[1]["hex"].as_str().unwrap().len(), 128);
    assert_eq!(digests[2]["algorithm"], "blake3");
    assert_eq!(digests[0]["byte_len"], 11);
}

#[test]
fn test_hash_unsupported_algorithm() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let file = write_hello(temp.path());

    sealpack_cmd()
        .arg("hash")
        .arg(&file)
        .args(["-a", "md5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported hash algorithm"));
}

#[test]
fn test_quiet_suppresses_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_tree(&temp);

    sealpack_cmd()
        .arg("--quiet")
        .arg("create")
        .arg(&source)
        .arg("-o")
        .arg(temp.path().join("q.zip"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_weak_password_is_a_warning() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_tree(&temp);

    sealpack_cmd()
        .arg("create")
        .arg(&source)
        .arg("-o")
        .arg(temp.path().join("weak.zip"))
        .args(["--password", "abc", "--iterations", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Warnings:"))
        .stdout(predicate::str::contains("shorter"));
}

#[test]
fn test_completion_bash() {
    sealpack_cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sealpack"));
}

//! Command-line surface: usage errors, launch failures, exit status
#![allow(deprecated)] // Command::cargo_bin is deprecated but still functional

use assert_cmd::Command;
use predicates::prelude::*;

fn rastreador() -> Command {
    Command::cargo_bin("rastreador").unwrap()
}

#[test]
fn test_cli_requires_program() {
    rastreador()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Must specify a program to trace"));
}

#[test]
fn test_cli_flags_only_is_usage_error() {
    rastreador()
        .arg("-v")
        .arg("-V")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Syscall summary").not());
}

#[test]
fn test_cli_help() {
    rastreador()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("-V"));
}

#[test]
fn test_unknown_program_fails_without_summary() {
    rastreador()
        .arg("rastreador-no-such-program")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to launch tracee"))
        .stderr(predicate::str::contains("rastreador-no-such-program"))
        .stdout(predicate::str::contains("Syscall summary").not());
}

#[test]
fn test_unexecutable_file_fails_without_summary() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("not-a-binary");
    std::fs::write(&target, [0xde, 0xad, 0xbe, 0xef, 0x00, 0x13, 0x37, 0x0a]).unwrap();
    std::fs::set_permissions(&target, std::fs::Permissions::from_mode(0o755)).unwrap();

    rastreador()
        .arg(&target)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to launch tracee"))
        .stderr(predicate::str::contains("cannot execute"))
        .stdout(predicate::str::contains("Syscall summary").not());
}

#[test]
fn test_unexecutable_file_json_has_no_summary() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("garbage");
    std::fs::write(&target, b"\x7fNOPE not an image\n").unwrap();
    std::fs::set_permissions(&target, std::fs::Permissions::from_mode(0o755)).unwrap();

    rastreador()
        .arg("--format")
        .arg("json")
        .arg(&target)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_exit_status_independent_of_target() {
    rastreador()
        .arg("sh")
        .arg("-c")
        .arg("exit 42")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Syscall summary:"));
}

#[test]
fn test_target_arguments_passed_verbatim() {
    // -v after the program belongs to the target, not to us
    rastreador()
        .arg("echo")
        .arg("-v")
        .arg("marker-text")
        .assert()
        .success()
        .stdout(predicate::str::contains("-v marker-text"))
        .stdout(predicate::str::contains("Syscall detected").not());
}

#[test]
fn test_missing_catalog_degrades_to_unknown() {
    rastreador()
        .arg("--catalog")
        .arg("/nonexistent/rastreador/syscalls.csv")
        .arg("true")
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning"))
        .stdout(predicate::str::contains("unknown"))
        .stdout(predicate::str::contains("no description"));
}

#[test]
fn test_catalog_without_rows_degrades_to_unknown() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("syscalls.csv");
    std::fs::write(&path, "number,name,description\n").unwrap();

    rastreador()
        .arg("--catalog")
        .arg(&path)
        .arg("true")
        .assert()
        .success()
        .stderr(predicate::str::contains("no usable entries"))
        .stdout(predicate::str::contains("unknown"));
}

#[test]
fn test_csv_format() {
    rastreador()
        .arg("--format")
        .arg("csv")
        .arg("true")
        .assert()
        .success()
        .stdout(predicate::str::contains("number,name,description,count"));
}

//! Live display (-v) and single-step mode (-V)
#![allow(deprecated)] // Command::cargo_bin is deprecated but still functional

use assert_cmd::Command;
use predicates::prelude::*;

const FIXTURE: &str = env!("CARGO_BIN_EXE_syscall-fixture");
const PROMPT: &str = "Press Enter to continue...";

fn rastreador() -> Command {
    Command::cargo_bin("rastreador").unwrap()
}

#[test]
fn test_verbose_shows_each_entry() {
    let output = rastreador().arg("-v").arg(FIXTURE).arg("3").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    let detected = stdout
        .lines()
        .filter(|l| l.starts_with("Syscall detected: "))
        .count();
    assert!(detected >= 3);
    assert!(!stdout.contains(PROMPT));

    let getppid = format!("Syscall detected: {} - ", libc::SYS_getppid);
    assert_eq!(stdout.matches(getppid.as_str()).count(), 3);
}

#[cfg(target_arch = "x86_64")]
#[test]
fn test_verbose_line_format() {
    rastreador()
        .arg("-v")
        .arg(FIXTURE)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Syscall detected: 110 - getppid: get parent process identification",
        ));
}

#[test]
fn test_interactive_prompts_once_per_entry() {
    let output = rastreador()
        .arg("-V")
        .arg(FIXTURE)
        .arg("2")
        .write_stdin("\n".repeat(10_000))
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    let detected = stdout.matches("Syscall detected: ").count();
    let prompts = stdout.matches(PROMPT).count();
    assert!(detected > 0);
    assert_eq!(detected, prompts);
}

#[test]
fn test_interactive_survives_closed_stdin() {
    rastreador()
        .arg("-V")
        .arg(FIXTURE)
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains(PROMPT))
        .stdout(predicate::str::contains("Syscall summary:"));
}

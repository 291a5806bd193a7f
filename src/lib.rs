//! rastreador - Pure Rust system call counter
//!
//! Launches a program under ptrace, classifies every syscall boundary stop
//! as an entry or exit, counts entries per syscall number, and optionally
//! shows each call live or one step at a time.

#[cfg(not(all(
    target_os = "linux",
    any(target_arch = "x86_64", target_arch = "aarch64")
)))]
compile_error!("rastreador supports Linux on x86_64 and aarch64 only");

pub mod catalog;
pub mod cli;
pub mod counts;
pub mod csv_output;
pub mod error;
pub mod event;
pub mod json_output;
pub mod launcher;
pub mod registers;
pub mod report;
pub mod syscalls;
pub mod tracer;

//! Deterministic tracee for the end-to-end tests
//!
//! `syscall-fixture [N]` issues `getppid` exactly N times (default 1) and
//! exits 0. Nothing else in the Rust runtime calls `getppid`, so the tracer
//! must report a count of exactly N for it.

fn main() {
    let n: u64 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(1);

    for _ in 0..n {
        // SAFETY: getppid takes no arguments and cannot fail.
        unsafe {
            libc::syscall(libc::SYS_getppid);
        }
    }
}

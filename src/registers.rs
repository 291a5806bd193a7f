//! Architecture-neutral view of the tracee's registers at a syscall stop

use nix::sys::ptrace;
use nix::unistd::Pid;

use crate::error::TraceError;
use crate::event::Direction;

/// Read-only register snapshot
///
/// Only exposes what the controller needs. The syscall number is only
/// meaningful at an entry stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterSnapshot {
    syscall_number: i64,
}

impl RegisterSnapshot {
    pub fn new(syscall_number: i64) -> Self {
        Self { syscall_number }
    }

    pub fn syscall_number(&self) -> i64 {
        self.syscall_number
    }

    /// On x86_64 the syscall number survives in `orig_rax`
    #[cfg(target_arch = "x86_64")]
    pub fn from_user_regs(regs: &libc::user_regs_struct) -> Self {
        Self::new(regs.orig_rax as i64)
    }

    /// On aarch64 the syscall number is passed in `x8`
    #[cfg(target_arch = "aarch64")]
    pub fn from_user_regs(regs: &libc::user_regs_struct) -> Self {
        Self::new(regs.regs[8] as i64)
    }

    /// Fetch the registers of a stopped tracee
    #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
    pub fn read(pid: Pid) -> Result<Self, TraceError> {
        let regs = ptrace::getregs(pid).map_err(TraceError::ptrace("GETREGS"))?;
        Ok(Self::from_user_regs(&regs))
    }
}

const PTRACE_GET_SYSCALL_INFO: libc::c_int = 0x420e;
const PTRACE_SYSCALL_INFO_ENTRY: u8 = 1;
const PTRACE_SYSCALL_INFO_EXIT: u8 = 2;

/// Ask the kernel which side of the syscall the tracee is stopped on
///
/// Returns `None` when `PTRACE_GET_SYSCALL_INFO` is unavailable (Linux < 5.3)
/// or the stop is not a plain entry/exit stop. Only the leading `op` byte
/// of `struct ptrace_syscall_info` is inspected.
pub fn reported_direction(pid: Pid) -> Option<Direction> {
    let mut info = [0u8; 128];
    // SAFETY: the kernel writes at most `info.len()` bytes into `info`.
    let ret = unsafe {
        libc::ptrace(
            PTRACE_GET_SYSCALL_INFO as _,
            pid.as_raw(),
            info.len() as *mut libc::c_void,
            info.as_mut_ptr() as *mut libc::c_void,
        )
    };
    if ret <= 0 {
        tracing::trace!(pid = %pid, "PTRACE_GET_SYSCALL_INFO unavailable");
        return None;
    }

    match info[0] {
        PTRACE_SYSCALL_INFO_ENTRY => Some(Direction::Entry),
        PTRACE_SYSCALL_INFO_EXIT => Some(Direction::Exit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_exposes_number() {
        let regs = RegisterSnapshot::new(231);
        assert_eq!(regs.syscall_number(), 231);
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_from_user_regs_uses_orig_rax() {
        // SAFETY: user_regs_struct is plain integers; all-zero is valid.
        let mut regs: libc::user_regs_struct = unsafe { std::mem::zeroed() };
        regs.orig_rax = 39;
        regs.rax = (-(libc::ENOSYS as i64)) as u64;
        assert_eq!(RegisterSnapshot::from_user_regs(&regs).syscall_number(), 39);
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_from_user_regs_negative_number() {
        // SAFETY: see above.
        let mut regs: libc::user_regs_struct = unsafe { std::mem::zeroed() };
        regs.orig_rax = u64::MAX;
        assert_eq!(RegisterSnapshot::from_user_regs(&regs).syscall_number(), -1);
    }

    #[test]
    fn test_reported_direction_for_non_tracee() {
        // Our own pid is not a stopped tracee of ours, so the request fails
        let me = nix::unistd::getpid();
        assert_eq!(reported_direction(me), None);
    }
}

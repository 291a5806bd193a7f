//! Launching the tracee
//!
//! The tracee must be under ptrace control before the target's first
//! instruction runs. This is done in two phases:
//!
//! 1. The forked child calls `PTRACE_TRACEME` and then stops itself with
//!    `SIGSTOP`. It stays parked there until the tracer resumes it.
//! 2. The parent waits for that stop, arms the trace options, and hands the
//!    process to the controller. The controller's first `PTRACE_SYSCALL`
//!    resumes the child, which then `execv`s the target.
//!
//! The parent never races the child: options are armed while the child is
//! known to be stopped, and nothing of the target has executed yet.
//!
//! A close-on-exec status pipe carries the child's errno back when any step
//! before the image replacement fails. A successful `execv` closes the write
//! end, so the pipe reads empty.

use std::ffi::{CStr, CString};
use std::fs::File;
use std::io::{Read, Write};
use std::os::unix::ffi::OsStrExt;

use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::ptrace;
use nix::sys::signal::{kill, raise, Signal};
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{execv, fork, pipe2, ForkResult, Pid};

use crate::error::LaunchError;

/// Exit status of a child whose exec failed
pub const EXEC_FAILED_STATUS: i32 = 127;

/// Lifecycle of the tracee
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Launching,
    /// Parked at its own `SIGSTOP`, options armed
    Ready,
    Running,
    AtEntry,
    AtExit,
    Exited,
}

/// The single traced child of this run
#[derive(Debug)]
pub struct TracedProcess {
    pid: Pid,
    state: ProcessState,
    program: String,
    /// Read end of the status pipe
    exec_status: File,
}

impl TracedProcess {
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Why the child never became the target program
    ///
    /// Call only after the tracee terminated without an exec event; the
    /// read blocks while the child is alive.
    pub fn exec_failure(&mut self) -> LaunchError {
        let mut raw = [0u8; 4];
        match self.exec_status.read_exact(&mut raw) {
            Ok(()) => LaunchError::Exec {
                program: self.program.clone(),
                source: Errno::from_raw(i32::from_ne_bytes(raw)),
            },
            Err(_) => LaunchError::NoExec {
                program: self.program.clone(),
            },
        }
    }

    pub(crate) fn set_state(&mut self, state: ProcessState) {
        tracing::trace!(pid = %self.pid, from = ?self.state, to = ?state, "tracee state");
        self.state = state;
    }
}

impl Drop for TracedProcess {
    fn drop(&mut self) {
        if self.state != ProcessState::Exited {
            tracing::debug!(pid = %self.pid, state = ?self.state, "killing tracee");
            let _ = kill(self.pid, Signal::SIGKILL);
            let _ = waitpid(self.pid, None);
        }
    }
}

/// Fork the target under ptrace and bring it to the ready stop
///
/// `command[0]` is looked up on `PATH`; the rest are passed verbatim.
pub fn launch(command: &[String]) -> Result<TracedProcess, LaunchError> {
    let program = command.first().ok_or(LaunchError::EmptyCommand)?;

    let path = which::which(program).map_err(|source| LaunchError::NotFound {
        program: program.clone(),
        source,
    })?;
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| LaunchError::InvalidArgument(path.display().to_string()))?;
    let c_args = command
        .iter()
        .map(|arg| {
            CString::new(arg.as_str()).map_err(|_| LaunchError::InvalidArgument(arg.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(program = %path.display(), args = ?&command[1..], "launching tracee");

    let (status_read, status_write) = pipe2(OFlag::O_CLOEXEC).map_err(LaunchError::Pipe)?;

    // Everything the child needs is allocated before the fork.
    match unsafe { fork() }.map_err(LaunchError::Fork)? {
        ForkResult::Child => {
            drop(status_read);
            exec_traced(&c_path, &c_args, File::from(status_write))
        }
        ForkResult::Parent { child } => {
            drop(status_write);
            await_ready(child, program.clone(), File::from(status_read))
        }
    }
}

/// Child side: become traceable, park, then replace the image
fn exec_traced(path: &CStr, args: &[CString], mut status: File) -> ! {
    if let Err(e) = ptrace::traceme() {
        child_fail(&mut status, e);
    }

    if let Err(e) = raise(Signal::SIGSTOP) {
        child_fail(&mut status, e);
    }

    match execv(path, args) {
        Ok(never) => match never {},
        Err(e) => child_fail(&mut status, e),
    }
}

/// Report `errno` on the status pipe and leave without running any
/// parent-side cleanup
fn child_fail(status: &mut File, errno: Errno) -> ! {
    let _ = status.write_all(&(errno as i32).to_ne_bytes());
    // SAFETY: _exit skips the parent's atexit handlers and stdio buffers,
    // which the forked child must not run.
    unsafe { libc::_exit(EXEC_FAILED_STATUS) }
}

/// Parent side: wait for the child's self-stop and arm the trace options
fn await_ready(
    child: Pid,
    program: String,
    exec_status: File,
) -> Result<TracedProcess, LaunchError> {
    let mut process = TracedProcess {
        pid: child,
        state: ProcessState::Launching,
        program,
        exec_status,
    };

    match waitpid(child, None).map_err(LaunchError::Wait)? {
        WaitStatus::Stopped(_, Signal::SIGSTOP) => {}
        WaitStatus::Exited(..) | WaitStatus::Signaled(..) => {
            process.set_state(ProcessState::Exited);
            return Err(process.exec_failure());
        }
        status => return Err(LaunchError::NotReady(format!("{:?}", status))),
    }

    // TRACESYSGOOD marks syscall stops as SIGTRAP|0x80 so they cannot be
    // confused with a delivered SIGTRAP. TRACEEXEC turns the post-exec
    // SIGTRAP into an event stop.
    ptrace::setoptions(
        child,
        ptrace::Options::PTRACE_O_TRACESYSGOOD
            | ptrace::Options::PTRACE_O_TRACEEXEC
            | ptrace::Options::PTRACE_O_EXITKILL,
    )
    .map_err(LaunchError::SetOptions)?;

    process.set_state(ProcessState::Ready);
    tracing::debug!(pid = %child, "tracee ready");
    Ok(process)
}

//! Error types for launching, tracing and catalog loading

use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error;

use crate::event::Direction;

/// The tracee could not be created or brought to the trace-ready stop.
///
/// Always fatal: no summary is produced.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("no target program specified")]
    EmptyCommand,

    #[error("cannot find program '{program}': {source}")]
    NotFound {
        program: String,
        #[source]
        source: which::Error,
    },

    #[error("argument contains an interior NUL byte: {0:?}")]
    InvalidArgument(String),

    #[error("failed to create the exec status pipe: {0}")]
    Pipe(#[source] Errno),

    #[error("fork failed: {0}")]
    Fork(#[source] Errno),

    #[error("waiting for the tracee to stop failed: {0}")]
    Wait(#[source] Errno),

    #[error("tracee did not reach the trace-ready stop, got {0}")]
    NotReady(String),

    #[error("failed to set ptrace options: {0}")]
    SetOptions(#[source] Errno),

    #[error("cannot execute '{program}': {source}")]
    Exec {
        program: String,
        #[source]
        source: Errno,
    },

    #[error("'{program}' terminated before its image was replaced")]
    NoExec { program: String },
}

/// The trace loop cannot continue.
///
/// Counts gathered before the error are still reported.
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("ptrace {op} failed: {source}")]
    Ptrace {
        op: &'static str,
        #[source]
        source: Errno,
    },

    #[error("tracee stopped outside a syscall boundary: {0}")]
    UnexpectedStop(String),

    #[error(
        "syscall boundary out of step: expected {expected:?}, kernel reported {reported:?} \
         for syscall {number} (is PTRACE_O_TRACESYSGOOD set?)"
    )]
    ProtocolViolation {
        expected: Direction,
        reported: Direction,
        number: i64,
    },

    #[error("writing trace output failed: {0}")]
    Output(#[from] std::io::Error),
}

impl TraceError {
    pub(crate) fn ptrace(op: &'static str) -> impl FnOnce(Errno) -> Self {
        move |source| Self::Ptrace { op, source }
    }
}

/// The syscall catalog could not be loaded.
///
/// Never fatal: callers fall back to an empty catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("cannot read syscall catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("syscall catalog {} has no usable entries", .path.display())]
    Empty { path: PathBuf },
}

/// A single catalog row that was skipped.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogRowError {
    #[error("line {line}: blank row")]
    Blank { line: usize },

    #[error("line {line}: invalid syscall number '{value}'")]
    BadNumber { line: usize, value: String },

    #[error("line {line}: not valid UTF-8")]
    NotUtf8 { line: usize },
}

//! System call tracing using ptrace
//!
//! The controller alternates "resume until the next syscall boundary" and
//! "classify why the tracee stopped". Each boundary stop goes through the
//! entry/exit state machine; only entries are counted and displayed.

use std::io::{BufRead, Write};

use nix::sys::ptrace;
use nix::sys::signal::Signal;
use nix::sys::wait::{waitpid, WaitStatus};

use crate::catalog::SyscallCatalog;
use crate::counts::{CountTable, DEFAULT_CAPACITY};
use crate::error::TraceError;
use crate::event::{BoundaryStop, BoundaryTracker, Direction, SyscallEvent};
use crate::launcher::{ProcessState, TracedProcess};
use crate::registers::{self, RegisterSnapshot};

/// Prompt printed after each entry in interactive mode
pub const ACK_PROMPT: &str = "Press Enter to continue...";

/// How much the controller prints while tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Summary only
    #[default]
    Quiet,
    /// One line per syscall entry
    Verbose,
    /// One line per entry, then wait for Enter
    Interactive,
}

impl DisplayMode {
    pub fn from_flags(verbose: bool, interactive: bool) -> Self {
        match (verbose, interactive) {
            (_, true) => Self::Interactive,
            (true, false) => Self::Verbose,
            (false, false) => Self::Quiet,
        }
    }

    pub fn shows_entries(self) -> bool {
        !matches!(self, Self::Quiet)
    }
}

/// What to do when the tracee stops for a signal rather than a syscall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalPolicy {
    /// End the trace with [`TraceError::UnexpectedStop`]
    #[default]
    Abort,
    /// Deliver the signal to the tracee on the next resume
    Forward,
}

/// Tracer configuration
#[derive(Debug, Clone)]
pub struct TracerConfig {
    pub display: DisplayMode,
    pub signal_policy: SignalPolicy,
    /// Syscall numbers `0..count_capacity` are counted
    pub count_capacity: usize,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            display: DisplayMode::Quiet,
            signal_policy: SignalPolicy::Abort,
            count_capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Why the tracee stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    /// Syscall entry or exit (`SIGTRAP | 0x80`)
    Boundary(BoundaryStop),
    /// A `PTRACE_EVENT_*` stop, e.g. exec
    Event(i32),
    /// Signal-delivery stop
    Signal(Signal),
    Exited(i32),
    Signaled(Signal),
}

/// The primitives the controller needs from a tracee
pub trait TraceBackend {
    /// Resume until the next syscall boundary, optionally delivering `signal`
    fn resume(&mut self, signal: Option<Signal>) -> Result<(), TraceError>;

    /// Block until the tracee changes state
    fn wait(&mut self) -> Result<Stop, TraceError>;

    /// Called once per classified boundary stop
    fn observe(&mut self, _event: &SyscallEvent) {}
}

impl TraceBackend for TracedProcess {
    fn resume(&mut self, signal: Option<Signal>) -> Result<(), TraceError> {
        ptrace::syscall(self.pid(), signal).map_err(TraceError::ptrace("SYSCALL"))?;
        self.set_state(ProcessState::Running);
        Ok(())
    }

    fn wait(&mut self) -> Result<Stop, TraceError> {
        let status = waitpid(self.pid(), None).map_err(TraceError::ptrace("waitpid"))?;
        match status {
            WaitStatus::Exited(_, code) => {
                self.set_state(ProcessState::Exited);
                Ok(Stop::Exited(code))
            }
            WaitStatus::Signaled(_, sig, _) => {
                self.set_state(ProcessState::Exited);
                Ok(Stop::Signaled(sig))
            }
            WaitStatus::PtraceSyscall(pid) => {
                let regs = RegisterSnapshot::read(pid)?;
                let reported = registers::reported_direction(pid);
                Ok(Stop::Boundary(BoundaryStop::new(regs, reported)))
            }
            WaitStatus::PtraceEvent(_, _, event) => Ok(Stop::Event(event)),
            WaitStatus::Stopped(_, sig) => Ok(Stop::Signal(sig)),
            other => Err(TraceError::UnexpectedStop(format!("{:?}", other))),
        }
    }

    fn observe(&mut self, event: &SyscallEvent) {
        self.set_state(match event.direction {
            Direction::Entry => ProcessState::AtEntry,
            Direction::Exit => ProcessState::AtExit,
        });
    }
}

/// How the trace ended
#[derive(Debug)]
pub enum Termination {
    /// Tracee exited with this status
    Exited(i32),
    /// Tracee was killed by a signal
    Signaled(Signal),
    /// The controller gave up; counts are partial
    Aborted(TraceError),
}

impl Termination {
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }
}

/// Result of a trace run
#[derive(Debug)]
pub struct TraceReport {
    pub counts: CountTable,
    pub termination: Termination,
    /// Entry events classified
    pub entries: u64,
    /// Exit events classified
    pub exits: u64,
    /// Interactive prompts shown
    pub prompts: u64,
    /// Whether the tracee reported `PTRACE_EVENT_EXEC`, i.e. the target's
    /// image replaced the launcher's child
    pub exec_observed: bool,
}

/// Per-run state of the controller
///
/// Owns the count table; borrows the catalog. Live lines go to `display`
/// and interactive acknowledgments are read from `ack`.
pub struct TraceSession<'a, W, R> {
    config: &'a TracerConfig,
    catalog: &'a SyscallCatalog,
    counts: CountTable,
    tracker: BoundaryTracker,
    display: W,
    ack: R,
    entries: u64,
    exits: u64,
    prompts: u64,
    exec_observed: bool,
}

impl<'a, W: Write, R: BufRead> TraceSession<'a, W, R> {
    pub fn new(config: &'a TracerConfig, catalog: &'a SyscallCatalog, display: W, ack: R) -> Self {
        Self {
            config,
            catalog,
            counts: CountTable::with_capacity(config.count_capacity),
            tracker: BoundaryTracker::new(),
            display,
            ack,
            entries: 0,
            exits: 0,
            prompts: 0,
            exec_observed: false,
        }
    }

    /// Drive the tracee until it terminates or the trace breaks
    pub fn run<B: TraceBackend>(mut self, backend: &mut B) -> TraceReport {
        tracing::debug!(
            display = ?self.config.display,
            capacity = self.counts.capacity(),
            "trace started"
        );
        let termination = match self.trace_loop(backend) {
            Ok(termination) => termination,
            Err(e) => {
                tracing::debug!("trace aborted: {}", e);
                Termination::Aborted(e)
            }
        };

        TraceReport {
            counts: self.counts,
            termination,
            entries: self.entries,
            exits: self.exits,
            prompts: self.prompts,
            exec_observed: self.exec_observed,
        }
    }

    fn trace_loop<B: TraceBackend>(&mut self, backend: &mut B) -> Result<Termination, TraceError> {
        let mut pending_signal = None;

        loop {
            backend.resume(pending_signal.take())?;

            let stop = backend.wait()?;
            tracing::trace!(?stop, "tracee stopped");

            match stop {
                Stop::Exited(code) => return Ok(Termination::Exited(code)),
                Stop::Signaled(sig) => return Ok(Termination::Signaled(sig)),
                Stop::Event(event) => {
                    tracing::debug!(event, "ptrace event stop");
                    if event == libc::PTRACE_EVENT_EXEC {
                        self.exec_observed = true;
                    }
                }
                Stop::Signal(sig) => match self.config.signal_policy {
                    SignalPolicy::Abort => {
                        return Err(TraceError::UnexpectedStop(format!("signal {}", sig)));
                    }
                    SignalPolicy::Forward => {
                        tracing::debug!(%sig, "forwarding signal to tracee");
                        pending_signal = Some(sig);
                    }
                },
                Stop::Boundary(boundary) => {
                    let event = self.tracker.classify(&boundary)?;
                    backend.observe(&event);
                    self.handle_event(event)?;
                }
            }
        }
    }

    fn handle_event(&mut self, event: SyscallEvent) -> Result<(), TraceError> {
        match event.direction {
            Direction::Entry => {
                self.entries += 1;
                if !self.counts.record(event.number) {
                    tracing::debug!(number = event.number, "syscall number outside counting range");
                }
                if self.config.display.shows_entries() {
                    self.show_entry(event.number)?;
                }
                if self.config.display == DisplayMode::Interactive {
                    self.await_ack()?;
                }
            }
            Direction::Exit => {
                self.exits += 1;
            }
        }
        Ok(())
    }

    fn show_entry(&mut self, number: i64) -> Result<(), TraceError> {
        writeln!(
            self.display,
            "Syscall detected: {} - {}: {}",
            number,
            self.catalog.name_of(number),
            self.catalog.description_of(number)
        )?;
        self.display.flush()?;
        Ok(())
    }

    /// Block until the user presses Enter; the tracee stays stopped
    fn await_ack(&mut self) -> Result<(), TraceError> {
        write!(self.display, "{}", ACK_PROMPT)?;
        self.display.flush()?;
        self.prompts += 1;

        let mut line = String::new();
        if self.ack.read_line(&mut line)? == 0 {
            tracing::debug!("acknowledgment input closed, continuing");
        }
        Ok(())
    }
}

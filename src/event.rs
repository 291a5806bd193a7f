//! Syscall boundary events and the entry/exit state machine

use crate::error::TraceError;
use crate::registers::RegisterSnapshot;

/// Which side of the kernel call a boundary stop is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Entry,
    Exit,
}

/// One classified syscall boundary stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyscallEvent {
    pub number: i64,
    pub direction: Direction,
}

/// A syscall-boundary stop as seen by the tracer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryStop {
    pub regs: RegisterSnapshot,
    /// Direction reported by the kernel, when it can tell us
    /// (`PTRACE_GET_SYSCALL_INFO`); `None` on older kernels
    pub reported: Option<Direction>,
}

impl BoundaryStop {
    pub fn new(regs: RegisterSnapshot, reported: Option<Direction>) -> Self {
        Self { regs, reported }
    }
}

/// Entry/exit alternation for a single tracee
///
/// Starts awaiting an entry. Each boundary stop flips the phase. A stop the
/// kernel labels with the other direction means the tracer lost step with
/// the tracee and is reported as [`TraceError::ProtocolViolation`]; the phase
/// is left untouched in that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryTracker {
    expected: Direction,
}

impl BoundaryTracker {
    pub fn new() -> Self {
        Self {
            expected: Direction::Entry,
        }
    }

    /// Direction the next boundary stop will be classified as
    pub fn expected(&self) -> Direction {
        self.expected
    }

    /// Classify a boundary stop and advance the phase
    pub fn classify(&mut self, stop: &BoundaryStop) -> Result<SyscallEvent, TraceError> {
        let number = stop.regs.syscall_number();

        if let Some(reported) = stop.reported {
            if reported != self.expected {
                return Err(TraceError::ProtocolViolation {
                    expected: self.expected,
                    reported,
                    number,
                });
            }
        }

        let event = SyscallEvent {
            number,
            direction: self.expected,
        };
        self.expected = match self.expected {
            Direction::Entry => Direction::Exit,
            Direction::Exit => Direction::Entry,
        };
        Ok(event)
    }
}

impl Default for BoundaryTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(number: i64, reported: Option<Direction>) -> BoundaryStop {
        BoundaryStop::new(RegisterSnapshot::new(number), reported)
    }

    #[test]
    fn test_alternates_without_kernel_hint() {
        let mut tracker = BoundaryTracker::new();
        let directions: Vec<_> = (0..6)
            .map(|_| tracker.classify(&stop(1, None)).unwrap().direction)
            .collect();
        assert_eq!(
            directions,
            vec![
                Direction::Entry,
                Direction::Exit,
                Direction::Entry,
                Direction::Exit,
                Direction::Entry,
                Direction::Exit
            ]
        );
    }

    #[test]
    fn test_matching_hints_accepted() {
        let mut tracker = BoundaryTracker::new();
        let entry = tracker.classify(&stop(39, Some(Direction::Entry))).unwrap();
        assert_eq!(
            entry,
            SyscallEvent {
                number: 39,
                direction: Direction::Entry
            }
        );
        let exit = tracker.classify(&stop(39, Some(Direction::Exit))).unwrap();
        assert_eq!(exit.direction, Direction::Exit);
        assert_eq!(tracker.expected(), Direction::Entry);
    }

    #[test]
    fn test_consecutive_entries_rejected() {
        let mut tracker = BoundaryTracker::new();
        tracker.classify(&stop(0, Some(Direction::Entry))).unwrap();
        let err = tracker
            .classify(&stop(1, Some(Direction::Entry)))
            .unwrap_err();
        assert!(matches!(
            err,
            TraceError::ProtocolViolation {
                expected: Direction::Exit,
                reported: Direction::Entry,
                number: 1
            }
        ));
    }

    #[test]
    fn test_exit_first_rejected() {
        let mut tracker = BoundaryTracker::new();
        let err = tracker.classify(&stop(3, Some(Direction::Exit))).unwrap_err();
        assert!(matches!(err, TraceError::ProtocolViolation { .. }));
        assert_eq!(tracker.expected(), Direction::Entry);
    }

    #[test]
    fn test_exit_keeps_out_of_range_numbers_in_step() {
        let mut tracker = BoundaryTracker::new();
        assert_eq!(
            tracker.classify(&stop(-1, None)).unwrap().direction,
            Direction::Entry
        );
        assert_eq!(
            tracker.classify(&stop(5000, None)).unwrap().direction,
            Direction::Exit
        );
    }
}

//! JSON output format for the syscall summary

use serde::{Deserialize, Serialize};

use crate::report::SummaryRow;
use crate::tracer::Termination;

/// One counted syscall
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonSyscallCount {
    pub number: u64,
    pub name: String,
    pub description: String,
    pub count: u64,
}

/// How the traced program ended
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum JsonTermination {
    Exited { code: i32 },
    Signaled { signal: String },
    Aborted { error: String },
}

impl From<&Termination> for JsonTermination {
    fn from(termination: &Termination) -> Self {
        match termination {
            Termination::Exited(code) => Self::Exited { code: *code },
            Termination::Signaled(sig) => Self::Signaled {
                signal: sig.as_str().to_string(),
            },
            Termination::Aborted(e) => Self::Aborted {
                error: e.to_string(),
            },
        }
    }
}

/// Complete summary document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub syscalls: Vec<JsonSyscallCount>,
    pub total_calls: u64,
    /// Entries whose number was outside the counting range
    pub uncounted: u64,
    pub termination: JsonTermination,
}

impl JsonSummary {
    pub fn new(rows: &[SummaryRow], uncounted: u64, termination: &Termination) -> Self {
        let syscalls: Vec<JsonSyscallCount> = rows
            .iter()
            .map(|row| JsonSyscallCount {
                number: row.number,
                name: row.name.clone(),
                description: row.description.clone(),
                count: row.count,
            })
            .collect();
        let total_calls = syscalls.iter().map(|s| s.count).sum();

        Self {
            syscalls,
            total_calls,
            uncounted,
            termination: termination.into(),
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

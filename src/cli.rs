//! CLI argument parsing for rastreador

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::counts::DEFAULT_CAPACITY;
use crate::tracer::{DisplayMode, SignalPolicy, TracerConfig};

/// Output format for the final summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Fixed-width table (default)
    Text,
    /// JSON document for machine parsing
    Json,
    /// CSV for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "rastreador")]
#[command(about = "Count the system calls a program makes, optionally step by step", long_about = None)]
pub struct Cli {
    /// Print each syscall as it is entered
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Like -v, and wait for Enter after each syscall
    #[arg(short = 'V')]
    pub interactive: bool,

    /// Syscall catalog file (number,name,description with a header line)
    #[arg(long = "catalog", value_name = "PATH", default_value = "syscalls.csv")]
    pub catalog: PathBuf,

    /// Use the built-in x86_64 syscall table instead of a catalog file
    #[arg(long = "builtin-catalog", conflicts_with = "catalog")]
    pub builtin_catalog: bool,

    /// Summary output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Count syscall numbers below this bound; larger numbers are reported as uncounted
    #[arg(long = "max-syscall", value_name = "N", default_value_t = DEFAULT_CAPACITY)]
    pub max_syscall: usize,

    /// Deliver signals to the tracee instead of stopping the trace
    #[arg(long = "forward-signals")]
    pub forward_signals: bool,

    /// Enable debug tracing output on stderr
    #[arg(long = "debug")]
    pub debug: bool,

    /// Program to trace and its arguments
    #[arg(trailing_var_arg = true, num_args = 1.., value_name = "PROGRAM")]
    pub command: Vec<String>,
}

impl Cli {
    /// Tracer settings derived from the flags
    pub fn tracer_config(&self) -> TracerConfig {
        TracerConfig {
            display: DisplayMode::from_flags(self.verbose, self.interactive),
            signal_policy: if self.forward_signals {
                SignalPolicy::Forward
            } else {
                SignalPolicy::Abort
            },
            count_capacity: self.max_syscall,
        }
    }
}

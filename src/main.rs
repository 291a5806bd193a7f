use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use rastreador::catalog::{self, SyscallCatalog};
use rastreador::cli::Cli;
use rastreador::launcher;
use rastreador::report;
use rastreador::tracer::{Termination, TraceSession};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(io::stderr)
            .init();
    }
}

/// Load the syscall catalog, degrading to an empty one on failure
fn load_catalog(args: &Cli) -> SyscallCatalog {
    if args.builtin_catalog {
        if let Some(warning) = catalog::builtin_mismatch(std::env::consts::ARCH) {
            tracing::warn!("{}", warning);
            eprintln!("[rastreador: Warning - {}]", warning);
        }
        return SyscallCatalog::builtin();
    }

    match SyscallCatalog::load(&args.catalog) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!("{}", e);
            eprintln!("[rastreador: Warning - {}]", e);
            eprintln!("[rastreador: Continuing with every syscall reported as unknown]");
            SyscallCatalog::empty()
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    if args.command.is_empty() {
        anyhow::bail!(
            "Must specify a program to trace. Usage: rastreador [-v] [-V] PROGRAM [ARGS...]"
        );
    }

    let catalog = load_catalog(&args);
    let config = args.tracer_config();

    let mut process = launcher::launch(&args.command).context("Failed to launch tracee")?;

    let report = {
        let stdin = io::stdin();
        let stdout = io::stdout();
        TraceSession::new(&config, &catalog, stdout.lock(), stdin.lock()).run(&mut process)
    };
    // A tracee that terminated without exec never ran the target
    if !report.exec_observed && !report.termination.is_aborted() {
        return Err(process.exec_failure()).context("Failed to launch tracee");
    }
    // Kills the tracee if the trace was aborted while it was still stopped
    drop(process);

    let mut stdout = io::stdout().lock();
    report::write_summary(
        &mut stdout,
        args.format,
        &report.counts,
        &catalog,
        &report.termination,
    )
    .context("Failed to write summary")?;
    stdout.flush()?;

    match report.termination {
        Termination::Exited(code) => {
            tracing::debug!(code, "tracee exited");
        }
        Termination::Signaled(sig) => {
            eprintln!("[rastreador: tracee killed by signal {}]", sig);
        }
        Termination::Aborted(e) => {
            return Err(e).context("Trace aborted");
        }
    }

    Ok(())
}

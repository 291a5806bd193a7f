//! Final summary of syscall counts
//!
//! Rows are built from the count table and the catalog, then rendered in
//! one of the output formats. Text is the default.

use std::io::{self, Write};

use crate::catalog::SyscallCatalog;
use crate::cli::OutputFormat;
use crate::counts::CountTable;
use crate::csv_output::CsvSummary;
use crate::json_output::JsonSummary;
use crate::tracer::Termination;

/// One line of the summary: a syscall number with a non-zero count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub number: u64,
    pub name: String,
    pub description: String,
    pub count: u64,
}

/// Build summary rows, ascending by syscall number
pub fn summary_rows(counts: &CountTable, catalog: &SyscallCatalog) -> Vec<SummaryRow> {
    counts
        .snapshot()
        .into_iter()
        .map(|(number, count)| {
            let key = number as i64;
            SummaryRow {
                number,
                name: catalog.name_of(key).to_string(),
                description: catalog.description_of(key).to_string(),
                count,
            }
        })
        .collect()
}

/// Write the summary in the requested format
pub fn write_summary<W: Write>(
    out: &mut W,
    format: OutputFormat,
    counts: &CountTable,
    catalog: &SyscallCatalog,
    termination: &Termination,
) -> io::Result<()> {
    let rows = summary_rows(counts, catalog);
    match format {
        OutputFormat::Text => write_text(out, &rows, counts.out_of_range()),
        OutputFormat::Json => {
            let summary = JsonSummary::new(&rows, counts.out_of_range(), termination);
            let json = summary.to_json().map_err(io::Error::other)?;
            writeln!(out, "{}", json)
        }
        OutputFormat::Csv => {
            let mut csv = CsvSummary::new();
            for row in &rows {
                csv.add_row(row);
            }
            write!(out, "{}", csv.to_csv())
        }
    }
}

/// Fixed-width text table
pub fn write_text<W: Write>(out: &mut W, rows: &[SummaryRow], uncounted: u64) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Syscall summary:")?;
    writeln!(
        out,
        "{:<10} {:<20} {:<50} {}",
        "Number", "Name", "Description", "Count"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:<10} {:<20} {:<50} {}",
            row.number, row.name, row.description, row.count
        )?;
    }
    if uncounted > 0 {
        writeln!(
            out,
            "({} syscall entries outside the counting range were not counted)",
            uncounted
        )?;
    }
    Ok(())
}

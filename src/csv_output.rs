//! CSV output format for the syscall summary
//!
//! Columns: `number,name,description,count`

use crate::report::SummaryRow;

/// CSV summary formatter
#[derive(Debug, Default)]
pub struct CsvSummary {
    rows: Vec<SummaryRow>,
}

impl CsvSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, row: &SummaryRow) {
        self.rows.push(row.clone());
    }

    fn header() -> &'static str {
        "number,name,description,count"
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_row(row: &SummaryRow) -> String {
        [
            row.number.to_string(),
            Self::escape_field(&row.name),
            Self::escape_field(&row.description),
            row.count.to_string(),
        ]
        .join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str(Self::header());
        output.push('\n');

        for row in &self.rows {
            output.push_str(&Self::format_row(row));
            output.push('\n');
        }

        output
    }
}

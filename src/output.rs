//! Renders run output to stdout as aligned text tables or JSON documents.
//!
//! Logs go to stderr; this module owns everything written to the report stream.

use crate::db::{QueryResult, Row};
use crate::error::{RentalError, Result};
use crate::schema::SchemaSummary;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;

/// Printed after a successful bootstrap.
pub const SCHEMA_CREATED: &str = "Tables, sample data, view, and procedure created.";

/// Printed for a statement that returned no result set.
pub const STATEMENT_DONE: &str = "Query executed successfully.";

/// Printed for a result set with no rows.
pub const NO_ROWS: &str = "(no rows)";

/// Output format for the report stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Banners and aligned tables.
    #[default]
    Text,
    /// One JSON document per line, per section.
    Json,
}

impl FromStr for OutputFormat {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(RentalError::config(format!(
                "Unknown output format '{other}' (expected 'text' or 'json')"
            ))),
        }
    }
}

/// One section of the run in JSON mode.
#[derive(Debug, Serialize)]
struct SectionDocument<'a> {
    title: &'a str,
    columns: Vec<&'a str>,
    rows: &'a [Row],
    error: Option<String>,
}

/// Writes run sections in the chosen format.
pub struct Printer<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    /// Writes a section banner. Banners are omitted in JSON mode.
    pub fn banner(&mut self, text: &str) -> Result<()> {
        if self.format == OutputFormat::Text {
            writeln!(self.out, "\n---------{text}---------")?;
        }
        Ok(())
    }

    /// Writes the outcome of the schema bootstrap.
    pub fn schema(&mut self, outcome: &Result<SchemaSummary>) -> Result<()> {
        match self.format {
            OutputFormat::Text => match outcome {
                Ok(_) => writeln!(self.out, "{SCHEMA_CREATED}")?,
                Err(e) => writeln!(self.out, "Error creating schema: {}", e.message())?,
            },
            OutputFormat::Json => {
                self.document(SectionDocument {
                    title: "Schema",
                    columns: Vec::new(),
                    rows: &[],
                    error: outcome.as_ref().err().map(ToString::to_string),
                })?;
            }
        }
        Ok(())
    }

    /// Writes the result of a stored procedure call under an existing banner.
    pub fn procedure(&mut self, title: &str, outcome: &Result<QueryResult>) -> Result<()> {
        match (self.format, outcome) {
            (OutputFormat::Text, Ok(result)) => self.table(result),
            (OutputFormat::Text, Err(e)) => {
                writeln!(self.out, "Error in procedure: {}", e.message())?;
                Ok(())
            }
            (OutputFormat::Json, _) => self.json_outcome(title, outcome),
        }
    }

    /// Writes a titled report result.
    pub fn report(&mut self, title: &str, outcome: &Result<QueryResult>) -> Result<()> {
        match (self.format, outcome) {
            (OutputFormat::Text, Ok(result)) => {
                writeln!(self.out, "\n{title}")?;
                self.table(result)
            }
            (OutputFormat::Text, Err(e)) => {
                writeln!(self.out, "\n{title}")?;
                writeln!(self.out, "Error: {}", e.message())?;
                Ok(())
            }
            (OutputFormat::Json, _) => self.json_outcome(title, outcome),
        }
    }

    /// Writes one line per entry, used for listing titles.
    pub fn lines<'a>(&mut self, items: impl IntoIterator<Item = &'a str>) -> Result<()> {
        for item in items {
            writeln!(self.out, "{item}")?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    fn table(&mut self, result: &QueryResult) -> Result<()> {
        writeln!(self.out, "{}", format_table(result))?;
        Ok(())
    }

    fn json_outcome(&mut self, title: &str, outcome: &Result<QueryResult>) -> Result<()> {
        let document = match outcome {
            Ok(result) => SectionDocument {
                title,
                columns: result.columns.iter().map(|c| c.name.as_str()).collect(),
                rows: &result.rows,
                error: None,
            },
            Err(e) => SectionDocument {
                title,
                columns: Vec::new(),
                rows: &[],
                error: Some(e.to_string()),
            },
        };
        self.document(document)
    }

    fn document(&mut self, document: SectionDocument<'_>) -> Result<()> {
        let json = serde_json::to_string(&document)
            .map_err(|e| RentalError::internal(format!("Failed to encode output: {e}")))?;
        writeln!(self.out, "{json}")?;
        Ok(())
    }
}

/// Formats a result as an aligned text table.
///
/// A result without columns came from a statement that returns no result set.
pub fn format_table(result: &QueryResult) -> String {
    if result.columns.is_empty() {
        return STATEMENT_DONE.to_string();
    }

    let headers: Vec<&str> = result.columns.iter().map(|c| c.name.as_str()).collect();
    let cells: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(|v| v.to_display_string()).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let mut output = String::new();
    output.push_str(&join_padded(headers.iter().copied(), &widths));
    output.push('\n');

    let separator: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    output.push_str(&separator.join("─┼─"));
    output.push('\n');

    if cells.is_empty() {
        output.push_str(NO_ROWS);
    }
    for row in &cells {
        output.push_str(&join_padded(row.iter().map(String::as_str), &widths));
        output.push('\n');
    }

    output.trim_end().to_string()
}

fn join_padded<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .enumerate()
        .map(|(i, cell)| {
            let width = widths.get(i).copied().unwrap_or(0);
            format!("{cell:width$}")
        })
        .collect();
    padded.join(" │ ").trim_end().to_string()
}

//! Driver for a bootstrap-and-report run.
//!
//! Sequences the schema definer, the top-N procedure call and the report
//! catalog. Every stage reports its own failure and the run moves on.

use std::io::Write;

use crate::config::{Config, ConnectionConfig, DEFAULT_DATABASE};
use crate::db::{DatabaseClient, Value};
use crate::error::Result;
use crate::output::{OutputFormat, Printer};
use crate::reports;
use crate::schema::{self, TOP_RENTED_COLUMNS, TOP_RENTED_PROCEDURE};
use tracing::{info, warn};

/// Knobs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Database dropped, recreated and reported on.
    pub database: String,
    /// Row limit passed to the top-N procedure.
    pub top_n: u32,
    /// Reuse the existing database instead of recreating it.
    pub skip_schema: bool,
    /// Title filters for the report catalog; empty runs every report.
    pub reports: Vec<String>,
    pub format: OutputFormat,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.to_string(),
            top_n: 3,
            skip_schema: false,
            reports: Vec::new(),
            format: OutputFormat::Text,
        }
    }
}

impl RunOptions {
    /// Builds options from the resolved connection and the config file's run table.
    pub fn from_config(connection: &ConnectionConfig, config: &Config) -> Result<Self> {
        Ok(Self {
            database: connection.database_name().to_string(),
            top_n: config.run.top_n,
            format: config.run.output.parse()?,
            ..Self::default()
        })
    }
}

/// What happened during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// `None` when the schema step was skipped.
    pub schema_created: Option<bool>,
    pub procedure_succeeded: bool,
    pub reports_run: usize,
    pub reports_failed: usize,
}

impl RunSummary {
    /// Returns true if no stage reported a failure.
    pub fn all_succeeded(&self) -> bool {
        self.schema_created != Some(false) && self.procedure_succeeded && self.reports_failed == 0
    }
}

/// Runs the stages in order against one database client.
pub struct App<'a> {
    client: &'a dyn DatabaseClient,
    options: RunOptions,
}

impl<'a> App<'a> {
    pub fn new(client: &'a dyn DatabaseClient, options: RunOptions) -> Self {
        Self { client, options }
    }

    /// Runs schema definition, the procedure call and the reports, writing
    /// every section to `out`.
    ///
    /// Statement failures are reported inline and never abort the run; only a
    /// failure to write output is returned as an error.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<RunSummary> {
        let mut printer = Printer::new(out, self.options.format);
        let mut summary = RunSummary::default();

        printer.banner("Game Rental System Interface")?;

        if self.options.skip_schema {
            info!(database = %self.options.database, "Skipping schema definition");
        } else {
            info!(database = %self.options.database, "Defining schema");
            let outcome = schema::define_schema(self.client, &self.options.database).await;
            if let Err(e) = &outcome {
                warn!(error = %e, "Schema definition failed");
            }
            summary.schema_created = Some(outcome.is_ok());
            printer.schema(&outcome)?;
        }

        let title = format!("Top {} Most Rented Games", self.options.top_n);
        printer.banner(&title)?;
        info!(procedure = TOP_RENTED_PROCEDURE, top_n = self.options.top_n, "Calling procedure");
        let outcome = self
            .client
            .call_procedure(TOP_RENTED_PROCEDURE, &[Value::from(self.options.top_n)])
            .await
            .map(|result| result.or_columns(&TOP_RENTED_COLUMNS));
        if let Err(e) = &outcome {
            warn!(error = %e, "Procedure call failed");
        }
        summary.procedure_succeeded = outcome.is_ok();
        printer.procedure(&title, &outcome)?;

        printer.banner("Queries")?;
        let outcomes = reports::run_catalog(self.client, &self.options.reports).await;
        for report in &outcomes {
            printer.report(&report.title, &report.result)?;
        }
        summary.reports_run = outcomes.len();
        summary.reports_failed = outcomes.iter().filter(|o| !o.is_ok()).count();

        printer.banner("Script completed")?;
        printer.flush()?;

        info!(
            reports = summary.reports_run,
            failed = summary.reports_failed,
            "Run finished"
        );
        Ok(summary)
    }
}

//! Mock database client for testing.
//!
//! Records every statement it is asked to run and answers from scripted
//! responses, so the schema definer, report runner and driver can be
//! exercised without a MySQL server.

use super::{ColumnInfo, DatabaseClient, ExecOutcome, QueryResult, Statement, Value};
use crate::error::{RentalError, Result};
use crate::safety::classify_sql;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// One call observed by the mock, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    /// A single `execute` call.
    Execute(Statement),
    /// An `execute_batch` call with the statements it was given.
    Batch(Vec<Statement>),
    /// A `call_procedure` call.
    Procedure { name: String, args: Vec<Value> },
}

/// A mock database client that returns predefined results.
#[derive(Default)]
pub struct MockDatabaseClient {
    responses: Vec<(String, QueryResult)>,
    failures: Vec<String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockDatabaseClient {
    /// Creates a new mock that answers every query with an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers statements whose SQL contains `pattern` with `result`.
    pub fn respond_with(mut self, pattern: impl Into<String>, result: QueryResult) -> Self {
        self.responses.push((pattern.into(), result));
        self
    }

    /// Fails statements (or procedure names) containing `pattern`.
    pub fn fail_on(mut self, pattern: impl Into<String>) -> Self {
        self.failures.push(pattern.into());
        self
    }

    /// Returns every call made so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: RecordedCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn failure_for(&self, text: &str) -> Option<&str> {
        self.failures
            .iter()
            .find(|pattern| text.contains(pattern.as_str()))
            .map(String::as_str)
    }

    fn response_for(&self, sql: &str) -> QueryResult {
        self.responses
            .iter()
            .find(|(pattern, _)| sql.contains(pattern.as_str()))
            .map(|(_, result)| result.clone())
            .unwrap_or_else(|| {
                QueryResult::with_data(vec![ColumnInfo::new("result", "VARCHAR")], Vec::new())
            })
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute(&self, statement: &Statement) -> Result<ExecOutcome> {
        self.record(RecordedCall::Execute(statement.clone()));

        if let Some(pattern) = self.failure_for(&statement.sql) {
            return Err(RentalError::query(format!("mock failure on '{pattern}'")));
        }

        if classify_sql(&statement.sql).produces_rows() {
            Ok(ExecOutcome::Rows(
                self.response_for(&statement.sql)
                    .with_execution_time(Duration::from_millis(1)),
            ))
        } else {
            Ok(ExecOutcome::Affected {
                rows_affected: 0,
                execution_time: Duration::from_millis(1),
            })
        }
    }

    async fn execute_batch(&self, statements: &[Statement]) -> Result<usize> {
        self.record(RecordedCall::Batch(statements.to_vec()));

        for (executed, statement) in statements.iter().enumerate() {
            if let Some(pattern) = self.failure_for(&statement.sql) {
                return Err(RentalError::query(format!(
                    "{}: mock failure on '{pattern}' after {executed} statements",
                    statement.label
                )));
            }
        }
        Ok(statements.len())
    }

    async fn call_procedure(&self, name: &str, args: &[Value]) -> Result<QueryResult> {
        self.record(RecordedCall::Procedure {
            name: name.to_string(),
            args: args.to_vec(),
        });

        if let Some(pattern) = self.failure_for(name) {
            return Err(RentalError::procedure(format!(
                "mock failure on '{pattern}'"
            )));
        }
        Ok(self.response_for(name))
    }
}

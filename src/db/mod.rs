//! Database abstraction layer for game-rental.
//!
//! Provides a trait-based interface for statement execution, so the schema
//! definer, report runner and driver work against MySQL or an in-memory mock.

mod mock;
mod mysql;
mod types;

pub use mock::{MockDatabaseClient, RecordedCall};
pub use mysql::MySqlClient;
pub use types::{ColumnInfo, ExecOutcome, QueryResult, Row, Statement, Value};

use crate::error::Result;
use async_trait::async_trait;

/// Trait defining the interface for database clients.
///
/// Every call opens its own connection and releases it before returning,
/// on success and on failure alike.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes one statement against the configured database.
    ///
    /// Returns the rows if the statement produces a result set, otherwise
    /// commits and returns the affected row count.
    async fn execute(&self, statement: &Statement) -> Result<ExecOutcome>;

    /// Executes statements in order on one connection with no default
    /// database selected, stopping at the first failure.
    ///
    /// Returns the number of statements executed.
    async fn execute_batch(&self, statements: &[Statement]) -> Result<usize>;

    /// Calls a stored procedure and flattens every result set it yields.
    async fn call_procedure(&self, name: &str, args: &[Value]) -> Result<QueryResult>;
}

/// Returns true if `name` is safe to splice into SQL as a bare identifier.
pub fn is_plain_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit())
}

/// Builds the `CALL name(?, ?, ...)` text for a procedure invocation.
pub fn call_sql(name: &str, arg_count: usize) -> String {
    let placeholders = vec!["?"; arg_count].join(", ");
    format!("CALL {name}({placeholders})")
}

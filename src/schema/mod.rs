//! Schema definer: (re)creates the GameRental database from scratch.
//!
//! The bootstrap drops the database, recreates every table, loads the sample
//! rows and defines the revenue view and the top-N procedure, in that order.

pub mod ddl;
pub mod seed;

use crate::db::{is_plain_identifier, DatabaseClient, Statement};
use crate::error::{RentalError, Result};
use tracing::{debug, info};

pub use ddl::{REVENUE_VIEW, TABLES, TOP_RENTED_COLUMNS, TOP_RENTED_PROCEDURE};

/// What a successful bootstrap did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSummary {
    pub database: String,
    pub statements_executed: usize,
}

/// Returns the full ordered statement list for bootstrapping `database`.
///
/// Order: database, tables, sample rows, view, procedure.
pub fn bootstrap_statements(database: &str) -> Vec<Statement> {
    let mut statements = ddl::database_statements(database);
    statements.extend(ddl::table_statements());
    statements.extend(seed::seed_statements());
    statements.extend(ddl::view_statements());
    statements.extend(ddl::procedure_statements());
    statements
}

/// Drops and recreates `database` with its tables, sample rows, view and
/// procedure.
///
/// Destructive: any existing database of that name is lost. Stops at the
/// first failing statement; earlier statements are not rolled back.
pub async fn define_schema(client: &dyn DatabaseClient, database: &str) -> Result<SchemaSummary> {
    if !is_plain_identifier(database) {
        return Err(RentalError::schema(format!(
            "Invalid database name '{database}': use letters, digits and underscores"
        )));
    }

    let statements = bootstrap_statements(database);
    debug!(count = statements.len(), "Bootstrap statements prepared");

    let executed = client
        .execute_batch(&statements)
        .await
        .map_err(|e| RentalError::schema(e.message()))?;

    info!(database, executed, "Schema defined");
    Ok(SchemaSummary {
        database: database.to_string(),
        statements_executed: executed,
    })
}

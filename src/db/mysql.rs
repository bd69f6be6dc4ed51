//! MySQL database client implementation.
//!
//! Provides the `MySqlClient` struct that implements the `DatabaseClient` trait
//! using sqlx. There is no pool: each operation opens a connection, does its
//! work and closes the connection again.

use crate::config::ConnectionConfig;
use crate::db::{
    call_sql, is_plain_identifier, ColumnInfo, DatabaseClient, ExecOutcome, QueryResult, Row,
    Statement, Value,
};
use crate::error::{RentalError, Result};
use crate::safety::classify_sql;
use async_trait::async_trait;
use chrono::NaiveDate;
use futures::TryStreamExt;
use rust_decimal::Decimal;
use sqlx::mysql::{MySql, MySqlArguments, MySqlConnection, MySqlDatabaseError, MySqlRow};
use sqlx::query::Query;
use sqlx::{
    Column as SqlxColumn, Connection, Either, Executor, Row as SqlxRow,
    Statement as SqlxStatement, TypeInfo,
};
use std::time::Instant;
use tracing::{debug, warn};

/// MySQL database client.
#[derive(Debug, Clone)]
pub struct MySqlClient {
    config: ConnectionConfig,
}

impl MySqlClient {
    /// Creates a client for the given connection target.
    ///
    /// No connection is opened until the first operation.
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }

    /// Returns the connection target this client uses.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Opens a fresh connection, optionally selecting the configured database.
    async fn open(&self, with_database: bool) -> Result<MySqlConnection> {
        let options = self.config.connect_options(with_database);
        debug!("Opening connection to {}", self.config.display_string());
        MySqlConnection::connect_with(&options)
            .await
            .map_err(|e| map_connection_error(e, &self.config))
    }

    /// Closes a connection, logging rather than failing if the close itself errors.
    async fn release(conn: MySqlConnection) {
        if let Err(e) = conn.close().await {
            warn!("Failed to close connection cleanly: {e}");
        }
    }
}

#[async_trait]
impl DatabaseClient for MySqlClient {
    async fn execute(&self, statement: &Statement) -> Result<ExecOutcome> {
        let mut conn = self.open(true).await?;
        let outcome = run_statement(&mut conn, statement).await;
        Self::release(conn).await;
        outcome
    }

    async fn execute_batch(&self, statements: &[Statement]) -> Result<usize> {
        let mut conn = self.open(false).await?;
        let mut executed = 0;
        let mut failure = None;

        for statement in statements {
            debug!("Batch step {}: {}", executed + 1, statement.label);
            if let Err(e) = execute_plain(&mut conn, statement).await {
                failure = Some(RentalError::query(format!(
                    "{}: {}",
                    statement.label,
                    format_query_error(e)
                )));
                break;
            }
            executed += 1;
        }

        Self::release(conn).await;
        match failure {
            Some(err) => Err(err),
            None => Ok(executed),
        }
    }

    async fn call_procedure(&self, name: &str, args: &[Value]) -> Result<QueryResult> {
        if !is_plain_identifier(name) {
            return Err(RentalError::procedure(format!(
                "'{name}' is not a valid procedure name"
            )));
        }

        let mut conn = self
            .open(true)
            .await
            .map_err(|e| RentalError::procedure(e.message()))?;
        let result = run_procedure(&mut conn, name, args).await;
        Self::release(conn).await;
        result
    }
}

/// Runs one statement on an open connection.
async fn run_statement(conn: &mut MySqlConnection, statement: &Statement) -> Result<ExecOutcome> {
    let classification = classify_sql(&statement.sql);
    let start = Instant::now();

    if classification.produces_rows() {
        let rows = fetch_rows(conn, statement)
            .await
            .map_err(|e| RentalError::query(format_query_error(e)))?;
        let execution_time = start.elapsed();

        let columns = match rows.first() {
            Some(first) => column_info(first),
            None => fetch_column_metadata(conn, &statement.sql).await,
        };
        let rows: Vec<Row> = rows.iter().map(convert_row).collect();
        debug!(
            "{} returned {} rows in {:?}",
            statement.label,
            rows.len(),
            execution_time
        );

        return Ok(ExecOutcome::Rows(
            QueryResult::with_data(columns, rows).with_execution_time(execution_time),
        ));
    }

    let rows_affected = execute_committed(conn, statement)
        .await
        .map_err(|e| RentalError::query(format_query_error(e)))?;
    let execution_time = start.elapsed();
    debug!(
        "{} affected {} rows in {:?}",
        statement.label, rows_affected, execution_time
    );

    Ok(ExecOutcome::Affected {
        rows_affected,
        execution_time,
    })
}

/// Fetches all rows; a bare `&str` carries no arguments and goes over the text protocol.
async fn fetch_rows(
    conn: &mut MySqlConnection,
    statement: &Statement,
) -> std::result::Result<Vec<MySqlRow>, sqlx::Error> {
    if statement.has_params() {
        bind_all(sqlx::query(&statement.sql), &statement.params)
            .fetch_all(&mut *conn)
            .await
    } else {
        (&mut *conn).fetch_all(statement.sql.as_str()).await
    }
}

/// Executes a non-query statement inside a transaction and commits it.
async fn execute_committed(
    conn: &mut MySqlConnection,
    statement: &Statement,
) -> std::result::Result<u64, sqlx::Error> {
    let mut tx = conn.begin().await?;
    let result = if statement.has_params() {
        bind_all(sqlx::query(&statement.sql), &statement.params)
            .execute(&mut *tx)
            .await?
    } else {
        (&mut *tx).execute(statement.sql.as_str()).await?
    };
    tx.commit().await?;
    Ok(result.rows_affected())
}

/// Executes a statement under autocommit (used for schema batches).
async fn execute_plain(
    conn: &mut MySqlConnection,
    statement: &Statement,
) -> std::result::Result<u64, sqlx::Error> {
    let result = if statement.has_params() {
        bind_all(sqlx::query(&statement.sql), &statement.params)
            .execute(&mut *conn)
            .await?
    } else {
        (&mut *conn).execute(statement.sql.as_str()).await?
    };
    Ok(result.rows_affected())
}

/// Calls a procedure and collects the rows of every result set, in order.
async fn run_procedure(
    conn: &mut MySqlConnection,
    name: &str,
    args: &[Value],
) -> Result<QueryResult> {
    let sql = call_sql(name, args.len());
    let start = Instant::now();
    let mut rows = Vec::new();
    let mut result_sets = 0usize;
    let mut rows_in_current_set = 0usize;

    {
        let mut stream = (&mut *conn).fetch_many(bind_all(sqlx::query(&sql), args));
        while let Some(item) = stream
            .try_next()
            .await
            .map_err(|e| RentalError::procedure(format_query_error(e)))?
        {
            match item {
                Either::Left(_) => {
                    if rows_in_current_set > 0 {
                        result_sets += 1;
                    }
                    rows_in_current_set = 0;
                }
                Either::Right(row) => {
                    rows_in_current_set += 1;
                    rows.push(row);
                }
            }
        }
    }
    if rows_in_current_set > 0 {
        result_sets += 1;
    }

    let execution_time = start.elapsed();
    debug!(
        "{} yielded {} rows across {} result sets in {:?}",
        sql,
        rows.len(),
        result_sets,
        execution_time
    );

    // Column metadata only arrives with a row; callers name an empty set.
    let columns = rows.first().map(column_info).unwrap_or_default();
    let rows: Vec<Row> = rows.iter().map(convert_row).collect();
    Ok(QueryResult::with_data(columns, rows).with_execution_time(execution_time))
}

/// Binds every value positionally.
fn bind_all<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &'q [Value],
) -> Query<'q, MySql, MySqlArguments> {
    for value in params {
        query = match value {
            Value::Null => query.bind(None::<String>),
            Value::Bool(b) => query.bind(*b),
            Value::Int(i) => query.bind(*i),
            Value::UInt(u) => query.bind(*u),
            Value::Float(f) => query.bind(*f),
            Value::Decimal(d) => query.bind(*d),
            Value::Date(d) => query.bind(*d),
            Value::String(s) => query.bind(s.as_str()),
            Value::Bytes(b) => query.bind(b.as_slice()),
        };
    }
    query
}

/// Column metadata for an empty result, taken from the prepared statement.
///
/// Best effort: statements MySQL will not prepare yield no columns.
async fn fetch_column_metadata(conn: &mut MySqlConnection, sql: &str) -> Vec<ColumnInfo> {
    match (&mut *conn).prepare(sql).await {
        Ok(prepared) => prepared
            .columns()
            .iter()
            .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
            .collect(),
        Err(e) => {
            debug!("Could not prepare statement for column metadata: {e}");
            Vec::new()
        }
    }
}

fn column_info(row: &MySqlRow) -> Vec<ColumnInfo> {
    row.columns()
        .iter()
        .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
        .collect()
}

/// Converts a sqlx MySqlRow to our Row type.
fn convert_row(row: &MySqlRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_info().name()))
        .collect()
}

/// Converts a single column value from a MySqlRow to our Value type.
fn convert_value(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    let upper = type_name.to_uppercase();
    let unsigned = upper.ends_with("UNSIGNED");

    let decoded = match upper.split_whitespace().next().unwrap_or_default() {
        "BOOLEAN" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .map(|v| v.map(Value::Bool)),

        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" if unsigned => row
            .try_get::<Option<u64>, _>(index)
            .ok()
            .map(|v| v.map(|u| i64::try_from(u).map(Value::Int).unwrap_or(Value::UInt(u)))),

        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .map(|v| v.map(Value::Int)),

        "FLOAT" => row
            .try_get::<Option<f32>, _>(index)
            .ok()
            .map(|v| v.map(|f| Value::Float(f as f64))),

        "DOUBLE" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .map(|v| v.map(Value::Float)),

        "DECIMAL" => row
            .try_get::<Option<Decimal>, _>(index)
            .ok()
            .map(|v| v.map(Value::Decimal)),

        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(index)
            .ok()
            .map(|v| v.map(Value::Date)),

        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .map(|v| v.map(Value::Bytes)),

        _ => None,
    };

    // For all other types (or a failed typed decode), try to get as string
    decoded
        .unwrap_or_else(|| {
            row.try_get_unchecked::<Option<String>, _>(index)
                .ok()
                .flatten()
                .map(Value::String)
        })
        .unwrap_or(Value::Null)
}

/// Maps sqlx connection errors to user-friendly messages.
fn map_connection_error(error: sqlx::Error, config: &ConnectionConfig) -> RentalError {
    let host = config.host.as_deref().unwrap_or("localhost");
    let port = config.port();
    let user = config.user.as_deref().unwrap_or("root");
    let database = config.database_name();

    let error_str = error.to_string().to_lowercase();

    if error_str.contains("connection refused") || error_str.contains("could not connect") {
        RentalError::connection(format!(
            "Cannot connect to {host}:{port}. Check that the server is running."
        ))
    } else if error_str.contains("access denied") {
        RentalError::connection(format!(
            "Access denied for user '{user}'. Check your credentials."
        ))
    } else if error_str.contains("unknown database") {
        RentalError::connection(format!(
            "Database '{database}' does not exist. Run without --skip-schema to create it."
        ))
    } else if error_str.contains("timed out") || error_str.contains("timeout") {
        RentalError::connection(format!(
            "Connection to {host}:{port} timed out. The server may be overloaded or unreachable."
        ))
    } else {
        RentalError::connection(error.to_string())
    }
}

/// Formats a statement error, including the MySQL error number and SQLSTATE.
fn format_query_error(error: sqlx::Error) -> String {
    match error.as_database_error() {
        Some(db_error) => match db_error.try_downcast_ref::<MySqlDatabaseError>() {
            Some(mysql_error) => match mysql_error.code() {
                Some(state) => format!(
                    "ERROR {} ({}): {}",
                    mysql_error.number(),
                    state,
                    mysql_error.message()
                ),
                None => format!("ERROR {}: {}", mysql_error.number(), mysql_error.message()),
            },
            None => format!("ERROR: {}", db_error.message()),
        },
        None => error.to_string(),
    }
}

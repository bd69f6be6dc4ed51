//! Statement and result types for game-rental.
//!
//! Defines the structures used to describe statements sent to the database
//! and the results that come back.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// A single SQL statement with positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Short human label used in logs and error messages.
    pub label: String,

    /// SQL text, `?` placeholders for parameters.
    pub sql: String,

    /// Positional parameter values.
    pub params: Vec<Value>,
}

impl Statement {
    /// Creates a parameterless statement labelled with its own SQL.
    pub fn new(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        Self {
            label: summarize(&sql),
            sql,
            params: Vec::new(),
        }
    }

    /// Creates a parameterless statement with an explicit label.
    pub fn labelled(label: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Appends a positional parameter.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    /// Replaces all positional parameters.
    pub fn with_params(mut self, params: Vec<Value>) -> Self {
        self.params = params;
        self
    }

    /// Returns true if the statement carries bound parameters.
    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }
}

/// First line of the SQL, trimmed, used as a fallback label.
fn summarize(sql: &str) -> String {
    let line = sql
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default();
    if line.chars().count() > 60 {
        let cut: String = line.chars().take(57).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}

/// Outcome of executing one statement.
#[derive(Debug, Clone)]
pub enum ExecOutcome {
    /// The statement produced a result set.
    Rows(QueryResult),

    /// The statement changed data and was committed.
    Affected {
        /// Rows inserted, updated or deleted.
        rows_affected: u64,
        /// Time taken to execute and commit.
        execution_time: Duration,
    },
}

impl ExecOutcome {
    /// Returns the result set, if the statement produced one.
    pub fn into_rows(self) -> Option<QueryResult> {
        match self {
            Self::Rows(result) => Some(result),
            Self::Affected { .. } => None,
        }
    }
}

/// Represents the result of executing a SQL query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryResult {
    /// Column metadata for the result set.
    pub columns: Vec<ColumnInfo>,

    /// Rows of data.
    pub rows: Vec<Row>,

    /// Time taken to execute the query.
    #[serde(rename = "execution_time_ms", serialize_with = "duration_millis")]
    pub execution_time: Duration,

    /// Number of rows in the result.
    pub row_count: usize,
}

impl QueryResult {
    /// Creates a new empty query result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query result with the given columns and rows.
    pub fn with_data(columns: Vec<ColumnInfo>, rows: Vec<Row>) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            execution_time: Duration::ZERO,
            row_count,
        }
    }

    /// Sets the execution time.
    pub fn with_execution_time(mut self, duration: Duration) -> Self {
        self.execution_time = duration;
        self
    }

    /// Returns true if the result set is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the index of the named column (case-insensitive).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Fills in column names when the driver reported none.
    ///
    /// MySQL only describes a procedure's result set alongside its first row,
    /// so an empty set arrives without columns.
    pub fn or_columns(mut self, names: &[&str]) -> Self {
        if self.columns.is_empty() {
            self.columns = names.iter().map(|name| ColumnInfo::new(*name, "")).collect();
        }
        self
    }
}

fn duration_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Metadata about a column in a result set.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,

    /// Column data type.
    pub data_type: String,
}

impl ColumnInfo {
    /// Creates a new column info with the given name and type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// A row of data from a query result.
pub type Row = Vec<Value>;

/// A single value sent to or read from the database.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Boolean value.
    Bool(bool),

    /// Signed integer (up to i64).
    Int(i64),

    /// Unsigned integer that does not fit i64.
    UInt(u64),

    /// Floating point number.
    Float(f64),

    /// Exact decimal (DECIMAL/NUMERIC columns, SUM/AVG over them).
    Decimal(Decimal),

    /// Calendar date.
    Date(NaiveDate),

    /// Text/string value.
    String(String),

    /// Binary data.
    Bytes(Vec<u8>),
}

impl Value {
    /// Returns the value as an i64 if it is integral.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::UInt(u) => i64::try_from(*u).ok(),
            Value::Decimal(d) if d.fract().is_zero() => d.to_string().parse().ok(),
            _ => None,
        }
    }

    /// Returns the value as a string slice if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to convert the value to a string representation.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::UInt(u) => u.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::String(s) => s.clone(),
            Value::Bytes(b) => format!("<{} bytes>", b.len()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

// Conversion implementations for common types
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

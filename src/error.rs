//! Error types for game-rental.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for game-rental operations.
#[derive(Error, Debug)]
pub enum RentalError {
    /// Database connection errors (host unreachable, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// A DDL or seed statement failed while (re)creating the schema.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Query execution errors (syntax errors, constraint violations, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Stored procedure invocation errors.
    #[error("Procedure error: {0}")]
    Procedure(String),

    /// Configuration errors (invalid config file, bad connection string, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RentalError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a schema error with the given message.
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a procedure error with the given message.
    pub fn procedure(msg: impl Into<String>) -> Self {
        Self::Procedure(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Connection(m)
            | Self::Schema(m)
            | Self::Query(m)
            | Self::Procedure(m)
            | Self::Config(m)
            | Self::Internal(m) => m,
        }
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Schema(_) => "Schema Error",
            Self::Query(_) => "Query Error",
            Self::Procedure(_) => "Procedure Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

impl From<std::io::Error> for RentalError {
    fn from(e: std::io::Error) -> Self {
        Self::internal(format!("Failed to write output: {e}"))
    }
}

/// Result type alias using RentalError.
pub type Result<T> = std::result::Result<T, RentalError>;

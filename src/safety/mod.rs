//! Statement classification module.
//!
//! Parses SQL and classifies statements as safe, mutating, or destructive.
//! The report runner uses the level to keep the catalog read-only, and the
//! executor uses the statement type to decide between fetching rows and
//! committing.

mod parser;

pub use parser::{classify_sql, SqlClassifier};

use std::fmt;

/// Safety level classification for SQL statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SafetyLevel {
    /// Read-only statements (SELECT, EXPLAIN, SHOW).
    Safe,
    /// Data modification (INSERT, UPDATE, CALL).
    Mutating,
    /// Data loss or schema changes (DELETE, DROP, CREATE, ALTER).
    Destructive,
}

impl SafetyLevel {
    /// Returns a priority value (higher = more dangerous).
    pub(crate) fn priority(self) -> u8 {
        match self {
            Self::Safe => 0,
            Self::Mutating => 1,
            Self::Destructive => 2,
        }
    }
}

impl fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => write!(f, "Safe"),
            Self::Mutating => write!(f, "Mutating"),
            Self::Destructive => write!(f, "Destructive"),
        }
    }
}

/// The type of SQL statement detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementType {
    Select,
    Insert,
    Update,
    Delete,
    Drop,
    Truncate,
    Alter,
    Create,
    Grant,
    Revoke,
    Explain,
    Show,
    Call,
    Use,
    /// Multiple statements detected; contains the most dangerous type.
    Multiple(Box<StatementType>),
    /// Statement type could not be determined.
    Unknown,
}

impl StatementType {
    /// Returns true if executing this statement yields a result set.
    pub fn produces_rows(&self) -> bool {
        match self {
            Self::Select | Self::Explain | Self::Show | Self::Call => true,
            Self::Multiple(inner) => inner.produces_rows(),
            _ => false,
        }
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select => write!(f, "SELECT"),
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::Drop => write!(f, "DROP"),
            Self::Truncate => write!(f, "TRUNCATE"),
            Self::Alter => write!(f, "ALTER"),
            Self::Create => write!(f, "CREATE"),
            Self::Grant => write!(f, "GRANT"),
            Self::Revoke => write!(f, "REVOKE"),
            Self::Explain => write!(f, "EXPLAIN"),
            Self::Show => write!(f, "SHOW"),
            Self::Call => write!(f, "CALL"),
            Self::Use => write!(f, "USE"),
            Self::Multiple(inner) => write!(f, "Multiple ({})", inner),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Result of classifying a SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    /// The determined safety level.
    pub level: SafetyLevel,
    /// The type of statement(s) detected.
    pub statement_type: StatementType,
}

impl ClassificationResult {
    /// Creates a new classification result.
    pub fn new(level: SafetyLevel, statement_type: StatementType) -> Self {
        Self {
            level,
            statement_type,
        }
    }

    /// Returns true if the statement cannot change data or schema.
    pub fn is_read_only(&self) -> bool {
        self.level == SafetyLevel::Safe
    }

    /// Returns true if executing the statement yields a result set.
    pub fn produces_rows(&self) -> bool {
        self.statement_type.produces_rows()
    }
}

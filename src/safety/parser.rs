//! SQL parsing and classification logic.
//!
//! Uses sqlparser-rs with the MySQL dialect. Statements the parser does not
//! understand (stored procedure bodies, some MySQL-only syntax) fall back to
//! a leading-keyword check.

use sqlparser::ast::{Query, Select, SetExpr, Statement, TableFactor, TableWithJoins};
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;

use super::{ClassificationResult, SafetyLevel, StatementType};

/// SQL classifier that parses and classifies SQL statements.
#[derive(Debug)]
pub struct SqlClassifier {
    dialect: MySqlDialect,
}

impl Default for SqlClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlClassifier {
    /// Creates a new SQL classifier.
    pub fn new() -> Self {
        Self {
            dialect: MySqlDialect {},
        }
    }

    /// Classifies a SQL string.
    pub fn classify(&self, sql: &str) -> ClassificationResult {
        match Parser::parse_sql(&self.dialect, sql) {
            Ok(statements) if !statements.is_empty() => classify_statements(&statements),
            _ => classify_by_keyword(sql),
        }
    }
}

/// Convenience function to classify SQL without creating a classifier instance.
pub fn classify_sql(sql: &str) -> ClassificationResult {
    SqlClassifier::new().classify(sql)
}

fn classify_statements(statements: &[Statement]) -> ClassificationResult {
    if let [single] = statements {
        let (level, stmt_type) = classify_statement(single);
        return ClassificationResult::new(level, stmt_type);
    }

    let (level, stmt_type) = statements
        .iter()
        .map(classify_statement)
        .fold((SafetyLevel::Safe, StatementType::Unknown), max_of);
    ClassificationResult::new(level, StatementType::Multiple(Box::new(stmt_type)))
}

fn max_of(
    current: (SafetyLevel, StatementType),
    candidate: (SafetyLevel, StatementType),
) -> (SafetyLevel, StatementType) {
    if candidate.0.priority() > current.0.priority() || current.1 == StatementType::Unknown {
        candidate
    } else {
        current
    }
}

/// Classifies by the first keyword when the parser rejects the text.
fn classify_by_keyword(sql: &str) -> ClassificationResult {
    let keyword = sql
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("--"))
        .flat_map(str::split_whitespace)
        .next()
        .map(|w| {
            w.trim_end_matches(|c: char| !c.is_ascii_alphabetic())
                .to_ascii_uppercase()
        })
        .unwrap_or_default();

    let (level, stmt_type) = match keyword.as_str() {
        "SELECT" | "WITH" => (SafetyLevel::Safe, StatementType::Select),
        "SHOW" | "DESCRIBE" | "DESC" => (SafetyLevel::Safe, StatementType::Show),
        "EXPLAIN" => (SafetyLevel::Safe, StatementType::Explain),
        "USE" => (SafetyLevel::Safe, StatementType::Use),
        "CALL" => (SafetyLevel::Mutating, StatementType::Call),
        "INSERT" | "REPLACE" => (SafetyLevel::Mutating, StatementType::Insert),
        "UPDATE" => (SafetyLevel::Mutating, StatementType::Update),
        "DELETE" => (SafetyLevel::Destructive, StatementType::Delete),
        "DROP" => (SafetyLevel::Destructive, StatementType::Drop),
        "TRUNCATE" => (SafetyLevel::Destructive, StatementType::Truncate),
        "ALTER" => (SafetyLevel::Destructive, StatementType::Alter),
        "CREATE" => (SafetyLevel::Destructive, StatementType::Create),
        _ => (SafetyLevel::Destructive, StatementType::Unknown),
    };
    ClassificationResult::new(level, stmt_type)
}

/// Classifies a single parsed statement.
fn classify_statement(statement: &Statement) -> (SafetyLevel, StatementType) {
    match statement {
        // Query: may contain data-modifying CTEs, so recurse
        Statement::Query(query) => classify_query(query),
        Statement::Explain {
            analyze, statement, ..
        } => {
            if *analyze {
                let (inner_level, _) = classify_statement(statement);
                (inner_level, StatementType::Explain)
            } else {
                (SafetyLevel::Safe, StatementType::Explain)
            }
        }
        Statement::ShowVariable { .. }
        | Statement::ShowTables { .. }
        | Statement::ShowColumns { .. }
        | Statement::ShowCreate { .. }
        | Statement::ShowFunctions { .. }
        | Statement::ShowStatus { .. }
        | Statement::ShowCollation { .. } => (SafetyLevel::Safe, StatementType::Show),

        Statement::Call { .. } => (SafetyLevel::Mutating, StatementType::Call),
        Statement::Insert(_) => (SafetyLevel::Mutating, StatementType::Insert),
        Statement::Update { .. } => (SafetyLevel::Mutating, StatementType::Update),

        Statement::Delete(_) => (SafetyLevel::Destructive, StatementType::Delete),
        Statement::Drop { .. } => (SafetyLevel::Destructive, StatementType::Drop),
        Statement::Truncate { .. } => (SafetyLevel::Destructive, StatementType::Truncate),
        Statement::AlterTable { .. } | Statement::AlterView { .. } => {
            (SafetyLevel::Destructive, StatementType::Alter)
        }
        Statement::CreateTable { .. }
        | Statement::CreateIndex { .. }
        | Statement::CreateView { .. }
        | Statement::CreateDatabase { .. }
        | Statement::CreateFunction { .. }
        | Statement::CreateProcedure { .. } => (SafetyLevel::Destructive, StatementType::Create),
        Statement::Grant { .. } => (SafetyLevel::Destructive, StatementType::Grant),
        Statement::Revoke { .. } => (SafetyLevel::Destructive, StatementType::Revoke),

        // Conservative default: treat unknown statements as destructive
        _ => (SafetyLevel::Destructive, StatementType::Unknown),
    }
}

/// Classifies a Query, recursing into CTEs and the body.
fn classify_query(query: &Query) -> (SafetyLevel, StatementType) {
    let mut result = (SafetyLevel::Safe, StatementType::Select);

    if let Some(with) = &query.with {
        for cte in &with.cte_tables {
            result = max_of(result, classify_query(&cte.query));
        }
    }

    max_of(result, classify_set_expr(&query.body))
}

/// Classifies a SetExpr, detecting mutations and recursing into nested queries.
fn classify_set_expr(set_expr: &SetExpr) -> (SafetyLevel, StatementType) {
    match set_expr {
        SetExpr::Update(stmt) | SetExpr::Insert(stmt) => classify_statement(stmt),
        SetExpr::Query(query) => classify_query(query),
        SetExpr::Select(select) => classify_select(select),
        SetExpr::SetOperation { left, right, .. } => {
            max_of(classify_set_expr(left), classify_set_expr(right))
        }
        _ => (SafetyLevel::Safe, StatementType::Select),
    }
}

/// Classifies a Select by checking its FROM clause for subqueries.
fn classify_select(select: &Select) -> (SafetyLevel, StatementType) {
    select.from.iter().map(classify_table_with_joins).fold(
        (SafetyLevel::Safe, StatementType::Select),
        max_of,
    )
}

/// Classifies a TableWithJoins, checking the main relation and all joins.
fn classify_table_with_joins(twj: &TableWithJoins) -> (SafetyLevel, StatementType) {
    twj.joins
        .iter()
        .map(|join| classify_table_factor(&join.relation))
        .fold(classify_table_factor(&twj.relation), max_of)
}

/// Classifies a TableFactor, recursing into derived tables (subqueries).
fn classify_table_factor(factor: &TableFactor) -> (SafetyLevel, StatementType) {
    match factor {
        TableFactor::Derived { subquery, .. } => classify_query(subquery),
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => classify_table_with_joins(table_with_joins),
        _ => (SafetyLevel::Safe, StatementType::Select),
    }
}

//! Report catalog: the fixed battery of read-only analytical queries.
//!
//! Each report runs on its own connection through the [`DatabaseClient`],
//! and a failing report never stops the ones after it.

use crate::db::{DatabaseClient, ExecOutcome, QueryResult, Statement};
use crate::error::{RentalError, Result};
use crate::safety::classify_sql;
use tracing::{debug, warn};

/// A named read-only query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub title: &'static str,
    pub sql: &'static str,
}

/// The result of running one report.
#[derive(Debug)]
pub struct ReportOutcome {
    pub title: String,
    pub result: Result<QueryResult>,
}

impl ReportOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

const CATALOG: [Report; 15] = [
    Report {
        title: "Gamers with more than 2 rentals",
        sql: "SELECT GamerID, COUNT(*) AS RentalCount \
              FROM Rentals \
              GROUP BY GamerID \
              HAVING RentalCount > 2",
    },
    Report {
        title: "Total revenue from rentals",
        sql: "SELECT * FROM View_TotalRevenue",
    },
    Report {
        title: "Most rented game",
        sql: "SELECT G.Title, COUNT(*) AS TimesRented \
              FROM Rentals R \
              JOIN Games G ON R.GameCode = G.GameCode \
              GROUP BY G.GameCode \
              ORDER BY TimesRented DESC \
              LIMIT 1",
    },
    Report {
        title: "Games never rented",
        sql: "SELECT Title FROM Games \
              WHERE GameCode NOT IN (SELECT GameCode FROM Rentals)",
    },
    Report {
        title: "Average rental fee by genre",
        sql: "SELECT Genre, AVG(RentalFee) FROM Games GROUP BY Genre",
    },
    Report {
        title: "Games returned late (more than 7 days)",
        sql: "SELECT RentalID, DATEDIFF(ReturnDate, RentalDate) AS DaysRented \
              FROM Rentals \
              WHERE DATEDIFF(ReturnDate, RentalDate) > 7",
    },
    Report {
        title: "Most active gamer",
        sql: "SELECT GamerID, COUNT(*) AS Rentals \
              FROM Rentals \
              GROUP BY GamerID \
              ORDER BY Rentals DESC \
              LIMIT 1",
    },
    Report {
        title: "Average salary by role",
        sql: "SELECT Role, AVG(Salary) FROM Staff GROUP BY Role",
    },
    Report {
        title: "Games rented more than once",
        sql: "SELECT GameCode, COUNT(*) AS TimesRented \
              FROM Rentals \
              GROUP BY GameCode \
              HAVING TimesRented > 1",
    },
    Report {
        title: "Games rented in last 30 days",
        sql: "SELECT * FROM Rentals \
              WHERE RentalDate >= CURDATE() - INTERVAL 30 DAY",
    },
    Report {
        title: "Gamer with earliest signup",
        sql: "SELECT * FROM Gamers ORDER BY SignupDate LIMIT 1",
    },
    Report {
        title: "Number of rentals per platform",
        sql: "SELECT Platform, COUNT(*) AS RentalCount \
              FROM Rentals R \
              JOIN Games G ON R.GameCode = G.GameCode \
              GROUP BY Platform",
    },
    Report {
        title: "Game count by developer",
        sql: "SELECT Developer, COUNT(*) FROM Games GROUP BY Developer",
    },
    Report {
        title: "Most popular genre",
        sql: "SELECT Genre, COUNT(*) AS Count \
              FROM Rentals R JOIN Games G ON R.GameCode = G.GameCode \
              GROUP BY Genre ORDER BY Count DESC LIMIT 1",
    },
    Report {
        title: "Staff count per game center",
        sql: "SELECT CenterID, COUNT(*) FROM Staff GROUP BY CenterID",
    },
];

/// Every report, in execution order.
pub fn catalog() -> &'static [Report] {
    &CATALOG
}

/// Looks up a report by its exact title.
pub fn find(title: &str) -> Option<&'static Report> {
    CATALOG.iter().find(|r| r.title == title)
}

/// Reports whose title contains any of `filters` (case-insensitive).
///
/// An empty filter list selects the whole catalog. Catalog order is kept.
pub fn select(filters: &[String]) -> Vec<&'static Report> {
    if filters.is_empty() {
        return CATALOG.iter().collect();
    }

    let needles: Vec<String> = filters.iter().map(|f| f.to_lowercase()).collect();
    CATALOG
        .iter()
        .filter(|report| {
            let title = report.title.to_lowercase();
            needles.iter().any(|n| title.contains(n.as_str()))
        })
        .collect()
}

/// Runs one report.
///
/// Refuses SQL that is not read-only without touching the database.
pub async fn run_report(client: &dyn DatabaseClient, report: &Report) -> ReportOutcome {
    ReportOutcome {
        title: report.title.to_string(),
        result: execute_read_only(client, report).await,
    }
}

async fn execute_read_only(client: &dyn DatabaseClient, report: &Report) -> Result<QueryResult> {
    let classification = classify_sql(report.sql);
    if !classification.is_read_only() {
        return Err(RentalError::query(format!(
            "Report '{}' is not read-only ({})",
            report.title, classification.level
        )));
    }

    debug!(title = report.title, "Running report");
    let statement = Statement::labelled(report.title, report.sql);
    match client.execute(&statement).await {
        Ok(ExecOutcome::Rows(result)) => Ok(result),
        Ok(ExecOutcome::Affected { execution_time, .. }) => {
            Ok(QueryResult::new().with_execution_time(execution_time))
        }
        Err(RentalError::Connection(msg)) => Err(RentalError::query(format!(
            "could not connect: {msg}"
        ))),
        Err(e) => Err(e),
    }
}

/// Runs the selected reports in catalog order, continuing past failures.
pub async fn run_catalog(client: &dyn DatabaseClient, filters: &[String]) -> Vec<ReportOutcome> {
    let mut outcomes = Vec::new();
    for report in select(filters) {
        let outcome = run_report(client, report).await;
        if let Err(e) = &outcome.result {
            warn!(title = report.title, error = %e, "Report failed");
        }
        outcomes.push(outcome);
    }
    outcomes
}

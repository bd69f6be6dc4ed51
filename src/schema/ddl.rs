//! DDL for the GameRental schema: tables, the revenue view and the top-N routine.

use crate::db::Statement;

/// Tables in creation order (referenced tables before referencing ones).
pub const TABLES: [&str; 5] = ["GameCenter", "Staff", "Gamers", "Games", "Rentals"];

/// Name of the revenue view.
pub const REVENUE_VIEW: &str = "View_TotalRevenue";

/// Name of the top-N stored procedure.
pub const TOP_RENTED_PROCEDURE: &str = "GetTopRentedGames";

/// Columns of the top-N procedure's result set.
pub const TOP_RENTED_COLUMNS: [&str; 2] = ["Title", "TimesRented"];

const CREATE_GAME_CENTER: &str = r#"
CREATE TABLE GameCenter (
    CenterID VARCHAR(10) PRIMARY KEY,
    Location VARCHAR(50) NOT NULL,
    ManagerID VARCHAR(10),
    Contact VARCHAR(20) UNIQUE
)"#;

const CREATE_STAFF: &str = r#"
CREATE TABLE Staff (
    StaffID VARCHAR(10) PRIMARY KEY,
    FullName VARCHAR(40) NOT NULL,
    Role VARCHAR(30),
    Salary DECIMAL(10,2) CHECK (Salary >= 0),
    CenterID VARCHAR(10),
    FOREIGN KEY (CenterID) REFERENCES GameCenter(CenterID)
        ON DELETE SET NULL ON UPDATE CASCADE
)"#;

const CREATE_GAMERS: &str = r#"
CREATE TABLE Gamers (
    GamerID VARCHAR(10) PRIMARY KEY,
    GamerName VARCHAR(40) NOT NULL,
    Address VARCHAR(50),
    SignupDate DATE DEFAULT (CURRENT_DATE())
)"#;

const CREATE_GAMES: &str = r#"
CREATE TABLE Games (
    GameCode VARCHAR(20) PRIMARY KEY,
    Title VARCHAR(80) NOT NULL,
    Genre VARCHAR(30),
    RentalFee DECIMAL(8,2) CHECK (RentalFee >= 0),
    Available ENUM('Yes', 'No') DEFAULT 'Yes',
    Platform VARCHAR(20),
    Developer VARCHAR(40)
)"#;

const CREATE_RENTALS: &str = r#"
CREATE TABLE Rentals (
    RentalID VARCHAR(10) PRIMARY KEY,
    GamerID VARCHAR(10),
    GameCode VARCHAR(20),
    RentalDate DATE NOT NULL,
    ReturnDate DATE,
    FOREIGN KEY (GamerID) REFERENCES Gamers(GamerID)
        ON DELETE CASCADE ON UPDATE CASCADE,
    FOREIGN KEY (GameCode) REFERENCES Games(GameCode)
        ON DELETE CASCADE ON UPDATE CASCADE
)"#;

const CREATE_REVENUE_VIEW: &str = r#"
CREATE OR REPLACE VIEW View_TotalRevenue AS
SELECT SUM(G.RentalFee) AS TotalRevenue
FROM Rentals R
JOIN Games G ON R.GameCode = G.GameCode"#;

// Sent whole over the text protocol; the server parses the BEGIN..END body.
const CREATE_TOP_RENTED_PROCEDURE: &str = r#"
CREATE PROCEDURE GetTopRentedGames(IN TopN INT)
BEGIN
    SELECT G.Title, COUNT(*) AS TimesRented
    FROM Rentals R
    JOIN Games G ON R.GameCode = G.GameCode
    GROUP BY G.GameCode
    ORDER BY TimesRented DESC
    LIMIT TopN;
END"#;

/// Drops, recreates and selects the database.
///
/// `database` must already be validated as a plain identifier.
pub fn database_statements(database: &str) -> Vec<Statement> {
    vec![
        Statement::labelled(
            format!("drop database {database}"),
            format!("DROP DATABASE IF EXISTS `{database}`"),
        ),
        Statement::labelled(
            format!("create database {database}"),
            format!("CREATE DATABASE `{database}`"),
        ),
        Statement::labelled(format!("use database {database}"), format!("USE `{database}`")),
    ]
}

/// CREATE TABLE statements in dependency order.
pub fn table_statements() -> Vec<Statement> {
    [
        CREATE_GAME_CENTER,
        CREATE_STAFF,
        CREATE_GAMERS,
        CREATE_GAMES,
        CREATE_RENTALS,
    ]
    .into_iter()
    .zip(TABLES)
    .map(|(sql, table)| Statement::labelled(format!("create table {table}"), sql.trim()))
    .collect()
}

/// The revenue view.
pub fn view_statements() -> Vec<Statement> {
    vec![Statement::labelled(
        format!("create view {REVENUE_VIEW}"),
        CREATE_REVENUE_VIEW.trim(),
    )]
}

/// Replaces the top-N procedure.
pub fn procedure_statements() -> Vec<Statement> {
    vec![
        Statement::labelled(
            format!("drop procedure {TOP_RENTED_PROCEDURE}"),
            format!("DROP PROCEDURE IF EXISTS {TOP_RENTED_PROCEDURE}"),
        ),
        Statement::labelled(
            format!("create procedure {TOP_RENTED_PROCEDURE}"),
            CREATE_TOP_RENTED_PROCEDURE.trim(),
        ),
    ]
}

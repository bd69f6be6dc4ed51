//! Fixed sample rows loaded into a freshly created schema.
//!
//! Rows are typed values bound as parameters; nothing is spliced into SQL.

use crate::db::{Statement, Value};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A row of `GameCenter`.
#[derive(Debug, Clone, PartialEq)]
pub struct GameCenter {
    pub center_id: &'static str,
    pub location: &'static str,
    pub manager_id: &'static str,
    pub contact: &'static str,
}

/// A row of `Staff`.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffMember {
    pub staff_id: &'static str,
    pub full_name: &'static str,
    pub role: &'static str,
    pub salary: Decimal,
    pub center_id: Option<&'static str>,
}

/// A row of `Gamers`.
#[derive(Debug, Clone, PartialEq)]
pub struct Gamer {
    pub gamer_id: &'static str,
    pub gamer_name: &'static str,
    pub address: &'static str,
    pub signup_date: NaiveDate,
}

/// The `Games.Available` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Yes,
    No,
}

impl Availability {
    /// Returns the ENUM literal stored in the column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

/// A row of `Games`.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub game_code: &'static str,
    pub title: &'static str,
    pub genre: &'static str,
    pub rental_fee: Decimal,
    pub available: Availability,
    pub platform: &'static str,
    pub developer: &'static str,
}

/// A row of `Rentals`. `return_date` is `None` while the rental is open.
#[derive(Debug, Clone, PartialEq)]
pub struct Rental {
    pub rental_id: &'static str,
    pub gamer_id: &'static str,
    pub game_code: &'static str,
    pub rental_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

/// Calendar date, evaluated in a `const` block so a bad date fails the build.
const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid seed date"),
    }
}

fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub fn game_centers() -> Vec<GameCenter> {
    vec![
        GameCenter {
            center_id: "C001",
            location: "New York",
            manager_id: "S001",
            contact: "1234567890",
        },
        GameCenter {
            center_id: "C002",
            location: "Los Angeles",
            manager_id: "S002",
            contact: "0987654321",
        },
    ]
}

pub fn staff() -> Vec<StaffMember> {
    vec![
        StaffMember {
            staff_id: "S001",
            full_name: "Alice Smith",
            role: "Manager",
            salary: money(7_000_000),
            center_id: Some("C001"),
        },
        StaffMember {
            staff_id: "S002",
            full_name: "Bob Johnson",
            role: "Manager",
            salary: money(6_800_000),
            center_id: Some("C002"),
        },
    ]
}

pub fn gamers() -> Vec<Gamer> {
    vec![
        Gamer {
            gamer_id: "G001",
            gamer_name: "John Doe",
            address: "NY",
            signup_date: const { date(2023, 1, 1) },
        },
        Gamer {
            gamer_id: "G002",
            gamer_name: "Jane Roe",
            address: "LA",
            signup_date: const { date(2023, 1, 15) },
        },
        Gamer {
            gamer_id: "G003",
            gamer_name: "Mike Lee",
            address: "TX",
            signup_date: const { date(2023, 2, 1) },
        },
    ]
}

pub fn games() -> Vec<Game> {
    vec![
        Game {
            game_code: "GM001",
            title: "FIFA 22",
            genre: "Sports",
            rental_fee: money(599),
            available: Availability::Yes,
            platform: "PS5",
            developer: "EA Sports",
        },
        Game {
            game_code: "GM002",
            title: "GTA V",
            genre: "Action",
            rental_fee: money(799),
            available: Availability::Yes,
            platform: "PC",
            developer: "Rockstar",
        },
        Game {
            game_code: "GM003",
            title: "Minecraft",
            genre: "Sandbox",
            rental_fee: money(499),
            available: Availability::Yes,
            platform: "PC",
            developer: "Mojang",
        },
    ]
}

pub fn rentals() -> Vec<Rental> {
    vec![
        Rental {
            rental_id: "R001",
            gamer_id: "G001",
            game_code: "GM001",
            rental_date: const { date(2023, 1, 2) },
            return_date: Some(const { date(2023, 1, 9) }),
        },
        Rental {
            rental_id: "R002",
            gamer_id: "G001",
            game_code: "GM002",
            rental_date: const { date(2023, 1, 5) },
            return_date: Some(const { date(2023, 1, 15) }),
        },
        Rental {
            rental_id: "R003",
            gamer_id: "G002",
            game_code: "GM001",
            rental_date: const { date(2023, 1, 16) },
            return_date: Some(const { date(2023, 1, 24) }),
        },
        Rental {
            rental_id: "R004",
            gamer_id: "G003",
            game_code: "GM003",
            rental_date: const { date(2023, 2, 10) },
            return_date: Some(const { date(2023, 2, 18) }),
        },
        Rental {
            rental_id: "R005",
            gamer_id: "G001",
            game_code: "GM003",
            rental_date: const { date(2023, 3, 1) },
            return_date: None,
        },
    ]
}

/// Expected row count per table after seeding.
pub fn row_counts() -> Vec<(&'static str, usize)> {
    vec![
        ("GameCenter", game_centers().len()),
        ("Staff", staff().len()),
        ("Gamers", gamers().len()),
        ("Games", games().len()),
        ("Rentals", rentals().len()),
    ]
}

fn insert(table: &str, key: &str, columns: &[&str], values: Vec<Value>) -> Statement {
    let placeholders = vec!["?"; columns.len()].join(", ");
    Statement::labelled(
        format!("seed {table} {key}"),
        format!(
            "INSERT INTO {table} ({}) VALUES ({placeholders})",
            columns.join(", ")
        ),
    )
    .with_params(values)
}

/// INSERT statements for every seed row, parents before children.
pub fn seed_statements() -> Vec<Statement> {
    let mut statements = Vec::new();

    for c in game_centers() {
        statements.push(insert(
            "GameCenter",
            c.center_id,
            &["CenterID", "Location", "ManagerID", "Contact"],
            vec![
                c.center_id.into(),
                c.location.into(),
                c.manager_id.into(),
                c.contact.into(),
            ],
        ));
    }

    for s in staff() {
        statements.push(insert(
            "Staff",
            s.staff_id,
            &["StaffID", "FullName", "Role", "Salary", "CenterID"],
            vec![
                s.staff_id.into(),
                s.full_name.into(),
                s.role.into(),
                s.salary.into(),
                s.center_id.into(),
            ],
        ));
    }

    for g in gamers() {
        statements.push(insert(
            "Gamers",
            g.gamer_id,
            &["GamerID", "GamerName", "Address", "SignupDate"],
            vec![
                g.gamer_id.into(),
                g.gamer_name.into(),
                g.address.into(),
                g.signup_date.into(),
            ],
        ));
    }

    for g in games() {
        statements.push(insert(
            "Games",
            g.game_code,
            &[
                "GameCode",
                "Title",
                "Genre",
                "RentalFee",
                "Available",
                "Platform",
                "Developer",
            ],
            vec![
                g.game_code.into(),
                g.title.into(),
                g.genre.into(),
                g.rental_fee.into(),
                g.available.as_str().into(),
                g.platform.into(),
                g.developer.into(),
            ],
        ));
    }

    for r in rentals() {
        statements.push(insert(
            "Rentals",
            r.rental_id,
            &["RentalID", "GamerID", "GameCode", "RentalDate", "ReturnDate"],
            vec![
                r.rental_id.into(),
                r.gamer_id.into(),
                r.game_code.into(),
                r.rental_date.into(),
                r.return_date.into(),
            ],
        ));
    }

    statements
}

//! Report catalog integration tests.
//!
//! Runs the catalog against the seeded database and checks known answers.

use super::{drop_database, get_seeded_client};
use game_rental::db::{QueryResult, Value};
use game_rental::reports::{self, run_catalog, run_report};
use rust_decimal::Decimal;
use std::str::FromStr;

async fn run_titled(client: &game_rental::db::MySqlClient, title: &str) -> QueryResult {
    let report = reports::find(title).expect("report exists");
    run_report(client, report)
        .await
        .result
        .unwrap_or_else(|e| panic!("{title} failed: {e}"))
}

#[tokio::test]
async fn test_every_report_succeeds() {
    let db = "gr_it_catalog";
    let Some(client) = get_seeded_client(db).await else {
        eprintln!("Skipping test: GAME_RENTAL_TEST_DATABASE_URL not set");
        return;
    };

    let outcomes = run_catalog(&client, &[]).await;
    assert_eq!(outcomes.len(), 15);
    for outcome in &outcomes {
        assert!(outcome.is_ok(), "{}: {:?}", outcome.title, outcome.result);
    }

    drop_database(&client, db).await;
}

#[tokio::test]
async fn test_known_answers() {
    let db = "gr_it_known_answers";
    let Some(client) = get_seeded_client(db).await else {
        eprintln!("Skipping test: GAME_RENTAL_TEST_DATABASE_URL not set");
        return;
    };

    let revenue = run_titled(&client, "Total revenue from rentals").await;
    assert_eq!(revenue.columns[0].name, "TotalRevenue");
    assert_eq!(
        revenue.rows[0][0],
        Value::Decimal(Decimal::from_str("29.95").unwrap())
    );

    let most_rented = run_titled(&client, "Most rented game").await;
    assert_eq!(most_rented.row_count, 1);
    let title = most_rented.rows[0][0].as_str().unwrap();
    assert!(title == "FIFA 22" || title == "Minecraft", "got {title}");
    assert_eq!(most_rented.rows[0][1].as_i64(), Some(2));

    let never_rented = run_titled(&client, "Games never rented").await;
    assert!(never_rented.is_empty());
    assert_eq!(never_rented.columns.len(), 1);
    assert_eq!(never_rented.columns[0].name, "Title");

    let heavy_renters = run_titled(&client, "Gamers with more than 2 rentals").await;
    assert_eq!(heavy_renters.rows.len(), 1);
    assert_eq!(heavy_renters.rows[0][0], Value::from("G001"));
    assert_eq!(heavy_renters.rows[0][1].as_i64(), Some(3));

    let most_active = run_titled(&client, "Most active gamer").await;
    assert_eq!(most_active.rows[0][0], Value::from("G001"));

    drop_database(&client, db).await;
}

#[tokio::test]
async fn test_late_returns() {
    let db = "gr_it_late_returns";
    let Some(client) = get_seeded_client(db).await else {
        eprintln!("Skipping test: GAME_RENTAL_TEST_DATABASE_URL not set");
        return;
    };

    let late = run_titled(&client, "Games returned late (more than 7 days)").await;
    let mut rows: Vec<(String, i64)> = late
        .rows
        .iter()
        .map(|r| (r[0].to_display_string(), r[1].as_i64().unwrap()))
        .collect();
    rows.sort();

    assert_eq!(
        rows,
        vec![
            ("R002".to_string(), 10),
            ("R003".to_string(), 8),
            ("R004".to_string(), 8),
        ]
    );

    drop_database(&client, db).await;
}

#[tokio::test]
async fn test_grouped_reports() {
    let db = "gr_it_grouped";
    let Some(client) = get_seeded_client(db).await else {
        eprintln!("Skipping test: GAME_RENTAL_TEST_DATABASE_URL not set");
        return;
    };

    let per_platform = run_titled(&client, "Number of rentals per platform").await;
    let mut platforms: Vec<(String, i64)> = per_platform
        .rows
        .iter()
        .map(|r| (r[0].to_display_string(), r[1].as_i64().unwrap()))
        .collect();
    platforms.sort();
    assert_eq!(platforms, vec![("PC".to_string(), 3), ("PS5".to_string(), 2)]);

    let repeat = run_titled(&client, "Games rented more than once").await;
    assert_eq!(repeat.rows.len(), 2);

    let staff = run_titled(&client, "Staff count per game center").await;
    assert_eq!(staff.rows.len(), 2);

    let earliest = run_titled(&client, "Gamer with earliest signup").await;
    let id = earliest.column_index("GamerID").unwrap();
    assert_eq!(earliest.rows[0][id], Value::from("G001"));

    // Seed rentals are from 2023, so nothing is recent.
    let recent = run_titled(&client, "Games rented in last 30 days").await;
    assert!(recent.is_empty());
    assert_eq!(recent.columns.len(), 5);

    drop_database(&client, db).await;
}

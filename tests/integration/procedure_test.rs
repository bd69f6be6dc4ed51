//! Stored procedure integration tests.

use super::{drop_database, get_seeded_client};
use game_rental::app::{App, RunOptions};
use game_rental::db::{DatabaseClient, Value};
use game_rental::error::RentalError;
use game_rental::schema::TOP_RENTED_PROCEDURE;

#[tokio::test]
async fn test_top_rented_games() {
    let db = "gr_it_top_rented";
    let Some(client) = get_seeded_client(db).await else {
        eprintln!("Skipping test: GAME_RENTAL_TEST_DATABASE_URL not set");
        return;
    };

    let result = client
        .call_procedure(TOP_RENTED_PROCEDURE, &[Value::Int(3)])
        .await
        .unwrap();

    assert_eq!(result.columns[0].name, "Title");
    assert_eq!(result.columns[1].name, "TimesRented");
    let counts: Vec<i64> = result.rows.iter().filter_map(|r| r[1].as_i64()).collect();
    assert_eq!(counts, vec![2, 2, 1]);
    assert_eq!(result.rows[2][0], Value::from("GTA V"));

    drop_database(&client, db).await;
}

#[tokio::test]
async fn test_top_rented_respects_limit() {
    let db = "gr_it_top_limit";
    let Some(client) = get_seeded_client(db).await else {
        eprintln!("Skipping test: GAME_RENTAL_TEST_DATABASE_URL not set");
        return;
    };

    let one = client
        .call_procedure(TOP_RENTED_PROCEDURE, &[Value::Int(1)])
        .await
        .unwrap();
    assert_eq!(one.row_count, 1);

    let none = client
        .call_procedure(TOP_RENTED_PROCEDURE, &[Value::Int(0)])
        .await
        .unwrap();
    assert!(none.is_empty());

    drop_database(&client, db).await;
}

#[tokio::test]
async fn test_unknown_procedure_is_reported() {
    let db = "gr_it_unknown_proc";
    let Some(client) = get_seeded_client(db).await else {
        eprintln!("Skipping test: GAME_RENTAL_TEST_DATABASE_URL not set");
        return;
    };

    let err = client
        .call_procedure("GetBottomRentedGames", &[Value::Int(3)])
        .await
        .unwrap_err();
    assert!(matches!(err, RentalError::Procedure(_)));
    assert!(err.to_string().contains("1305"), "unexpected error: {err}");

    drop_database(&client, db).await;
}

#[tokio::test]
async fn test_full_run() {
    let db = "gr_it_full_run";
    let Some(client) = super::get_test_client(db) else {
        eprintln!("Skipping test: GAME_RENTAL_TEST_DATABASE_URL not set");
        return;
    };

    let options = RunOptions {
        database: db.to_string(),
        ..RunOptions::default()
    };
    let mut out = Vec::new();
    let summary = App::new(&client, options).run(&mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(summary.all_succeeded(), "{summary:?}\n{text}");
    assert_eq!(summary.reports_run, 15);
    assert!(text.contains("Tables, sample data, view, and procedure created."));
    assert!(text.contains("GTA V"));
    assert!(text.contains("29.95"));

    drop_database(&client, db).await;
}

#[tokio::test]
async fn test_zero_top_n_keeps_procedure_headers() {
    let db = "gr_it_top_zero";
    let Some(client) = get_seeded_client(db).await else {
        eprintln!("Skipping test: GAME_RENTAL_TEST_DATABASE_URL not set");
        return;
    };

    let options = RunOptions {
        database: db.to_string(),
        top_n: 0,
        skip_schema: true,
        reports: vec!["Total revenue".to_string()],
        ..RunOptions::default()
    };
    let mut out = Vec::new();
    let summary = App::new(&client, options).run(&mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(summary.all_succeeded(), "{summary:?}\n{text}");
    assert!(text.contains("Title │ TimesRented\n"), "{text}");
    assert!(text.contains("(no rows)"));
    assert!(!text.contains("Query executed successfully."));

    drop_database(&client, db).await;
}

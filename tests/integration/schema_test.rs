//! Schema definition integration tests.
//!
//! Tests table creation, seed rows, constraints and foreign key policies.

use super::{drop_database, get_seeded_client, query, scalar};
use game_rental::db::{DatabaseClient, ExecOutcome, Statement, Value};
use game_rental::error::RentalError;
use game_rental::schema::{define_schema, seed};

#[tokio::test]
async fn test_seeded_row_counts() {
    let db = "gr_it_row_counts";
    let Some(client) = get_seeded_client(db).await else {
        eprintln!("Skipping test: GAME_RENTAL_TEST_DATABASE_URL not set");
        return;
    };

    for (table, expected) in seed::row_counts() {
        let count = scalar(&client, &format!("SELECT COUNT(*) FROM {table}")).await;
        assert_eq!(count, expected as i64, "row count for {table}");
    }

    drop_database(&client, db).await;
}

#[tokio::test]
async fn test_bootstrap_is_repeatable() {
    let db = "gr_it_repeatable";
    let Some(client) = get_seeded_client(db).await else {
        eprintln!("Skipping test: GAME_RENTAL_TEST_DATABASE_URL not set");
        return;
    };

    client
        .execute(&Statement::new("DELETE FROM Rentals WHERE RentalID = ?").bind("R005"))
        .await
        .unwrap();
    assert_eq!(scalar(&client, "SELECT COUNT(*) FROM Rentals").await, 4);

    let summary = define_schema(&client, db).await.unwrap();
    assert_eq!(summary.statements_executed, 26);
    assert_eq!(scalar(&client, "SELECT COUNT(*) FROM Rentals").await, 5);
    assert_eq!(scalar(&client, "SELECT COUNT(*) FROM Games").await, 3);

    drop_database(&client, db).await;
}

#[tokio::test]
async fn test_deleting_gamer_cascades_to_rentals() {
    let db = "gr_it_gamer_cascade";
    let Some(client) = get_seeded_client(db).await else {
        eprintln!("Skipping test: GAME_RENTAL_TEST_DATABASE_URL not set");
        return;
    };

    let outcome = client
        .execute(&Statement::new("DELETE FROM Gamers WHERE GamerID = ?").bind("G001"))
        .await
        .unwrap();
    assert!(matches!(outcome, ExecOutcome::Affected { rows_affected: 1, .. }));

    let remaining = query(&client, "SELECT RentalID FROM Rentals ORDER BY RentalID").await;
    let ids: Vec<&str> = remaining.rows.iter().filter_map(|r| r[0].as_str()).collect();
    assert_eq!(ids, vec!["R003", "R004"]);

    drop_database(&client, db).await;
}

#[tokio::test]
async fn test_deleting_center_nulls_staff_reference() {
    let db = "gr_it_center_set_null";
    let Some(client) = get_seeded_client(db).await else {
        eprintln!("Skipping test: GAME_RENTAL_TEST_DATABASE_URL not set");
        return;
    };

    client
        .execute(&Statement::new("DELETE FROM GameCenter WHERE CenterID = ?").bind("C001"))
        .await
        .unwrap();

    assert_eq!(scalar(&client, "SELECT COUNT(*) FROM Staff").await, 2);
    let s001 = query(&client, "SELECT CenterID FROM Staff WHERE StaffID = 'S001'").await;
    assert_eq!(s001.rows[0][0], Value::Null);
    let s002 = query(&client, "SELECT CenterID FROM Staff WHERE StaffID = 'S002'").await;
    assert_eq!(s002.rows[0][0], Value::from("C002"));

    drop_database(&client, db).await;
}

#[tokio::test]
async fn test_renaming_game_code_cascades() {
    let db = "gr_it_update_cascade";
    let Some(client) = get_seeded_client(db).await else {
        eprintln!("Skipping test: GAME_RENTAL_TEST_DATABASE_URL not set");
        return;
    };

    client
        .execute(
            &Statement::new("UPDATE Games SET GameCode = ? WHERE GameCode = ?")
                .bind("GM101")
                .bind("GM001"),
        )
        .await
        .unwrap();

    let moved = scalar(&client, "SELECT COUNT(*) FROM Rentals WHERE GameCode = 'GM101'").await;
    assert_eq!(moved, 2);

    drop_database(&client, db).await;
}

#[tokio::test]
async fn test_constraints_reject_bad_rows() {
    let db = "gr_it_constraints";
    let Some(client) = get_seeded_client(db).await else {
        eprintln!("Skipping test: GAME_RENTAL_TEST_DATABASE_URL not set");
        return;
    };

    let negative_fee =
        Statement::new("INSERT INTO Games (GameCode, Title, RentalFee) VALUES (?, ?, ?)")
            .bind("GM900")
            .bind("Broken")
            .bind(-1);
    let err = client.execute(&negative_fee).await.unwrap_err();
    assert!(matches!(err, RentalError::Query(_)));

    let duplicate_contact = Statement::new(
        "INSERT INTO GameCenter (CenterID, Location, Contact) VALUES (?, ?, ?)",
    )
    .bind("C900")
    .bind("Austin")
    .bind("1234567890");
    let err = client.execute(&duplicate_contact).await.unwrap_err();
    assert!(err.to_string().contains("1062"), "unexpected error: {err}");

    let orphan_rental = Statement::new(
        "INSERT INTO Rentals (RentalID, GamerID, GameCode, RentalDate) VALUES (?, ?, ?, CURDATE())",
    )
    .bind("R900")
    .bind("G999")
    .bind("GM001");
    assert!(client.execute(&orphan_rental).await.is_err());

    assert_eq!(scalar(&client, "SELECT COUNT(*) FROM Games").await, 3);
    drop_database(&client, db).await;
}

#[tokio::test]
async fn test_column_defaults() {
    let db = "gr_it_defaults";
    let Some(client) = get_seeded_client(db).await else {
        eprintln!("Skipping test: GAME_RENTAL_TEST_DATABASE_URL not set");
        return;
    };

    client
        .execute(
            &Statement::new("INSERT INTO Gamers (GamerID, GamerName) VALUES (?, ?)")
                .bind("G900")
                .bind("New Gamer"),
        )
        .await
        .unwrap();
    client
        .execute(
            &Statement::new("INSERT INTO Games (GameCode, Title) VALUES (?, ?)")
                .bind("GM900")
                .bind("New Game"),
        )
        .await
        .unwrap();

    let signed_up_today = scalar(
        &client,
        "SELECT COUNT(*) FROM Gamers WHERE GamerID = 'G900' AND SignupDate = CURDATE()",
    )
    .await;
    assert_eq!(signed_up_today, 1);

    let available = query(&client, "SELECT Available FROM Games WHERE GameCode = 'GM900'").await;
    assert_eq!(available.rows[0][0], Value::from("Yes"));

    drop_database(&client, db).await;
}

#[tokio::test]
async fn test_bad_database_name_is_rejected() {
    let Some(client) = super::get_test_client("gr_it_unused") else {
        eprintln!("Skipping test: GAME_RENTAL_TEST_DATABASE_URL not set");
        return;
    };

    let err = define_schema(&client, "bad-name").await.unwrap_err();
    assert!(matches!(err, RentalError::Schema(_)));
}

//! Integration tests for game-rental.
//!
//! Each test bootstraps its own database so tests can run in parallel.

pub mod connection_test;
pub mod procedure_test;
pub mod report_test;
pub mod schema_test;

use game_rental::config::ConnectionConfig;
use game_rental::db::{DatabaseClient, MySqlClient, QueryResult, Statement};
use game_rental::schema::define_schema;

/// Helper to get test database URL from environment.
fn get_test_database_url() -> Option<String> {
    std::env::var("GAME_RENTAL_TEST_DATABASE_URL").ok()
}

/// Helper to create a client targeting `database` on the test server.
pub fn get_test_client(database: &str) -> Option<MySqlClient> {
    let url = get_test_database_url()?;
    let mut config = ConnectionConfig::from_connection_string(&url).ok()?;
    config.database = Some(database.to_string());
    Some(MySqlClient::new(config))
}

/// Helper to create a client on a freshly bootstrapped database.
pub async fn get_seeded_client(database: &str) -> Option<MySqlClient> {
    let client = get_test_client(database)?;
    define_schema(&client, database)
        .await
        .expect("schema bootstrap should succeed");
    Some(client)
}

/// Runs a statement expected to return rows.
pub async fn query(client: &MySqlClient, sql: &str) -> QueryResult {
    client
        .execute(&Statement::new(sql))
        .await
        .expect("query should succeed")
        .into_rows()
        .expect("statement should return rows")
}

/// Runs a query returning a single integer.
pub async fn scalar(client: &MySqlClient, sql: &str) -> i64 {
    let result = query(client, sql).await;
    result.rows[0][0]
        .as_i64()
        .unwrap_or_else(|| panic!("expected an integer from {sql}, got {:?}", result.rows))
}

/// Drops a test database.
pub async fn drop_database(client: &MySqlClient, database: &str) {
    let drop = Statement::new(format!("DROP DATABASE IF EXISTS `{database}`"));
    client
        .execute_batch(&[drop])
        .await
        .expect("drop should succeed");
}

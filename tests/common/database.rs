//! Database test fixtures
//!
//! Every test gets its own in-memory SQLite database with migrations
//! applied, so tests never share state.

use despacho::backend::server::config::{connect, run_migrations};
use sqlx::SqlitePool;

/// Create a migrated in-memory database
///
/// The pool holds a single connection; an in-memory database lives only as
/// long as its connection.
pub async fn create_test_pool() -> SqlitePool {
    let pool = connect("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory database");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Number of rows in a table
pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows");
    count
}

//! Persistence layer for applications, conditions, releases and the
//! activity log.
//!
//! - [`models`]: row structs and create/update DTOs.
//! - [`repositories`]: zero-sized Postgres repositories.
//! - [`rules`]: adaptation of stored rule JSON into the canonical
//!   [`RuleSet`](releasegate_core::rules::RuleSet).
//! - [`store`]: the [`Catalog`](store::Catalog) trait and its Postgres and
//!   in-memory backends.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod rules;
pub mod store;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations embedded from `./migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

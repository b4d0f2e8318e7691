//! Data layer: connection pool, transaction manager, models, repositories.
//!
//! Repositories are zero-sized structs with async methods. Simple CRUD
//! methods take `&PgPool`; operations that may run inside a caller-owned
//! transaction take `impl PgExecutor<'_>` (pass `&pool` or `&mut *tx`),
//! and multi-statement operations take `&mut PgConnection`. The same
//! repository code therefore runs standalone or transactionally with no
//! branching at call sites.

pub mod error;
pub mod models;
pub mod repositories;
pub mod tx;

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Cheap liveness probe used at startup and by the health endpoint.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

//! Postgres persistence for GitQuest
//!
//! Query modules are grouped by entity; `store::PgStore` adapts them to
//! the engine's persistence seam.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

pub mod achievements;
pub mod characters;
pub mod guilds;
pub mod leaderboard;
pub mod stats;
pub mod store;
pub mod users;

pub use store::PgStore;

/// Create a database connection pool
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;
    info!("database connected");
    Ok(pool)
}

/// Apply the bootstrap schema. Every statement in the file is
/// idempotent, so this runs safely at each startup.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    let migration_sql = include_str!("../../../migrations/001_initial.sql");
    sqlx::raw_sql(migration_sql).execute(pool).await?;
    info!("migrations applied");
    Ok(())
}

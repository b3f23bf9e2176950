// src/config/db.rs
// DOCUMENTATION: Database connection pool initialization
// PURPOSE: Setup the PostgreSQL pool and make sure the mosques table exists

use crate::config::Config;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Executor;
use std::time::Duration;

/// Table and index definitions, applied idempotently at startup
const SCHEMA: &str = include_str!("../../schema.sql");

/// Initialize PostgreSQL connection pool
/// DOCUMENTATION: Called once by each binary; the pool is then shared
/// by every store operation
pub async fn init_db_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    log::info!("Initializing database pool");

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connection_timeout))
        // Connection idle timeout (5 minutes)
        .idle_timeout(Duration::from_secs(300))
        // Connection lifetime (30 minutes before recycle)
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.database_url)
        .await?;

    sqlx::query("SELECT 1").execute(&pool).await?;

    log::info!("Database pool initialized successfully");
    Ok(pool)
}

/// Create the mosques table and its indexes if they are missing
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Plain &str goes through the simple query protocol, which accepts
    // several statements at once.
    pool.execute(SCHEMA).await?;
    log::info!("Database schema ready");
    Ok(())
}

//! Database setup and schema initialization

use std::time::Duration;

use anyhow::{Context, Result};
use imgpress_core::Config;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Connect to SQLite and make sure the schema exists.
pub async fn setup_database(config: &Config) -> Result<SqlitePool> {
    tracing::info!("Connecting to database...");
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to connect to {}", config.database_url))?;

    imgpress_db::schema::init_schema(&pool)
        .await
        .context("Failed to initialize database schema")?;
    tracing::info!("Database connected and schema ready");

    Ok(pool)
}

//! Schema initialization. Both tables are created on startup if missing,
//! matching the single-file deployment model.

use imgpress_core::AppError;
use sqlx::SqlitePool;

pub async fn init_schema(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BLOB PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'user',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS conversion_history (
            id BLOB PRIMARY KEY,
            user_id BLOB NOT NULL REFERENCES users (id),
            filename TEXT NOT NULL,
            original_format TEXT NOT NULL,
            converted_format TEXT NOT NULL,
            width INTEGER NOT NULL,
            height INTEGER NOT NULL,
            file_size INTEGER NOT NULL,
            storage_key TEXT,
            converted_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_history_user_time \
         ON conversion_history (user_id, converted_at DESC)",
    )
    .execute(pool)
    .await?;

    tracing::debug!("Database schema initialized");
    Ok(())
}

use chrono::Utc;
use imgpress_core::models::HistoryRecord;
use imgpress_core::AppError;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Append-only ledger of successful conversions.
#[derive(Clone)]
pub struct HistoryRepository {
    pool: SqlitePool,
}

impl HistoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append one row with a server-assigned timestamp. Called once per
    /// successful conversion, never for failures.
    #[tracing::instrument(
        skip(self),
        fields(db.table = "conversion_history", db.operation = "insert")
    )]
    #[allow(clippy::too_many_arguments)]
    pub async fn record(
        &self,
        user_id: Uuid,
        filename: &str,
        original_format: &str,
        converted_format: &str,
        width: i64,
        height: i64,
        file_size: i64,
        storage_key: Option<&str>,
    ) -> Result<HistoryRecord, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let record = sqlx::query_as::<_, HistoryRecord>(
            r#"
            INSERT INTO conversion_history (
                id, user_id, filename, original_format, converted_format,
                width, height, file_size, storage_key, converted_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(filename)
        .bind(original_format)
        .bind(converted_format)
        .bind(width)
        .bind(height)
        .bind(file_size)
        .bind(storage_key)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Up to `limit` rows for the user, most recent first. Rows inserted in
    /// the same instant keep insertion order (rowid tie-break).
    pub async fn list_recent(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<HistoryRecord>, AppError> {
        let rows = sqlx::query_as::<_, HistoryRecord>(
            r#"
            SELECT * FROM conversion_history
            WHERE user_id = ?1
            ORDER BY converted_at DESC, rowid DESC
            LIMIT ?2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Delete one of the user's rows. Returns the row's storage key when a
    /// row was actually removed; `None` means there was nothing to delete,
    /// which is a no-op rather than an error.
    #[tracing::instrument(
        skip(self),
        fields(db.table = "conversion_history", db.operation = "delete")
    )]
    pub async fn delete(
        &self,
        record_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Option<String>>, AppError> {
        let existing = sqlx::query_as::<_, HistoryRecord>(
            "SELECT * FROM conversion_history WHERE id = ?1 AND user_id = ?2",
        )
        .bind(record_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(record) = existing else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM conversion_history WHERE id = ?1")
            .bind(record_id)
            .execute(&self.pool)
            .await?;

        Ok(Some(record.storage_key))
    }
}

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use imgpress_core::models::HistoryEntryResponse;
use imgpress_storage::StorageError;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::UserContext;
use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// `GET /history`: the caller's conversions, most recent first.
pub async fn list_history(
    user_ctx: UserContext,
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryEntryResponse>>, HttpAppError> {
    let limit = query
        .limit
        .unwrap_or(state.config.history_default_limit)
        .clamp(1, state.config.history_max_limit);

    let entries = state
        .history
        .list_recent(user_ctx.user_id, limit)
        .await?
        .into_iter()
        .map(HistoryEntryResponse::from)
        .collect();

    Ok(Json(entries))
}

/// `DELETE /history/{id}`: remove one of the caller's ledger rows and its
/// stored file. Deleting a row that is already gone, or that belongs to
/// someone else, is a no-op.
pub async fn delete_history_entry(
    user_ctx: UserContext,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    if let Some(storage_key) = state.history.delete(id, user_ctx.user_id).await? {
        if let Some(key) = storage_key {
            // The row is authoritative; a missing file is not an error.
            match state.storage.delete(&key).await {
                Ok(()) | Err(StorageError::NotFound(_)) => {}
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Failed to delete stored file");
                }
            }
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::UserContext;
    use imgpress_core::Config;
    use imgpress_db::UserRepository;
    use imgpress_storage::{LocalStorage, Storage};
    use sqlx::sqlite::SqlitePoolOptions;

    fn test_config() -> Config {
        Config {
            server_port: 5000,
            database_url: "sqlite::memory:".to_string(),
            storage_path: "unused".to_string(),
            max_body_bytes: 16 * 1024 * 1024,
            jpeg_quality: 90,
            jwt_secret: "test-secret".to_string(),
            jwt_expiry_hours: 24,
            history_default_limit: 50,
            history_max_limit: 100,
            environment: "test".to_string(),
        }
    }

    async fn setup() -> (Arc<AppState>, UserContext, tempfile::TempDir) {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("pool");
        imgpress_db::schema::init_schema(&pool).await.expect("schema");
        let user = UserRepository::new(pool.clone())
            .create("alice", "hash", "user")
            .await
            .expect("user");

        let dir = tempfile::tempdir().expect("tempdir");
        let storage: Arc<dyn Storage> =
            Arc::new(LocalStorage::new(dir.path()).await.expect("storage"));
        let state = Arc::new(AppState::new(test_config(), pool, storage));
        let ctx = UserContext {
            user_id: user.id,
            username: "alice".to_string(),
            role: "user".to_string(),
        };
        (state, ctx, dir)
    }

    #[tokio::test]
    async fn test_delete_removes_backing_file_and_is_idempotent() {
        let (state, ctx, dir) = setup().await;
        state
            .storage
            .store("converted/a.jpeg", b"jpeg bytes")
            .await
            .expect("store");
        let record = state
            .history
            .record(ctx.user_id, "a.png", "PNG", "JPEG", 1, 1, 10, Some("converted/a.jpeg"))
            .await
            .expect("record");
        assert!(dir.path().join("converted/a.jpeg").exists());

        let status = delete_history_entry(ctx.clone(), State(state.clone()), Path(record.id))
            .await
            .expect("delete");
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(!dir.path().join("converted/a.jpeg").exists());
        assert!(state
            .history
            .list_recent(ctx.user_id, 10)
            .await
            .expect("list")
            .is_empty());

        // Row and file are already gone; deleting again is still fine.
        let status = delete_history_entry(ctx, State(state), Path(record.id))
            .await
            .expect("delete");
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}

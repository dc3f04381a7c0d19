use std::sync::Arc;

use axum::{extract::State, Json};
use imgpress_core::models::HistoryEntryResponse;
use imgpress_processing::OutputFormat;
use serde::Serialize;

use crate::auth::UserContext;
use crate::error::HttpAppError;
use crate::state::AppState;

/// How many ledger rows the landing payload shows.
const RECENT_LIMIT: i64 = 5;

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub formats: Vec<String>,
    pub recent: Vec<HistoryEntryResponse>,
}

/// Landing data: the selectable output formats and the caller's most recent
/// conversions.
pub async fn index(
    user_ctx: UserContext,
    State(state): State<Arc<AppState>>,
) -> Result<Json<IndexResponse>, HttpAppError> {
    let formats = OutputFormat::ALL
        .iter()
        .map(|f| f.to_string())
        .collect();

    let recent = state
        .history
        .list_recent(user_ctx.user_id, RECENT_LIMIT)
        .await?
        .into_iter()
        .map(HistoryEntryResponse::from)
        .collect();

    Ok(Json(IndexResponse { formats, recent }))
}

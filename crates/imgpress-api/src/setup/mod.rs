//! Application setup: database pool, storage backend, router, server.

pub mod database;
pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::Result;
use imgpress_core::Config;
use imgpress_storage::{LocalStorage, Storage};

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let pool = database::setup_database(&config).await?;

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(config.storage_path.clone())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize storage: {e}"))?,
    );
    tracing::info!(path = %config.storage_path, "Storage initialized");

    let state = Arc::new(AppState::new(config, pool, storage));
    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}

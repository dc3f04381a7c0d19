use std::sync::Arc;

use imgpress_core::Config;
use imgpress_db::{HistoryRepository, UserRepository};
use imgpress_storage::Storage;
use sqlx::SqlitePool;

/// Shared application state available to every handler.
pub struct AppState {
    pub config: Config,
    pub pool: SqlitePool,
    pub users: UserRepository,
    pub history: HistoryRepository,
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(config: Config, pool: SqlitePool, storage: Arc<dyn Storage>) -> Self {
        AppState {
            users: UserRepository::new(pool.clone()),
            history: HistoryRepository::new(pool.clone()),
            config,
            pool,
            storage,
        }
    }
}

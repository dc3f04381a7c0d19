//! Persistence layer: schema initialization and the user / history
//! repositories over a SQLite pool.

pub mod history;
pub mod schema;
pub mod users;

pub use history::HistoryRepository;
pub use users::UserRepository;

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    /// In-memory pool for repository tests. A single connection keeps every
    /// query on the same memory database.
    pub async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        crate::schema::init_schema(&pool).await.expect("schema");
        pool
    }
}

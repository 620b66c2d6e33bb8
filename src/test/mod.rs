use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::configs::MIGRATOR;

/// In-memory SQLite, một connection duy nhất để mọi query thấy cùng database
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    MIGRATOR.run(&pool).await.unwrap();
    pool
}

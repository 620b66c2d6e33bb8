use sqlx::{migrate::Migrator, sqlite::SqlitePoolOptions, SqlitePool};

use crate::{api::error, ENV};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn connect_database() -> Result<SqlitePool, error::SystemError> {
    let database_url = &ENV.database_url;
    let pool = SqlitePoolOptions::new()
        .max_connections(ENV.database_max_connections)
        .min_connections(1)
        .acquire_slow_threshold(std::time::Duration::from_secs(3))
        .connect(database_url)
        .await?;

    MIGRATOR.run(&pool).await?;
    tracing::info!("Database ready at {}", database_url);

    Ok(pool)
}

use sqlx::types::Json;

use crate::{
    api::error,
    modules::room::{model::InsertRoom, repository::RoomRepository, schema::RoomEntity},
};

#[derive(Clone)]
pub struct RoomRepositorySqlite {
    pool: sqlx::SqlitePool,
}

impl RoomRepositorySqlite {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RoomRepository for RoomRepositorySqlite {
    async fn find_all(&self) -> Result<Vec<RoomEntity>, error::SystemError> {
        let rooms = sqlx::query_as::<_, RoomEntity>("SELECT * FROM rooms ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rooms)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<RoomEntity>, error::SystemError> {
        let room = sqlx::query_as::<_, RoomEntity>("SELECT * FROM rooms WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(room)
    }

    async fn create(&self, room: &InsertRoom) -> Result<RoomEntity, error::SystemError> {
        let room = sqlx::query_as::<_, RoomEntity>(
            "INSERT INTO rooms (name, created_by, is_locked, allowed_usernames, created_at) VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(&room.name)
        .bind(&room.created_by)
        .bind(room.is_locked)
        .bind(Json(&room.allowed_usernames))
        .bind(chrono::Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(room)
    }
}

use sqlx::{prelude::FromRow, types::Json};

#[derive(Debug, Clone, FromRow)]
pub struct RoomEntity {
    pub id: i64,
    pub name: String,
    pub created_by: Option<String>,
    pub is_locked: bool,
    pub allowed_usernames: Json<Vec<String>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl RoomEntity {
    pub fn allows(&self, username: &str) -> bool {
        self.allowed_usernames.iter().any(|allowed| allowed == username)
    }
}

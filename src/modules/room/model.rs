use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::room::schema::RoomEntity;
use crate::modules::websocket::message::PresenceEntry;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoomModel {
    #[validate(length(min = 1, message = "Room name is required"))]
    pub room_name: String,
    #[validate(length(min = 1, max = 150, message = "Creator must be 1 to 150 characters long"))]
    pub created_by: Option<String>,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub allowed_usernames: Vec<String>,
}

pub struct InsertRoom {
    pub name: String,
    pub created_by: Option<String>,
    pub is_locked: bool,
    pub allowed_usernames: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomResponse {
    pub id: i64,
    pub name: String,
    pub created_by: Option<String>,
    pub is_locked: bool,
    pub allowed_usernames: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<RoomEntity> for RoomResponse {
    fn from(room: RoomEntity) -> Self {
        Self {
            id: room.id,
            name: room.name,
            created_by: room.created_by,
            is_locked: room.is_locked,
            allowed_usernames: room.allowed_usernames.0,
            created_at: room.created_at,
        }
    }
}

/// Trang room: thông tin trong catalogue (nếu có) + ai đang online
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomView {
    pub room_name: String,
    pub room: Option<RoomResponse>,
    pub online: Vec<PresenceEntry>,
    pub websocket_path: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinQuery {
    pub name: Option<String>,
}

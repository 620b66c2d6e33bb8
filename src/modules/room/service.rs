/// Room Service
///
/// Business logic cho catalogue room:
/// - Liệt kê / tạo room (tạo lại tên đã tồn tại thì trả về room cũ)
/// - Kiểm tra quyền vào room bị khoá trước khi mở WebSocket
use std::sync::Arc;

use crate::{
    api::error,
    modules::room::{
        model::{CreateRoomModel, InsertRoom},
        repository::RoomRepository,
        schema::RoomEntity,
    },
    utils::normalize_room_name,
};

#[derive(Clone)]
pub struct RoomService<R>
where
    R: RoomRepository + Send + Sync + 'static,
{
    room_repo: Arc<R>,
}

impl<R> RoomService<R>
where
    R: RoomRepository + Send + Sync + 'static,
{
    pub fn with_dependencies(room_repo: Arc<R>) -> Self {
        RoomService { room_repo }
    }

    pub async fn list_rooms(&self) -> Result<Vec<RoomEntity>, error::SystemError> {
        self.room_repo.find_all().await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<RoomEntity>, error::SystemError> {
        let name = normalize_room_name(name)?;
        self.room_repo.find_by_name(&name).await
    }

    /// Tạo room nếu tên chưa tồn tại.
    ///
    /// Returns: (room, true nếu vừa tạo mới)
    pub async fn create_room(
        &self,
        model: CreateRoomModel,
    ) -> Result<(RoomEntity, bool), error::SystemError> {
        let name = normalize_room_name(&model.room_name)?;

        if let Some(existing) = self.room_repo.find_by_name(&name).await? {
            return Ok((existing, false));
        }

        let mut allowed_usernames: Vec<String> = Vec::new();
        for username in model.allowed_usernames {
            let username = username.trim();
            if !username.is_empty() && !allowed_usernames.iter().any(|u| u == username) {
                allowed_usernames.push(username.to_string());
            }
        }

        let insert = InsertRoom {
            name,
            created_by: model.created_by.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
            is_locked: model.is_locked,
            allowed_usernames,
        };

        match self.room_repo.create(&insert).await {
            Ok(room) => {
                tracing::info!("Room {} created (locked: {})", room.name, room.is_locked);
                Ok((room, true))
            }
            // Request khác vừa tạo cùng tên
            Err(error::SystemError::Conflict(_)) => {
                let room = self
                    .room_repo
                    .find_by_name(&insert.name)
                    .await?
                    .ok_or_else(|| error::SystemError::not_found("Room not found"))?;
                Ok((room, false))
            }
            Err(e) => Err(e),
        }
    }

    /// Kiểm tra một kết nối có được vào room không.
    ///
    /// - Room không có trong catalogue hoặc không khoá: ai cũng vào được,
    ///   trả về `None` (server sẽ cấp tên ngẫu nhiên).
    /// - Room bị khoá: `requested_name` phải nằm trong `allowed_usernames`,
    ///   trả về tên đó để dùng làm tên hiển thị.
    pub async fn authorize_join(
        &self,
        room_name: &str,
        requested_name: Option<&str>,
    ) -> Result<Option<String>, error::SystemError> {
        let Some(room) = self.find_by_name(room_name).await? else {
            return Ok(None);
        };

        if !room.is_locked {
            return Ok(None);
        }

        match requested_name.map(str::trim) {
            Some(name) if !name.is_empty() && room.allows(name) => Ok(Some(name.to_string())),
            _ => {
                tracing::warn!("Rejected join to locked room {}", room.name);
                Err(error::SystemError::forbidden("Room is locked"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::room::repository_sqlite::RoomRepositorySqlite;
    use crate::test::memory_pool;

    async fn service() -> RoomService<RoomRepositorySqlite> {
        RoomService::with_dependencies(Arc::new(RoomRepositorySqlite::new(memory_pool().await)))
    }

    fn model(name: &str) -> CreateRoomModel {
        CreateRoomModel {
            room_name: name.to_string(),
            created_by: None,
            is_locked: false,
            allowed_usernames: vec![],
        }
    }

    #[actix_web::test]
    async fn test_create_room_twice_returns_existing() {
        let svc = service().await;

        let (first, created) = svc.create_room(model("  lobby ")).await.unwrap();
        assert!(created);
        assert_eq!(first.name, "lobby");

        let (second, created) = svc.create_room(model("lobby")).await.unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);

        assert_eq!(svc.list_rooms().await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_create_room_rejects_invalid_name() {
        let svc = service().await;
        let err = svc.create_room(model("   ")).await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));

        let err = svc.create_room(model("a/b")).await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));
    }

    #[actix_web::test]
    async fn test_allowed_usernames_are_trimmed_and_deduplicated() {
        let svc = service().await;
        let (room, _) = svc
            .create_room(CreateRoomModel {
                room_name: "vip".to_string(),
                created_by: Some(" alice ".to_string()),
                is_locked: true,
                allowed_usernames: vec![
                    "alice".to_string(),
                    " alice".to_string(),
                    "".to_string(),
                    "bob".to_string(),
                ],
            })
            .await
            .unwrap();

        assert_eq!(room.allowed_usernames.0, vec!["alice", "bob"]);
        assert_eq!(room.created_by.as_deref(), Some("alice"));
    }

    #[actix_web::test]
    async fn test_authorize_join() {
        let svc = service().await;
        svc.create_room(model("open")).await.unwrap();
        svc.create_room(CreateRoomModel {
            room_name: "vip".to_string(),
            created_by: None,
            is_locked: true,
            allowed_usernames: vec!["alice".to_string()],
        })
        .await
        .unwrap();

        // Room chưa có trong catalogue vẫn vào được
        assert_eq!(svc.authorize_join("ephemeral", None).await.unwrap(), None);
        // Room mở bỏ qua tên yêu cầu
        assert_eq!(svc.authorize_join("open", Some("alice")).await.unwrap(), None);

        assert_eq!(
            svc.authorize_join("vip", Some("alice")).await.unwrap(),
            Some("alice".to_string())
        );

        let err = svc.authorize_join("vip", Some("mallory")).await.unwrap_err();
        assert!(matches!(err, error::SystemError::Forbidden(_)));

        let err = svc.authorize_join("vip", None).await.unwrap_err();
        assert!(matches!(err, error::SystemError::Forbidden(_)));
    }
}

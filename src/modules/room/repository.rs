use crate::{
    api::error,
    modules::room::{model::InsertRoom, schema::RoomEntity},
};

#[async_trait::async_trait]
pub trait RoomRepository {
    async fn find_all(&self) -> Result<Vec<RoomEntity>, error::SystemError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<RoomEntity>, error::SystemError>;
    async fn create(&self, room: &InsertRoom) -> Result<RoomEntity, error::SystemError>;
}

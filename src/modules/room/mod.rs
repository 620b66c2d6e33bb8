pub mod handle;
pub mod model;
pub mod repository;
pub mod repository_sqlite;
pub mod route;
pub mod schema;
pub mod service;

pub use repository_sqlite::RoomRepositorySqlite;
pub use service::RoomService;

pub type RoomSvc = RoomService<RoomRepositorySqlite>;

use actix::Addr;
use actix_web::{get, http::header, post, web, HttpResponse};
use std::collections::BTreeMap;

use crate::{
    api::{error, success},
    modules::{
        room::{
            model::{CreateRoomModel, RoomResponse, RoomView},
            RoomSvc,
        },
        websocket::{
            events::{GetActiveRooms, GetOnlineUsers},
            message::PresenceEntry,
            server::WebSocketServer,
        },
    },
    utils::{normalize_room_name, ValidatedJson},
    ENV,
};

#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, format!("/chat/{}/", ENV.default_room)))
        .finish()
}

#[get("/health")]
pub async fn health_check() -> &'static str {
    "Server is running"
}

#[get("")]
pub async fn list_rooms(
    room_service: web::Data<RoomSvc>,
) -> Result<success::Success<Vec<RoomResponse>>, error::Error> {
    let rooms = room_service.list_rooms().await?;
    let rooms: Vec<RoomResponse> = rooms.into_iter().map(RoomResponse::from).collect();
    Ok(success::Success::ok(Some(rooms)).message("Successfully retrieved rooms"))
}

#[post("")]
pub async fn create_room(
    room_service: web::Data<RoomSvc>,
    body: ValidatedJson<CreateRoomModel>,
) -> Result<success::Success<RoomResponse>, error::Error> {
    let (room, created) = room_service.create_room(body.0).await?;
    let room = RoomResponse::from(room);

    if created {
        Ok(success::Success::created(Some(room)).message("Room created"))
    } else {
        Ok(success::Success::ok(Some(room)).message("Room already exists"))
    }
}

#[get("/{room_name}/online")]
pub async fn get_online_users(
    server: web::Data<Addr<WebSocketServer>>,
    room_name: web::Path<String>,
) -> Result<success::Success<Vec<PresenceEntry>>, error::Error> {
    let room = normalize_room_name(&room_name)?;
    let users = server.send(GetOnlineUsers { room }).await.map_err(error::SystemError::from)?;
    Ok(success::Success::ok(Some(users)).message("Successfully retrieved online users"))
}

/// Room đang có người kết nối: room -> số session
#[get("/active")]
pub async fn get_active_rooms(
    server: web::Data<Addr<WebSocketServer>>,
) -> Result<success::Success<BTreeMap<String, usize>>, error::Error> {
    let rooms = server.send(GetActiveRooms).await.map_err(error::SystemError::from)?;
    Ok(success::Success::ok(Some(rooms)).message("Successfully retrieved active rooms"))
}

#[get("/chat/{room_name}/")]
pub async fn room_view(
    room_service: web::Data<RoomSvc>,
    server: web::Data<Addr<WebSocketServer>>,
    room_name: web::Path<String>,
) -> Result<success::Success<RoomView>, error::Error> {
    let room_name = normalize_room_name(&room_name)?;
    let room = room_service.find_by_name(&room_name).await?.map(RoomResponse::from);
    let online = server
        .send(GetOnlineUsers { room: room_name.clone() })
        .await
        .map_err(error::SystemError::from)?;

    let view = RoomView {
        websocket_path: format!("/ws/chat/{room_name}/"),
        room_name,
        room,
        online,
    };
    Ok(success::Success::ok(Some(view)))
}

/// WebSocket HTTP Handler
///
/// Module này xử lý HTTP upgrade request và quản lý bidirectional message flow:
/// - Inbound:  Client → WebSocket → parse ClientMessage → Session Actor
/// - Outbound: Server Actor → Session Actor → mpsc channel → WebSocket → Client
use actix::{Actor, Addr};
use actix_web::{web, HttpRequest, HttpResponse};
use actix_ws::Message;
use tokio::sync::mpsc;

use super::events::CloseSession;
use super::message::ClientMessage;
use super::server::WebSocketServer;
use super::session::{ChatProfile, WebSocketSession};
use crate::{
    api::error,
    modules::room::{model::JoinQuery, RoomSvc},
    utils::normalize_room_name,
    ENV,
};

/// Parse text frame từ client, frame không hợp lệ bị bỏ qua
fn parse_client_frame(text: &str) -> Option<ClientMessage> {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(client_msg) => Some(client_msg),
        Err(e) => {
            let raw: String = text.chars().take(100).collect();
            tracing::warn!("Could not parse client message: {} - raw: {}", e, raw);
            None
        }
    }
}

/// HTTP handler để upgrade connection thành WebSocket
///
/// Endpoint: GET /ws/chat/{room_name}/?name=...
///
/// Flow:
/// 1. Kiểm tra tên room và quyền vào room bị khoá
/// 2. HTTP handshake → WebSocket connection
/// 3. Tạo mpsc channel (session actor → client)
/// 4. Start WebSocketSession actor (server gửi lời chào + presence)
/// 5. Spawn async task xử lý bidirectional messages
pub async fn websocket_handler(
    req: HttpRequest,
    stream: web::Payload,
    room_name: web::Path<String>,
    query: web::Query<JoinQuery>,
    server: web::Data<Addr<WebSocketServer>>,
    room_service: web::Data<RoomSvc>,
) -> Result<HttpResponse, actix_web::Error> {
    tracing::debug!("WebSocket upgrade request from {:?}", req.peer_addr());

    let room = normalize_room_name(&room_name).map_err(error::Error::from)?;
    let profile = match room_service
        .authorize_join(&room, query.name.as_deref())
        .await
        .map_err(error::Error::from)?
    {
        Some(name) => ChatProfile::named(name),
        None => ChatProfile::random(),
    };

    let (response, mut ws_session, mut msg_stream) = actix_ws::handle(&req, stream)?;

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let addr = WebSocketSession::new(
        server.get_ref().clone(),
        room.clone(),
        profile,
        tx,
        ENV.max_message_length,
    )
    .start();

    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                // === INBOUND: Client → Server ===
                msg = msg_stream.recv() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if let Some(client_msg) = parse_client_frame(&text) {
                                addr.do_send(client_msg);
                            }
                        }

                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = ws_session.pong(&data).await {
                                tracing::error!("Could not send pong: {}", e);
                                break;
                            }
                        }

                        Some(Ok(Message::Pong(_))) => {}

                        Some(Ok(Message::Close(reason))) => {
                            tracing::info!("WebSocket close frame: {:?}", reason);
                            break;
                        }

                        Some(Ok(Message::Binary(_))) => {
                            tracing::warn!("Binary messages are not supported");
                        }

                        Some(Ok(Message::Continuation(_) | Message::Nop)) => {}

                        Some(Err(e)) => {
                            tracing::error!("WebSocket protocol error: {}", e);
                            break;
                        }

                        // Client disconnect
                        None => break,
                    }
                }

                // === OUTBOUND: Server → Client ===
                Some(json) = rx.recv() => {
                    if ws_session.text(json).await.is_err() {
                        tracing::error!("Could not send message to WebSocket client");
                        break;
                    }
                }
            }
        }

        // Dừng session actor → server xoá khỏi room và cập nhật presence
        addr.do_send(CloseSession);
        let _ = ws_session.close(None).await;
        tracing::debug!("WebSocket message loop finished");
    });

    tracing::info!("WebSocket connection established for room {}", room);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, App};

    use super::*;
    use crate::modules::room::{model::CreateRoomModel, RoomRepositorySqlite, RoomService};
    use crate::modules::websocket::route;
    use crate::test::memory_pool;

    async fn app_data() -> (web::Data<RoomSvc>, web::Data<Addr<WebSocketServer>>) {
        let repo = RoomRepositorySqlite::new(memory_pool().await);
        let room_service = RoomService::with_dependencies(Arc::new(repo));
        room_service
            .create_room(CreateRoomModel {
                room_name: "vip".to_string(),
                created_by: None,
                is_locked: true,
                allowed_usernames: vec!["alice".to_string()],
            })
            .await
            .unwrap();
        let server = WebSocketServer::new(false).start();
        (web::Data::new(room_service), web::Data::new(server))
    }

    #[actix_web::test]
    async fn test_join_checks_room_before_handshake() {
        let (room_service, server) = app_data().await;
        let app = test::init_service(
            App::new().app_data(room_service).app_data(server).configure(route::configure),
        )
        .await;

        // Room khoá, không có tên
        let req = test::TestRequest::get().uri("/ws/chat/vip/").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        // Tên không nằm trong allowed_usernames
        let req = test::TestRequest::get().uri("/ws/chat/vip/?name=mallory").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        // Qua được bước kiểm tra quyền, handshake thất bại vì thiếu upgrade headers
        let req = test::TestRequest::get().uri("/ws/chat/vip/?name=alice").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        // Tên room chỉ có khoảng trắng
        let req = test::TestRequest::get().uri("/ws/chat/%20%20/").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[::core::prelude::v1::test]
    fn test_parse_client_frame() {
        assert!(parse_client_frame("not json").is_none());
        assert!(parse_client_frame(r#"{"message":42}"#).is_none());

        let msg = parse_client_frame(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(msg.message, "hi");
    }
}

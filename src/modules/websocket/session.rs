/// WebSocket Session Actor
///
/// Mỗi WebSocket connection có một Session actor riêng.
/// Session actor giữ profile (tên + màu) của kết nối, kiểm tra tin nhắn
/// client gửi lên và gửi messages tới client thông qua mpsc channel
/// được bridge từ handler.rs.
use actix::prelude::*;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::events::*;
use super::message::{ClientMessage, PresenceEntry, ServerMessage};
use super::server::WebSocketServer;
use crate::api::error;
use crate::utils::{random_color, random_user_name};

/// Tên và màu hiển thị của một kết nối
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatProfile {
    pub name: String,
    pub color: String,
}

impl ChatProfile {
    /// `User####` + màu ngẫu nhiên
    pub fn random() -> Self {
        Self { name: random_user_name(), color: random_color() }
    }

    /// Tên cố định (room bị khoá), màu vẫn ngẫu nhiên
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), color: random_color() }
    }

    pub fn to_presence(&self) -> PresenceEntry {
        PresenceEntry { user: self.name.clone(), color: self.color.clone() }
    }
}

/// WebSocket session cho một client
pub struct WebSocketSession {
    /// Unique session ID
    pub id: Uuid,

    /// Room mà session đang ở
    pub room: String,

    pub profile: ChatProfile,

    /// Address của WebSocket server actor
    pub server: Addr<WebSocketServer>,

    /// Channel gửi JSON messages tới client (bridge → handler.rs → WebSocket)
    pub tx: mpsc::UnboundedSender<String>,

    /// Số ký tự tối đa của một tin nhắn
    pub max_message_length: usize,
}

impl WebSocketSession {
    pub fn new(
        server: Addr<WebSocketServer>,
        room: String,
        profile: ChatProfile,
        tx: mpsc::UnboundedSender<String>,
        max_message_length: usize,
    ) -> Self {
        Self { id: Uuid::now_v7(), room, profile, server, tx, max_message_length }
    }

    /// Gửi ServerMessage tới client thông qua channel
    fn send_to_client(&self, msg: &ServerMessage) {
        match serde_json::to_string(msg) {
            Ok(json) => {
                if let Err(e) = self.tx.send(json) {
                    tracing::error!("Could not send message to client (session {}): {}", self.id, e);
                }
            }
            Err(e) => {
                tracing::error!("Could not serialize ServerMessage (session {}): {}", self.id, e);
            }
        }
    }

    fn send_error(&self, message: &str) {
        self.send_to_client(&ServerMessage::Error { message: message.to_string() });
    }

    /// Xử lý tin nhắn từ client: giải mã (nếu nén) → trim → kiểm tra độ dài → broadcast
    fn handle_client_message(&self, msg: &ClientMessage) {
        let text = match msg.resolve_text().map_err(error::SystemError::from) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Invalid compressed payload (session {}): {}", self.id, e);
                self.send_error(&error::Error::from(e).to_string());
                return;
            }
        };

        let text = text.trim();
        if text.is_empty() {
            return;
        }

        if text.chars().count() > self.max_message_length {
            self.send_error(&format!(
                "Message is too long (max {} characters)",
                self.max_message_length
            ));
            return;
        }

        self.server.do_send(BroadcastChat {
            room: self.room.clone(),
            message: text.to_string(),
            user: self.profile.name.clone(),
            color: self.profile.color.clone(),
        });
    }
}

impl Actor for WebSocketSession {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::debug!("WebSocket session started: {} as {}", self.id, self.profile.name);

        self.server.do_send(Connect {
            id: self.id,
            room: self.room.clone(),
            profile: self.profile.clone(),
            addr: ctx.address(),
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::debug!("WebSocket session stopped: {}", self.id);

        self.server.do_send(Disconnect { id: self.id });
    }
}

/// Implement Message trait cho ClientMessage để có thể send qua actors
impl Message for ClientMessage {
    type Result = ();
}

/// Handler: Nhận ClientMessage từ handler.rs
impl Handler<ClientMessage> for WebSocketSession {
    type Result = ();

    fn handle(&mut self, msg: ClientMessage, _ctx: &mut Context<Self>) {
        self.handle_client_message(&msg);
    }
}

/// Handler: Nhận ServerMessage từ server actor → serialize → gửi tới client qua channel
impl Handler<ServerMessage> for WebSocketSession {
    type Result = ();

    fn handle(&mut self, msg: ServerMessage, _ctx: &mut Context<Self>) {
        self.send_to_client(&msg);
    }
}

/// Handler: Socket đã đóng → dừng actor (stopped() sẽ báo Disconnect)
impl Handler<CloseSession> for WebSocketSession {
    type Result = ();

    fn handle(&mut self, _: CloseSession, ctx: &mut Context<Self>) {
        ctx.stop();
    }
}

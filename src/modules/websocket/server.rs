/// WebSocket Server Actor
///
/// Server actor quản lý tất cả WebSocket sessions và room membership.
/// Mọi state real-time nằm trong actor này nên không cần lock; session
/// actors giao tiếp với nó qua `do_send`/`send`.
use actix::prelude::*;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use super::events::*;
use super::message::{PresenceEntry, ServerMessage};
use super::session::{ChatProfile, WebSocketSession};
use crate::constants::{SYSTEM_COLOR, SYSTEM_USER};
use crate::modules::huffman::encode_text;

struct SessionEntry {
    addr: Addr<WebSocketSession>,
    room: String,
    profile: ChatProfile,
}

/// WebSocket server quản lý tất cả client sessions và rooms
pub struct WebSocketServer {
    /// Map: session_id -> session (address, room, profile)
    sessions: HashMap<Uuid, SessionEntry>,

    /// Map: room name -> set of session_ids
    /// Room không còn session nào sẽ bị xoá khỏi map
    rooms: HashMap<String, HashSet<Uuid>>,

    /// Gắn thêm bản nén Huffman vào mỗi tin nhắn chat
    compress_messages: bool,
}

impl WebSocketServer {
    pub fn new(compress_messages: bool) -> Self {
        Self { sessions: HashMap::new(), rooms: HashMap::new(), compress_messages }
    }

    /// Presence list của room, sắp xếp theo tên
    fn presence(&self, room: &str) -> Vec<PresenceEntry> {
        let mut users: Vec<PresenceEntry> = self
            .rooms
            .get(room)
            .into_iter()
            .flatten()
            .filter_map(|id| self.sessions.get(id))
            .map(|entry| entry.profile.to_presence())
            .collect();
        users.sort();
        users
    }

    /// Gửi message tới một session cụ thể
    fn send_to_session(&self, session_id: &Uuid, message: ServerMessage) {
        if let Some(entry) = self.sessions.get(session_id) {
            entry.addr.do_send(message);
        }
    }

    /// Gửi message tới tất cả sessions trong room, trả về số session đã gửi
    fn send_to_room(&self, room: &str, message: &ServerMessage) -> usize {
        let Some(session_ids) = self.rooms.get(room) else {
            return 0;
        };
        for session_id in session_ids {
            self.send_to_session(session_id, message.clone());
        }
        session_ids.len()
    }

    fn broadcast_presence(&self, room: &str) {
        let message = ServerMessage::Presence { room: room.to_string(), users: self.presence(room) };
        self.send_to_room(room, &message);
    }
}

impl Actor for WebSocketServer {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("WebSocket server started (compression: {})", self.compress_messages);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("WebSocket server stopped");
    }
}

/// Handler: Session mới vào room
impl Handler<Connect> for WebSocketServer {
    type Result = ();

    fn handle(&mut self, msg: Connect, _: &mut Context<Self>) {
        let welcome = ServerMessage::Chat {
            message: format!("You joined as {}", msg.profile.name),
            user: SYSTEM_USER.to_string(),
            color: SYSTEM_COLOR.to_string(),
            compressed: None,
        };

        self.rooms.entry(msg.room.clone()).or_default().insert(msg.id);
        self.sessions.insert(
            msg.id,
            SessionEntry { addr: msg.addr, room: msg.room.clone(), profile: msg.profile },
        );

        // Tin hệ thống chỉ gửi cho chính session vừa vào
        self.send_to_session(&msg.id, welcome);
        self.broadcast_presence(&msg.room);

        tracing::info!(
            "Session {} joined room {} ({} sessions in room)",
            msg.id,
            msg.room,
            self.rooms.get(&msg.room).map_or(0, HashSet::len)
        );
    }
}

/// Handler: Session disconnected
impl Handler<Disconnect> for WebSocketServer {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, _: &mut Context<Self>) {
        let Some(entry) = self.sessions.remove(&msg.id) else {
            tracing::debug!("Disconnect for unknown session {}", msg.id);
            return;
        };

        let mut room_empty = false;
        if let Some(room) = self.rooms.get_mut(&entry.room) {
            room.remove(&msg.id);
            room_empty = room.is_empty();
        }

        if room_empty {
            self.rooms.remove(&entry.room);
            tracing::debug!("Room {} empty, removed", entry.room);
        } else {
            self.broadcast_presence(&entry.room);
        }

        tracing::info!("Session {} ({}) left room {}", msg.id, entry.profile.name, entry.room);
    }
}

/// Handler: Broadcast tin nhắn chat tới room
impl Handler<BroadcastChat> for WebSocketServer {
    type Result = ();

    fn handle(&mut self, msg: BroadcastChat, _: &mut Context<Self>) {
        let compressed = if self.compress_messages {
            match encode_text(&msg.message) {
                Ok(compressed) => {
                    tracing::debug!(
                        "Compressed message in room {} to {:.2} of original size",
                        msg.room,
                        compressed.ratio(&msg.message)
                    );
                    Some(compressed)
                }
                Err(e) => {
                    tracing::warn!("Could not compress message in room {}: {}", msg.room, e);
                    None
                }
            }
        } else {
            None
        };

        let event = ServerMessage::Chat {
            message: msg.message,
            user: msg.user,
            color: msg.color,
            compressed,
        };

        let sent_count = self.send_to_room(&msg.room, &event);
        tracing::debug!("Broadcast to room {}: sent to {} sessions", msg.room, sent_count);
    }
}

/// Handler: Lấy online users của room
impl Handler<GetOnlineUsers> for WebSocketServer {
    type Result = MessageResult<GetOnlineUsers>;

    fn handle(&mut self, msg: GetOnlineUsers, _: &mut Context<Self>) -> Self::Result {
        MessageResult(self.presence(&msg.room))
    }
}

/// Handler: Lấy các room đang hoạt động
impl Handler<GetActiveRooms> for WebSocketServer {
    type Result = MessageResult<GetActiveRooms>;

    fn handle(&mut self, _: GetActiveRooms, _: &mut Context<Self>) -> Self::Result {
        MessageResult(self.rooms.iter().map(|(room, ids)| (room.clone(), ids.len())).collect())
    }
}

/// Implement Message trait cho ServerMessage để có thể send tới sessions
impl Message for ServerMessage {
    type Result = ();
}

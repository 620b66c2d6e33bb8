/// WebSocket Actor Events
///
/// Module này định nghĩa các messages được trao đổi giữa các actors
/// trong WebSocket system (giữa Session actors và Server actor).
use actix::prelude::*;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::message::PresenceEntry;
use super::session::{ChatProfile, WebSocketSession};

/// Event: Session mới vào room
#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    /// Unique session ID
    pub id: Uuid,
    /// Room mà session tham gia
    pub room: String,
    /// Tên + màu đã cấp cho session
    pub profile: ChatProfile,
    /// Address của session actor để có thể gửi messages
    pub addr: Addr<WebSocketSession>,
}

/// Event: Session rời khỏi room (socket đóng)
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub id: Uuid,
}

/// Event: Broadcast tin nhắn chat tới tất cả sessions trong room (kể cả người gửi)
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct BroadcastChat {
    pub room: String,
    pub message: String,
    pub user: String,
    pub color: String,
}

/// Event: Lấy presence list của một room
#[derive(Message)]
#[rtype(result = "Vec<PresenceEntry>")]
pub struct GetOnlineUsers {
    pub room: String,
}

/// Event: Lấy các room đang có người (room -> số session)
#[derive(Message)]
#[rtype(result = "BTreeMap<String, usize>")]
pub struct GetActiveRooms;

/// Event: Yêu cầu session actor dừng (handler kết thúc vòng lặp socket)
#[derive(Message)]
#[rtype(result = "()")]
pub struct CloseSession;

/// WebSocket Module
///
/// Real-time layer của chat room:
///
/// - Message protocol (ClientMessage & ServerMessage)
/// - WebSocket Server actor (quản lý sessions, rooms và presence)
/// - WebSocket Session actor (xử lý từng connection)
/// - HTTP handler (upgrade HTTP thành WebSocket)
pub mod events;
pub mod handler;
pub mod message;
pub mod route;
pub mod server;
pub mod session;

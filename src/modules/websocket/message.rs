/// WebSocket Message Protocol
///
/// Module này định nghĩa các message được trao đổi giữa client và server
/// thông qua WebSocket connection.
use serde::{Deserialize, Serialize};

use crate::modules::huffman::{CodecError, Compressed};

/// Message client gửi lên server.
///
/// Client gửi text thường trong `message`, hoặc payload Huffman trong
/// `compressed` (ưu tiên nếu có cả hai). Các key khác bị bỏ qua.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientMessage {
    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressed: Option<Compressed>,
}

impl ClientMessage {
    /// Lấy nội dung text, giải mã Huffman nếu cần
    pub fn resolve_text(&self) -> Result<String, CodecError> {
        match &self.compressed {
            Some(compressed) => compressed.decode(),
            None => Ok(self.message.clone()),
        }
    }
}

/// Một dòng trong presence list
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PresenceEntry {
    pub user: String,
    pub color: String,
}

/// Message server gửi xuống client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Tin nhắn chat (kể cả tin hệ thống "You joined as ...")
    Chat {
        message: String,
        user: String,
        color: String,
        /// Chỉ có khi server bật COMPRESS_MESSAGES
        #[serde(default, skip_serializing_if = "Option::is_none")]
        compressed: Option<Compressed>,
    },

    /// Danh sách người đang ở trong room
    Presence { room: String, users: Vec<PresenceEntry> },

    /// Lỗi xảy ra
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::huffman::encode_text;

    // === ClientMessage deserialization ===

    #[test]
    fn test_client_plain_message_deserialize() {
        let json = r#"{"message":"Xin chào!"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.resolve_text().unwrap(), "Xin chào!");
        assert!(msg.compressed.is_none());
    }

    #[test]
    fn test_client_missing_message_is_empty() {
        let msg: ClientMessage = serde_json::from_str(r#"{"other":"field"}"#).unwrap();
        assert_eq!(msg.resolve_text().unwrap(), "");
    }

    #[test]
    fn test_client_compressed_message_deserialize() {
        let json = r#"{"compressed":{"encoded":"0110","codes":{"a":"0","b":"1"}}}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.resolve_text().unwrap(), "abba");
    }

    #[test]
    fn test_compressed_takes_precedence() {
        let msg = ClientMessage {
            message: "ignored".to_string(),
            compressed: Some(encode_text("used").unwrap()),
        };
        assert_eq!(msg.resolve_text().unwrap(), "used");
    }

    #[test]
    fn test_client_bad_compressed_payload() {
        let json = r#"{"compressed":{"encoded":"012","codes":{"a":"0","b":"1"}}}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.resolve_text().unwrap_err(), CodecError::InvalidBit('2'));
    }

    #[test]
    fn test_invalid_json_returns_error() {
        assert!(serde_json::from_str::<ClientMessage>("not json").is_err());
        assert!(serde_json::from_str::<ClientMessage>(r#"{"message":42}"#).is_err());
    }

    // === ServerMessage serialization ===

    #[test]
    fn test_server_chat_serialize() {
        let msg = ServerMessage::Chat {
            message: "hello".to_string(),
            user: "User1234".to_string(),
            color: "#A1B2C3".to_string(),
            compressed: None,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "chat",
                "message": "hello",
                "user": "User1234",
                "color": "#A1B2C3"
            })
        );
    }

    #[test]
    fn test_server_chat_with_compression_serialize() {
        let msg = ServerMessage::Chat {
            message: "ab".to_string(),
            user: "User1234".to_string(),
            color: "#A1B2C3".to_string(),
            compressed: Some(encode_text("ab").unwrap()),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["compressed"]["encoded"], "01");
        assert_eq!(json["compressed"]["codes"]["b"], "1");
    }

    #[test]
    fn test_server_presence_serialize() {
        let msg = ServerMessage::Presence {
            room: "room1".to_string(),
            users: vec![PresenceEntry { user: "User1000".to_string(), color: "#000000".to_string() }],
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"presence\""));
        assert!(json.contains("\"room\":\"room1\""));
        assert!(json.contains("\"user\":\"User1000\""));
    }

    #[test]
    fn test_server_error_serialize() {
        let msg = ServerMessage::Error { message: "Message is too long".to_string() };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"type":"error","message":"Message is too long"}"#);
    }
}

pub struct Env {
    pub database_url: String,
    pub database_max_connections: u32,
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
    pub default_room: String,
    pub compress_messages: bool,
    pub max_message_length: usize,
}

pub const SYSTEM_USER: &str = "System";
pub const SYSTEM_COLOR: &str = "#888888";
pub const ROOM_NAME_MAX_LENGTH: usize = 255;

impl Env {
    fn new() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://db.sqlite3?mode=rwc".to_string());
        let database_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .expect("DATABASE_MAX_CONNECTIONS must be a valid u32 integer");

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid u16 integer");

        let default_room = std::env::var("DEFAULT_ROOM").unwrap_or_else(|_| "room1".to_string());
        let compress_messages = std::env::var("COMPRESS_MESSAGES")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        let max_message_length = std::env::var("MAX_MESSAGE_LENGTH")
            .unwrap_or_else(|_| "2000".to_string())
            .parse::<usize>()
            .expect("MAX_MESSAGE_LENGTH must be a valid usize integer");

        Env {
            database_url,
            database_max_connections,
            frontend_url,
            ip,
            port,
            default_room,
            compress_messages,
            max_message_length,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

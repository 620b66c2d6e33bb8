use actix_web::web::{get, resource, ServiceConfig};

use crate::modules::websocket::handler::websocket_handler;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(resource("/ws/chat/{room_name}/").route(get().to(websocket_handler)));
}

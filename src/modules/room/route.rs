use actix_web::web::{scope, ServiceConfig};

use crate::modules::room::handle::*;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(index).service(health_check).service(room_view).service(
        scope("/api/rooms")
            .service(list_rooms)
            .service(create_room)
            .service(get_active_rooms)
            .service(get_online_users),
    );
}

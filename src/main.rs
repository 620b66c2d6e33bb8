use actix::Actor;
use actix_cors::Cors;
use actix_web::{self, middleware::Logger, web, App, HttpServer};
use std::sync::{Arc, LazyLock};

use crate::{
    configs::connect_database,
    modules::{
        room::{RoomRepositorySqlite, RoomService},
        websocket::server::WebSocketServer,
    },
};

mod api;
mod configs;
mod constants;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    tracing::info!("Environment variables loaded");
    constants::Env::default()
});

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let db_pool = connect_database().await.map_err(|e| {
        tracing::error!("Database connection error: {}", e);
        std::io::Error::other("Database connection error")
    })?;

    let room_repo = RoomRepositorySqlite::new(db_pool);
    let room_service = RoomService::with_dependencies(Arc::new(room_repo));

    let ws_server = WebSocketServer::new(ENV.compress_messages).start();

    tracing::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(ENV.frontend_url.as_str())
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(room_service.clone()))
            .app_data(web::Data::new(ws_server.clone()))
            .configure(modules::room::route::configure)
            .configure(modules::websocket::route::configure)
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}

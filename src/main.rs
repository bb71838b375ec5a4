//! Main entry point for the backend server.
//!
//! Initializes the actor system, configures application state, and launches
//! the HTTP server with WebSocket endpoints for the ladder and game rooms.

use std::sync::Arc;

use actix::Actor;
use actix_web::{App, HttpServer, web};

use catalog::Catalog;
use game::skills::SkillRegistry;
use server::matchmaking::server::LadderServer;
use server::room::server::RoomManager;

mod catalog;
pub mod config;
mod game;
mod server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger from environment variable (default to info level).
    env_logger::init();

    // Static game data, shared by every room.
    let catalog = Arc::new(Catalog::builtin());
    let skills = Arc::new(SkillRegistry::builtin());

    // Start the RoomManager actor (owns all running matches).
    let room_manager = RoomManager::new(catalog, skills).start();

    // Start the ladder actor (waiting queue, pairing).
    let ladder_addr = LadderServer::new(room_manager.clone()).start();

    // Shared application state for HTTP/WebSocket handlers.
    let state = web::Data::new(server::state::AppState::new(ladder_addr, room_manager));

    // Start the HTTP server with WebSocket endpoints.
    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*")),
            )
            .app_data(state.clone())
            .configure(crate::server::router::config)
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}

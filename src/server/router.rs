//! HTTP and WebSocket routing configuration.
//!
//! Defines the main endpoints for the matchmaking ladder and game rooms.
//! Each endpoint is handled by a dedicated WebSocket actor.

use actix_web::web;

use crate::server::matchmaking::session::ws_ladder;
use crate::server::room::session::ws_room;

/// Configure the application's HTTP/WebSocket routes.
///
/// Each route is handled by its respective actor, which manages the connection lifecycle
/// and business logic for that context.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws/ladder").to(ws_ladder))
        .service(web::resource("/ws/room/{room_id}").to(ws_room));
}

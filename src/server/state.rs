// src/server/state.rs

//! Application state for the backend server.
//!
//! Holds references to the main actor addresses (ladder and room manager).
//! Used to share state between HTTP/WebSocket handlers and the actor system.

use actix::Addr;

use crate::server::matchmaking::server::LadderServer;
use crate::server::room::server::RoomManager;

/// Shared application state, injected into HTTP/WebSocket handlers.
pub struct AppState {
    /// Address of the ladder actor (waiting queue, pairing).
    pub ladder_addr: Addr<LadderServer>,
    /// Address of the room manager actor (room lifecycle, seat lookup).
    pub room_manager: Addr<RoomManager>,
}

impl AppState {
    /// Create a new AppState with the given actor addresses.
    pub fn new(ladder_addr: Addr<LadderServer>, room_manager: Addr<RoomManager>) -> Self {
        AppState { ladder_addr, room_manager }
    }
}

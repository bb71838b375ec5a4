// src/server/mod.rs

//! Server layer root module.
//!
//! This module organizes the transport-facing components, including:
//! - Application state management
//! - HTTP/WebSocket routing
//! - The matchmaking ladder (waiting queue, pairing)
//! - Room orchestration (one match per room, player and spectator sessions)

pub mod matchmaking;
pub mod room;
pub mod router;
pub mod state;
pub mod ws_error;

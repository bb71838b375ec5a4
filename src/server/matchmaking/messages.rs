use actix::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::session::LadderSession;
use super::types::PlayerInfo;

/// A player entered the ladder queue.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Join {
    pub info: PlayerInfo,
    pub addr: Addr<LadderSession>,
}

/// A player left the ladder (disconnect or pairing).
#[derive(Message)]
#[rtype(result = "()")]
pub struct Leave {
    pub player_id: Uuid,
}

/// Client -> server messages on the ladder socket.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "action", content = "data")]
pub enum ClientWsMessage {
    Ping,
}

/// Server -> client messages on the ladder socket.
#[derive(Message, Serialize, Deserialize, Clone, Debug)]
#[rtype(result = "()")]
#[serde(tag = "action", content = "data")]
pub enum ServerWsMessage {
    /// Sent once on connect with the identity the server assigned.
    Registered { player_id: Uuid },
    /// Queue size update, sent to everyone still waiting.
    QueueUpdate { waiting: usize },
    /// A room has been created for this player.
    GameFound { room_id: Uuid },
    Error { message: String },
}

impl ServerWsMessage {
    pub fn error(message: &str) -> Self {
        Self::Error { message: message.to_string() }
    }
}

use actix::prelude::*;
use uuid::Uuid;

use crate::game::events::{ClientRequest, ServerEvent};
use crate::server::matchmaking::types::PlayerInfo;
use crate::server::room::server::RoomActor;

/// Ask the manager to create a room for two paired players.
/// The array order decides nothing; seats were randomized by the ladder.
#[derive(Message)]
#[rtype(result = "Uuid")]
pub struct CreateRoom {
    pub players: [PlayerInfo; 2],
}

/// Resolve a room id to its actor address.
#[derive(Message)]
#[rtype(result = "Result<Addr<RoomActor>, String>")]
pub struct GetRoom {
    pub room_id: Uuid,
}

/// Check whether a player holds a seat in a room (vs. spectating).
#[derive(Message)]
#[rtype(result = "Result<bool, String>")]
pub struct IsPlayerInRoom {
    pub room_id: Uuid,
    pub player_id: Uuid,
}

/// A websocket session attached to the room.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    pub player_id: Uuid,
    pub is_player: bool,
    pub addr: Recipient<Outbound>,
}

/// A websocket session detached from the room.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub player_id: Uuid,
}

/// A parsed action request from a seated player's session.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ProcessClientMessage {
    pub player_id: Uuid,
    pub request: ClientRequest,
}

/// Engine notification relayed to one websocket session.
#[derive(Message, Clone, Debug)]
#[rtype(result = "()")]
pub struct Outbound(pub ServerEvent);

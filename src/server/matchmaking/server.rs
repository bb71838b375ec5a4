//! Matchmaking ladder actor.
//!
//! Holds the queue of players waiting for an opponent. As soon as enough
//! players wait, the two who queued first are paired into a fresh room and
//! told where to connect.

use actix::prelude::*;
use log::{info, warn};
use rand::Rng;

use super::messages::{Join, Leave, ServerWsMessage};
use super::session::LadderSession;
use super::types::PlayerInfo;
use crate::config::matchmaking::ROOM_PLAYERS;
use crate::server::room::messages::CreateRoom;
use crate::server::room::server::RoomManager;

/// A player currently waiting in the queue.
struct WaitingPlayer {
    info: PlayerInfo,
    addr: Addr<LadderSession>,
}

pub struct LadderServer {
    waiting: Vec<WaitingPlayer>,
    room_manager: Addr<RoomManager>,
}

impl LadderServer {
    pub fn new(room_manager: Addr<RoomManager>) -> Self {
        LadderServer { waiting: Vec::new(), room_manager }
    }

    fn broadcast_queue(&self) {
        let msg = ServerWsMessage::QueueUpdate { waiting: self.waiting.len() };
        for player in &self.waiting {
            player.addr.do_send(msg.clone());
        }
    }

    /// Pair the two longest-waiting players into a new room.
    fn try_pair(&mut self, ctx: &mut Context<Self>) {
        if self.waiting.len() < ROOM_PLAYERS {
            return;
        }
        let mut first = self.waiting.remove(0);
        let mut second = self.waiting.remove(0);
        // Seat order is random; the queue order should not decide who is P1.
        if rand::rng().random_bool(0.5) {
            std::mem::swap(&mut first, &mut second);
        }
        info!(
            "[Ladder] pairing {} and {}",
            first.info.username, second.info.username
        );

        let request = self.room_manager.send(CreateRoom {
            players: [first.info.clone(), second.info.clone()],
        });
        let fut = request.into_actor(self).map(move |result, _act, _ctx| match result {
            Ok(room_id) => {
                first.addr.do_send(ServerWsMessage::GameFound { room_id });
                second.addr.do_send(ServerWsMessage::GameFound { room_id });
            }
            Err(err) => {
                warn!("[Ladder] room creation failed: {}", err);
                let msg = ServerWsMessage::error("Could not create a room, please retry");
                first.addr.do_send(msg.clone());
                second.addr.do_send(msg);
            }
        });
        ctx.spawn(fut);
        self.broadcast_queue();
    }
}

impl Actor for LadderServer {
    type Context = Context<Self>;
}

impl Handler<Join> for LadderServer {
    type Result = ();

    fn handle(&mut self, msg: Join, ctx: &mut Context<Self>) {
        info!("[Ladder] {} joined the queue", msg.info.username);
        msg.addr.do_send(ServerWsMessage::Registered { player_id: msg.info.id });
        self.waiting.push(WaitingPlayer { info: msg.info, addr: msg.addr });
        self.broadcast_queue();
        self.try_pair(ctx);
    }
}

impl Handler<Leave> for LadderServer {
    type Result = ();

    fn handle(&mut self, msg: Leave, _: &mut Context<Self>) {
        let before = self.waiting.len();
        self.waiting.retain(|p| p.info.id != msg.player_id);
        if self.waiting.len() != before {
            self.broadcast_queue();
        }
    }
}

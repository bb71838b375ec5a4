//! Room orchestration.
//!
//! The `RoomManager` tracks every open room. Each `RoomActor` owns exactly
//! one `Match`; its mailbox serializes all inbound actions, which is what
//! gives the engine its one-action-at-a-time guarantee. Outbound engine
//! events flow through `RoomNotifier` to whichever sessions are connected.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use actix::prelude::*;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::game::events::{Notifier, ServerEvent};
use crate::game::skills::SkillRegistry;
use crate::game::state::Match;
use crate::game::types::Side;
use crate::server::matchmaking::types::PlayerInfo;
use crate::server::room::messages::{
    Connect, CreateRoom, Disconnect, GetRoom, IsPlayerInRoom, Outbound, ProcessClientMessage,
};

/// Currently connected sessions of one room, shared between the room actor
/// and the notifier living inside its `Match`.
#[derive(Default)]
pub struct RoomLinks {
    seats: HashMap<Side, Recipient<Outbound>>,
    spectators: HashMap<Uuid, Recipient<Outbound>>,
}

/// Routes engine events to the room's connected sessions.
pub struct RoomNotifier {
    links: Rc<RefCell<RoomLinks>>,
}

impl Notifier for RoomNotifier {
    fn notify(&mut self, side: Side, event: &ServerEvent) {
        if let Some(recipient) = self.links.borrow().seats.get(&side) {
            recipient.do_send(Outbound(event.clone()));
        }
    }

    fn broadcast(&mut self, event: &ServerEvent) {
        let links = self.links.borrow();
        for recipient in links.seats.values().chain(links.spectators.values()) {
            recipient.do_send(Outbound(event.clone()));
        }
    }
}

/// One running room: two seats, any number of spectators, one match.
pub struct RoomActor {
    room_id: Uuid,
    /// Seat assignment: index 0 is P1, index 1 is P2.
    players: [PlayerInfo; 2],
    links: Rc<RefCell<RoomLinks>>,
    game: Match,
}

impl RoomActor {
    pub fn new(
        room_id: Uuid,
        players: [PlayerInfo; 2],
        catalog: Arc<Catalog>,
        skills: Arc<SkillRegistry>,
    ) -> Self {
        let links = Rc::new(RefCell::new(RoomLinks::default()));
        let notifier = RoomNotifier { links: links.clone() };
        let mut game = Match::new(catalog, skills, Box::new(notifier));
        // Win/loss policy is undecided; for now the room just records falls.
        game.set_faint_hook(Box::new(move |side, coords, name| {
            info!("[Room {}] {} ({:?}) fell at {}", room_id, name, side, coords);
        }));
        RoomActor { room_id, players, links, game }
    }

    fn seat_of(&self, player_id: Uuid) -> Option<Side> {
        if self.players[0].id == player_id {
            Some(Side::P1)
        } else if self.players[1].id == player_id {
            Some(Side::P2)
        } else {
            None
        }
    }
}

impl Actor for RoomActor {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!(
            "[Room {}] opened for {} vs {}",
            self.room_id, self.players[0].username, self.players[1].username
        );
    }
}

impl Handler<Connect> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: Connect, _: &mut Context<Self>) {
        match self.seat_of(msg.player_id) {
            Some(side) if msg.is_player => {
                debug!("[Room {}] seat {:?} connected", self.room_id, side);
                self.links.borrow_mut().seats.insert(side, msg.addr);
            }
            _ => {
                debug!("[Room {}] spectator {} connected", self.room_id, msg.player_id);
                self.links.borrow_mut().spectators.insert(msg.player_id, msg.addr);
            }
        }
    }
}

impl Handler<Disconnect> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, _: &mut Context<Self>) {
        let mut links = self.links.borrow_mut();
        if let Some(side) = self.seat_of(msg.player_id) {
            links.seats.remove(&side);
        } else {
            links.spectators.remove(&msg.player_id);
        }
    }
}

impl Handler<ProcessClientMessage> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: ProcessClientMessage, _: &mut Context<Self>) {
        let Some(side) = self.seat_of(msg.player_id) else {
            // Sessions filter spectators already; this is belt and braces.
            warn!("[Room {}] action from non-seated {}", self.room_id, msg.player_id);
            return;
        };
        // Rejections are reported to the offending seat by the engine.
        let _ = self.game.dispatch(side, msg.request);
    }
}

struct RoomEntry {
    addr: Addr<RoomActor>,
    player_ids: [Uuid; 2],
}

/// Tracks open rooms and answers room/seat lookups.
pub struct RoomManager {
    rooms: HashMap<Uuid, RoomEntry>,
    catalog: Arc<Catalog>,
    skills: Arc<SkillRegistry>,
}

impl RoomManager {
    pub fn new(catalog: Arc<Catalog>, skills: Arc<SkillRegistry>) -> Self {
        RoomManager { rooms: HashMap::new(), catalog, skills }
    }

    pub fn create_room(&mut self, players: [PlayerInfo; 2]) -> Uuid {
        let room_id = Uuid::new_v4();
        let player_ids = [players[0].id, players[1].id];
        let addr = RoomActor::new(
            room_id,
            players,
            self.catalog.clone(),
            self.skills.clone(),
        )
        .start();
        self.rooms.insert(room_id, RoomEntry { addr, player_ids });
        room_id
    }
}

impl Actor for RoomManager {
    type Context = Context<Self>;
}

impl Handler<CreateRoom> for RoomManager {
    type Result = MessageResult<CreateRoom>;

    fn handle(&mut self, msg: CreateRoom, _: &mut Context<Self>) -> Self::Result {
        MessageResult(self.create_room(msg.players))
    }
}

impl Handler<GetRoom> for RoomManager {
    type Result = Result<Addr<RoomActor>, String>;

    fn handle(&mut self, msg: GetRoom, _: &mut Context<Self>) -> Self::Result {
        self.rooms
            .get(&msg.room_id)
            .map(|entry| entry.addr.clone())
            .ok_or_else(|| "Room not found".to_string())
    }
}

impl Handler<IsPlayerInRoom> for RoomManager {
    type Result = Result<bool, String>;

    fn handle(&mut self, msg: IsPlayerInRoom, _: &mut Context<Self>) -> Self::Result {
        self.rooms
            .get(&msg.room_id)
            .map(|entry| entry.player_ids.contains(&msg.player_id))
            .ok_or_else(|| "Room not found".to_string())
    }
}

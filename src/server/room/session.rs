use actix::prelude::*;
use actix_web::{Error, HttpRequest, HttpResponse, error, web};
use actix_web_actors::ws;
use uuid::Uuid;

use crate::game::events::ClientRequest;
use crate::server::room::messages::{Connect, Disconnect, GetRoom, IsPlayerInRoom, Outbound, ProcessClientMessage};
use crate::server::room::server::RoomActor;
use crate::server::ws_error::ws_error_message;

/// One websocket connection to a room, seated player or spectator.
pub struct RoomSession {
    pub room_id: Uuid,
    pub player_id: Uuid,
    pub is_player: bool,
    pub room_addr: Addr<RoomActor>,
}

impl Actor for RoomSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        log::debug!(
            "[Room {}] session {} opening (player: {})",
            self.room_id, self.player_id, self.is_player
        );
        self.room_addr.do_send(Connect {
            player_id: self.player_id,
            is_player: self.is_player,
            addr: ctx.address().recipient(),
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.room_addr.do_send(Disconnect { player_id: self.player_id });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for RoomSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => {
                if !self.is_player {
                    ctx.text(ws_error_message(
                        "SPECTATOR",
                        "Spectators cannot send commands",
                        None,
                    ));
                    return;
                }
                // Malformed payloads never reach the engine.
                let request: ClientRequest = match serde_json::from_str(&text) {
                    Ok(r) => r,
                    Err(_) => {
                        ctx.text(ws_error_message("INVALID_REQUEST", "Invalid request sent", None));
                        return;
                    }
                };
                self.room_addr.do_send(ProcessClientMessage {
                    player_id: self.player_id,
                    request,
                });
            }
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Close(_)) => ctx.stop(),
            _ => (),
        }
    }
}

impl Handler<Outbound> for RoomSession {
    type Result = ();

    /// Relays an engine event to the client as JSON text.
    fn handle(&mut self, msg: Outbound, ctx: &mut Self::Context) {
        match serde_json::to_string(&msg.0) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                log::error!("Failed to serialize ServerEvent: {}", e);
                ctx.text(ws_error_message("INTERNAL", "Failed to serialize event", None));
            }
        }
    }
}

/// WebSocket endpoint for a game room.
///
/// Path: `/ws/room/{room_id}`. A `player_id` query parameter claims a seat;
/// connections without one (or with an unknown id) join as spectators.
pub async fn ws_room(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    let room_id = req
        .match_info()
        .get("room_id")
        .ok_or_else(|| error::ErrorBadRequest("Missing room id"))?;
    let room_id = Uuid::parse_str(room_id).map_err(error::ErrorBadRequest)?;

    let player_id = req
        .query_string()
        .split('&')
        .find(|s| s.starts_with("player_id="))
        .and_then(|s| Uuid::parse_str(s.split('=').nth(1).unwrap_or("")).ok())
        .unwrap_or_else(Uuid::new_v4); // Spectators get a throwaway id.

    let is_player = data
        .room_manager
        .send(IsPlayerInRoom { room_id, player_id })
        .await
        .map_err(error::ErrorInternalServerError)?
        .map_err(error::ErrorBadRequest)?;

    let room_addr = data
        .room_manager
        .send(GetRoom { room_id })
        .await
        .map_err(error::ErrorInternalServerError)?
        .map_err(error::ErrorBadRequest)?;

    ws::start(
        RoomSession { room_id, player_id, is_player, room_addr },
        &req,
        stream,
    )
}

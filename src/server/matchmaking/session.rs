//! WebSocket session handler for the matchmaking ladder.
//!
//! This actor manages a single player's connection to the queue, registering
//! the player on connect and removing them on disconnect. Server messages
//! (queue updates, pairing results) are serialized and pushed to the client.

use actix::prelude::*;
use actix_web::{Error, HttpRequest, HttpResponse, web};
use actix_web_actors::ws;
use std::borrow::Cow;
use uuid::Uuid;

use super::messages::{ClientWsMessage, Join, Leave, ServerWsMessage};
use super::server::LadderServer;
use super::types::PlayerInfo;
use crate::server::ws_error::ws_error_message;

/// A player's WebSocket session in the ladder queue.
pub struct LadderSession {
    pub info: PlayerInfo,
    pub ladder_addr: Addr<LadderServer>,
}

impl Actor for LadderSession {
    type Context = ws::WebsocketContext<Self>;

    /// Called when the session starts. Enters the player into the queue.
    fn started(&mut self, ctx: &mut Self::Context) {
        self.ladder_addr.do_send(Join {
            info: self.info.clone(),
            addr: ctx.address(),
        });
    }

    /// Called when the session stops. Removes the player from the queue.
    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.ladder_addr.do_send(Leave { player_id: self.info.id });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for LadderSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => {
                match serde_json::from_str::<ClientWsMessage>(&text) {
                    Ok(ClientWsMessage::Ping) => {
                        // Keepalive; nothing to do.
                    }
                    Err(_) => {
                        ctx.text(ws_error_message(
                            "INVALID_REQUEST",
                            "Invalid client message",
                            None,
                        ));
                    }
                }
            }
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Close(_)) => ctx.stop(),
            _ => (),
        }
    }
}

impl Handler<ServerWsMessage> for LadderSession {
    type Result = ();

    /// Relays a server message to the client as JSON text.
    fn handle(&mut self, msg: ServerWsMessage, ctx: &mut Self::Context) {
        match serde_json::to_string(&msg) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                log::error!("Failed to serialize ServerWsMessage: {}", e);
                ctx.text(ws_error_message("INTERNAL", "Internal server error", None));
                ctx.close(Some(ws::CloseReason {
                    code: ws::CloseCode::Error,
                    description: Some("Internal server error".into()),
                }));
                ctx.stop();
            }
        }
    }
}

/// WebSocket endpoint for the matchmaking ladder.
///
/// Expects an optional `username` query parameter. The server assigns the
/// player id and reports it back in a `Registered` message.
pub async fn ws_ladder(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    let mut username = String::new();
    for kv in req.query_string().split('&') {
        let mut split = kv.split('=');
        if let (Some("username"), Some(name)) = (split.next(), split.next()) {
            username = urlencoding::decode(name)
                .unwrap_or_else(|_| Cow::Borrowed(""))
                .into_owned();
        }
    }

    let player_id = Uuid::new_v4();
    if username.is_empty() {
        username = format!("Player_{}", &player_id.to_string()[..6]);
    }

    ws::start(
        LadderSession {
            info: PlayerInfo { id: player_id, username },
            ladder_addr: data.ladder_addr.clone(),
        },
        &req,
        stream,
    )
}

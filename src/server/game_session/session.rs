/// WebSocket session handler for a running game.
///
/// One actor per connected client. It registers with the game session, forwards parsed
/// client commands to it and writes every server message back to the socket.
use actix::prelude::*;
use actix_web::{error, http::StatusCode, web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::info;
use std::borrow::Cow;
use uuid::Uuid;

use crate::server::game_session::messages::{ClientAction, ProcessClientMessage, ServerMessage};
use crate::server::game_session::server::{
    GameSession, GetGameSession, RegisterSession, UnregisterSession,
};
use crate::server::ws_error::{http_error_response, ws_error_message};

pub struct GameSessionActor {
    pub game_id: Uuid,
    pub client_id: Uuid,
    pub username: String,
    pub session_addr: Addr<GameSession>,
}

impl Actor for GameSessionActor {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.session_addr.do_send(RegisterSession {
            client_id: self.client_id,
            username: self.username.clone(),
            addr: ctx.address().recipient(),
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.session_addr.do_send(UnregisterSession {
            client_id: self.client_id,
        });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for GameSessionActor {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => match serde_json::from_str::<ClientAction>(&text) {
                Ok(action) => self.session_addr.do_send(ProcessClientMessage {
                    msg: action,
                    client_id: self.client_id,
                    addr: ctx.address().recipient(),
                }),
                Err(_) => ctx.text(ws_error_message(
                    "INVALID_COMMAND",
                    "Invalid client message",
                    Some(&self.game_id.to_string()),
                )),
            },
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Close(_)) => ctx.stop(),
            _ => (),
        }
    }
}

impl Handler<ServerMessage> for GameSessionActor {
    type Result = ();

    fn handle(&mut self, msg: ServerMessage, ctx: &mut Self::Context) -> Self::Result {
        match serde_json::to_string(&msg) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                log::error!("[GameSessionActor] Failed to serialize ServerMessage: {}", e);
                ctx.text(ws_error_message("INTERNAL", "Internal server error", None));
            }
        }
        if let ServerMessage::GameEnded { .. } = msg {
            ctx.close(Some(ws::CloseReason {
                code: ws::CloseCode::Normal,
                description: Some("Game over".into()),
            }));
            ctx.stop();
        }
    }
}

/// Display name from the `username` query parameter, or a generated one.
fn username_from_query(query: &str, client_id: &Uuid) -> String {
    let username = query
        .split('&')
        .filter_map(|kv| kv.split_once('='))
        .find(|(key, _)| *key == "username")
        .map(|(_, value)| {
            urlencoding::decode(value)
                .unwrap_or_else(|_| Cow::Borrowed(""))
                .trim()
                .to_string()
        })
        .unwrap_or_default();
    if username.is_empty() {
        format!("Guest_{}", &client_id.simple().to_string()[..6])
    } else {
        username
    }
}

/// WebSocket endpoint for a game.
///
/// Path: `/ws/game/{game_id}`. Optional query parameter: `username` (chat display name).
pub async fn ws_game(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    let game_id = req.match_info().get("game_id").unwrap_or_default();
    let game_id = Uuid::parse_str(game_id).map_err(error::ErrorBadRequest)?;

    let client_id = Uuid::new_v4();
    let username = username_from_query(req.query_string(), &client_id);

    let session_addr = match data
        .game_session_manager
        .send(GetGameSession { game_id })
        .await
        .map_err(error::ErrorInternalServerError)?
    {
        Ok(addr) => addr,
        Err(message) => {
            return Ok(http_error_response(
                "GAME_NOT_FOUND",
                &message,
                Some(&game_id.to_string()),
                StatusCode::NOT_FOUND,
            ));
        }
    };

    info!("[GameSessionActor] {} connecting to game_id={}", username, game_id);
    ws::start(
        GameSessionActor {
            game_id,
            client_id,
            username,
            session_addr,
        },
        &req,
        stream,
    )
}

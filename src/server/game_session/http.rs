//! HTTP endpoints around game sessions: creating a table and reading what the ledger recorded.

use actix_web::{error, http::StatusCode, web, Error, HttpResponse};
use log::info;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::config::game::GameConfig;
use crate::game::roster::{deal_roles, default_table};
use crate::game::types::PlayerSpec;
use crate::ledger::LedgerError;
use crate::server::game_session::server::CreateGame;
use crate::server::state::AppState;
use crate::server::ws_error::http_error_response;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateGameRequest {
    /// Seats to use instead of the default eight-player table.
    pub players: Option<Vec<PlayerSpec>>,
    /// Shuffle the roles across the seats before starting.
    pub shuffle_roles: bool,
    pub phase_duration: Option<u32>,
    pub sound_enabled: Option<bool>,
    pub await_ledger_ack: bool,
}

impl CreateGameRequest {
    fn into_parts(self) -> (Vec<PlayerSpec>, GameConfig) {
        let defaults = GameConfig::default();
        let config = GameConfig {
            phase_duration: self.phase_duration.unwrap_or(defaults.phase_duration),
            sound_enabled: self.sound_enabled.unwrap_or(defaults.sound_enabled),
            await_ledger_ack: self.await_ledger_ack,
            ..defaults
        };
        let mut players = self.players.unwrap_or_else(default_table);
        if self.shuffle_roles {
            deal_roles(&mut players, &mut rand::rng());
        }
        (players, config)
    }
}

/// `POST /games`: start a new session. The body is optional.
pub async fn create_game(
    body: Option<web::Json<CreateGameRequest>>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let request = body.map(web::Json::into_inner).unwrap_or_default();
    let (players, config) = request.into_parts();

    let created = data
        .game_session_manager
        .send(CreateGame { players, config })
        .await
        .map_err(error::ErrorInternalServerError)?;

    match created {
        Ok(game_id) => {
            info!("[HTTP] Game created game_id={}", game_id);
            Ok(HttpResponse::Created().json(json!({ "game_id": game_id })))
        }
        Err(e) => Ok(http_error_response(e.code(), &e.to_string(), None, StatusCode::BAD_REQUEST)),
    }
}

/// `GET /games/{game_id}/ledger`: the calls the ledger recorded for a game.
pub async fn ledger_state(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let game_id = path.into_inner();
    match data.ledger.get_game_state(game_id).await {
        Ok(snapshot) => Ok(HttpResponse::Ok().json(snapshot)),
        Err(e @ LedgerError::UnknownGame(_)) => Ok(http_error_response(
            "GAME_NOT_FOUND",
            &e.to_string(),
            Some(&game_id.to_string()),
            StatusCode::NOT_FOUND,
        )),
        Err(e) => Ok(http_error_response(
            "LEDGER_UNAVAILABLE",
            &e.to_string(),
            Some(&game_id.to_string()),
            StatusCode::BAD_GATEWAY,
        )),
    }
}

//! HTTP and WebSocket routing configuration.
//!
//! Games are created over HTTP; play happens on the game's WebSocket endpoint.

use actix_web::web;
use crate::server::game_session::http::{create_game, ledger_state};
use crate::server::game_session::session::ws_game;

/// Configure the application's HTTP/WebSocket routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/games")
            .route(web::post().to(create_game))
    )
    .service(
        web::resource("/games/{game_id}/ledger")
            .route(web::get().to(ledger_state))
    )
    .service(
        web::resource("/ws/game/{game_id}")
            .to(ws_game)
    );
}

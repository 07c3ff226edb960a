//! Main entry point for the StarkWolf game server.
//!
//! Initializes the actor system, configures application state, and launches the HTTP server
//! with the game creation endpoint and the per-game WebSocket endpoint.

use actix::Actor;
use actix_web::{web, App, HttpServer};
use log::info;
use std::sync::Arc;

use config::server::{BIND_ADDR, BIND_PORT};
use ledger::{Ledger, OfflineLedger, RetryingLedger};
use server::game_session::server::GameSessionManager;

pub mod config;
mod game;
mod ledger;
mod server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Default to info level unless RUST_LOG says otherwise.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let ledger: Arc<dyn Ledger> = Arc::new(RetryingLedger::new(OfflineLedger::new()));

    // Start the GameSessionManager actor (handles all game sessions).
    let game_session_manager = GameSessionManager::new(Arc::clone(&ledger)).start();

    let state = web::Data::new(server::state::AppState::new(game_session_manager, ledger));

    info!("[Server] Listening on {}:{}", BIND_ADDR, BIND_PORT);
    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*"))
            )
            .app_data(state.clone())
            .configure(crate::server::router::config)
    })
    .bind((BIND_ADDR, BIND_PORT))?
    .run()
    .await
}

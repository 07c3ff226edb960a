// src/server/state.rs

//! Application state for the backend server.
//!
//! Holds the game session manager address and the ledger client shared by all sessions.
//! Used to share state between HTTP/WebSocket handlers and the actor system.

use actix::Addr;
use std::sync::Arc;

use crate::ledger::Ledger;
use crate::server::game_session::server::GameSessionManager;

/// Shared application state, injected into HTTP/WebSocket handlers.
pub struct AppState {
    /// Address of the game session manager actor (creates, looks up and ends games).
    pub game_session_manager: Addr<GameSessionManager>,
    /// Settlement client, also handed to every session by the manager.
    pub ledger: Arc<dyn Ledger>,
}

impl AppState {
    pub fn new(game_session_manager: Addr<GameSessionManager>, ledger: Arc<dyn Ledger>) -> Self {
        AppState {
            game_session_manager,
            ledger,
        }
    }
}

// src/server/mod.rs

//! Server layer root module.
//!
//! This module hosts running games for browser clients:
//! - Application state management
//! - HTTP/WebSocket routing
//! - Game session orchestration (one actor per game driving the engine clock)
//! - JSON error frames

pub mod state;
pub mod router;
pub mod game_session;
pub mod ws_error;

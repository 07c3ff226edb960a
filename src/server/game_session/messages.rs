use actix::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::actions::{ActionOutcome, PlayerAction};
use crate::game::error::GameError;
use crate::game::sound::SoundIntent;
use crate::game::state::GameSnapshot;
use crate::game::types::PlayerId;
use crate::ledger::{LedgerAction, LedgerError, Receipt};

#[derive(Message)]
#[rtype(result = "()")]
pub struct ProcessClientMessage {
    pub msg: ClientAction,
    pub client_id: Uuid,
    /// Where replies meant only for the sender go.
    pub addr: Recipient<ServerMessage>,
}

// Client -> server
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "action", content = "data")]
pub enum ClientAction {
    SetName { name: String },
    Ready,
    ClosePopup,
    Act(PlayerAction),
    /// UI/debug hook behind the table view's skull button: kills a player outright, with no
    /// game rule checked. Only the controlling client may send it.
    Eliminate { player_id: PlayerId },
    ToggleSound { enabled: bool },
    Chat { message: String },
    Ping,
}

// Server -> client
#[derive(Message, Serialize, Clone, Debug)]
#[rtype(result = "()")]
#[serde(tag = "action", content = "data")]
pub enum ServerMessage {
    GameStateUpdate(GameSnapshot),
    Sound(SoundIntent),
    ActionResult(ActionOutcome),
    LedgerReceipt(Receipt),
    Chat { sender: String, message: String },
    GameEnded { game_id: Uuid },
    Error { code: String, message: String, context: String },
}

impl ServerMessage {
    pub fn error(code: &str, message: &str, context: Option<&str>) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.to_string(),
            context: context.unwrap_or("").to_string(),
        }
    }

    pub fn game_error(err: &GameError, game_id: Uuid) -> Self {
        Self::error(err.code(), &err.to_string(), Some(&game_id.to_string()))
    }
}

/// Answer of the ledger for a call the session submitted.
#[derive(Message)]
#[rtype(result = "()")]
pub struct LedgerSettled {
    pub call: LedgerAction,
    pub result: Result<Receipt, LedgerError>,
}

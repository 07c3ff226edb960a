use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::types::PlayerId;

/// Calls understood by the settlement contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "snake_case")]
pub enum LedgerAction {
    StartGame { players: Vec<PlayerId> },
    Vote { target: PlayerId },
    NightAction { target: PlayerId },
    CupidAction { lover1: PlayerId, lover2: PlayerId },
    HunterAction { target: PlayerId },
    EndVoting,
}

impl LedgerAction {
    /// Contract entrypoint name.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerAction::StartGame { .. } => "start_game",
            LedgerAction::Vote { .. } => "vote",
            LedgerAction::NightAction { .. } => "night_action",
            LedgerAction::CupidAction { .. } => "cupid_action",
            LedgerAction::HunterAction { .. } => "hunter_action",
            LedgerAction::EndVoting => "end_voting",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_hash: String,
    pub game_id: Uuid,
    pub action: LedgerAction,
}

/// What the ledger has recorded for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub game_id: Uuid,
    pub players: Vec<PlayerId>,
    pub actions: Vec<LedgerAction>,
}

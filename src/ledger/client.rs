use std::collections::HashMap;

use async_trait::async_trait;
use log::{debug, info};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::error::LedgerError;
use super::types::{LedgerAction, LedgerSnapshot, Receipt};

#[async_trait]
pub trait Ledger: Send + Sync {
    async fn submit_action(&self, game_id: Uuid, action: LedgerAction) -> Result<Receipt, LedgerError>;

    async fn get_game_state(&self, game_id: Uuid) -> Result<LedgerSnapshot, LedgerError>;
}

/// In-memory ledger for local play. Records every action and hands out fake receipts.
#[derive(Default)]
pub struct OfflineLedger {
    games: Mutex<HashMap<Uuid, LedgerSnapshot>>,
}

impl OfflineLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Ledger for OfflineLedger {
    async fn submit_action(&self, game_id: Uuid, action: LedgerAction) -> Result<Receipt, LedgerError> {
        let mut games = self.games.lock().await;

        match &action {
            LedgerAction::StartGame { players } => {
                if games.contains_key(&game_id) {
                    return Err(LedgerError::Rejected {
                        action: action.kind(),
                        reason: "game already exists with this id".to_string(),
                    });
                }
                games.insert(game_id, LedgerSnapshot {
                    game_id,
                    players: players.clone(),
                    actions: Vec::new(),
                });
                info!("[Ledger] Game registered: game_id={} players={}", game_id, players.len());
            }
            _ => {
                let game = games.get_mut(&game_id).ok_or(LedgerError::UnknownGame(game_id))?;
                game.actions.push(action.clone());
                debug!("[Ledger] Recorded {} for game_id={}", action.kind(), game_id);
            }
        }

        Ok(Receipt {
            tx_hash: format!("0x{}", Uuid::new_v4().simple()),
            game_id,
            action,
        })
    }

    async fn get_game_state(&self, game_id: Uuid) -> Result<LedgerSnapshot, LedgerError> {
        self.games
            .lock()
            .await
            .get(&game_id)
            .cloned()
            .ok_or(LedgerError::UnknownGame(game_id))
    }
}

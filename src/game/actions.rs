//! Actions the protagonist can take, and when they are allowed.
//!
//! Guard protection and seer inspection resolve locally. Everything else is settled by the
//! ledger: the engine validates the action and queues the matching ledger call.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::game::error::GameError;
use crate::game::sound::SoundPort;
use crate::game::state::GameEngine;
use crate::game::types::{NightTurn, Phase, Player, PlayerId, Role, Stage};
use crate::ledger::{LedgerAction, LedgerError, Receipt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "snake_case")]
pub enum PlayerAction {
    Protect { target: PlayerId },
    Inspect { target: PlayerId },
    Kill { target: PlayerId },
    Pair { first: PlayerId, second: PlayerId },
    Vote { target: PlayerId },
    Revenge { target: PlayerId },
}

impl PlayerAction {
    /// Night turn the action belongs to. Votes and revenge are not tied to a night turn.
    pub fn night_turn(&self) -> Option<NightTurn> {
        match self {
            PlayerAction::Protect { .. } => Some(NightTurn::Guard),
            PlayerAction::Inspect { .. } => Some(NightTurn::Seer),
            PlayerAction::Kill { .. } => Some(NightTurn::Werewolf),
            PlayerAction::Pair { .. } => Some(NightTurn::Cupid),
            PlayerAction::Vote { .. } | PlayerAction::Revenge { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    Protected { target: PlayerId },
    /// Only the protagonist sees this.
    Revealed { target: PlayerId, role: Role },
    Submitted { call: LedgerAction },
}

/// Per-turn and per-game bookkeeping of what the protagonist already did.
#[derive(Debug, Default)]
pub(crate) struct ActionLog {
    acted_this_turn: bool,
    voted_today: bool,
    revenge_taken: bool,
    pub(crate) awaiting_ack: Option<LedgerAction>,
    pub(crate) expiry_deferred: bool,
}

impl ActionLog {
    pub(crate) fn new_turn(&mut self) {
        self.acted_this_turn = false;
    }

    pub(crate) fn new_day(&mut self) {
        self.acted_this_turn = false;
        self.voted_today = false;
    }
}

impl<S: SoundPort> GameEngine<S> {
    pub fn take_action(&mut self, action: PlayerAction) -> Result<ActionOutcome, GameError> {
        if self.stage != Stage::InProgress || self.is_game_over() {
            return Err(GameError::rejected("the game is not in progress"));
        }
        let me = self
            .roster
            .protagonist()
            .cloned()
            .ok_or_else(|| GameError::rejected("no protagonist at this table"))?;

        let outcome = match action {
            PlayerAction::Revenge { target } => {
                if me.role != Role::Hunter || me.is_alive() {
                    return Err(GameError::rejected("only a dead hunter can take revenge"));
                }
                if self.actions.revenge_taken {
                    return Err(GameError::rejected("revenge was already taken"));
                }
                self.living_target(target, &me, false)?;
                self.actions.revenge_taken = true;
                ActionOutcome::Submitted { call: LedgerAction::HunterAction { target } }
            }
            PlayerAction::Vote { target } => {
                require_alive(&me)?;
                if self.phase != Phase::Day {
                    return Err(GameError::rejected("votes are only cast during the day"));
                }
                if self.actions.voted_today {
                    return Err(GameError::rejected("already voted today"));
                }
                self.living_target(target, &me, false)?;
                self.actions.voted_today = true;
                ActionOutcome::Submitted { call: LedgerAction::Vote { target } }
            }
            night_action => {
                require_alive(&me)?;
                self.check_night_turn(&night_action, &me)?;
                let outcome = self.resolve_night_action(night_action, &me)?;
                self.actions.acted_this_turn = true;
                outcome
            }
        };

        info!("[GameEngine] Protagonist action accepted: {:?}", action);
        if let ActionOutcome::Submitted { call } = &outcome {
            self.ledger_outbox.push(call.clone());
            self.actions.awaiting_ack = Some(call.clone());
        }
        Ok(outcome)
    }

    /// Ledger answer for a call queued by `take_action`.
    ///
    /// Failures are logged and end the wait the same way a receipt does. If the turn clock ran
    /// out while waiting, the held advancement happens now.
    pub fn acknowledge_action(
        &mut self,
        call: &LedgerAction,
        result: &Result<Receipt, LedgerError>,
    ) -> Result<(), GameError> {
        match result {
            Ok(receipt) => info!("[GameEngine] Ledger confirmed {} tx={}", call.kind(), receipt.tx_hash),
            Err(e) => warn!("[GameEngine] Ledger failed {}: {}", call.kind(), e),
        }
        if self.actions.awaiting_ack.as_ref() != Some(call) {
            return Ok(());
        }
        self.actions.awaiting_ack = None;
        if std::mem::take(&mut self.actions.expiry_deferred) {
            self.on_clock_expired()?;
        }
        Ok(())
    }

    fn check_night_turn(&self, action: &PlayerAction, me: &Player) -> Result<(), GameError> {
        let Some(current) = self.night_turn() else {
            return Err(GameError::rejected("no night turn in progress"));
        };
        let Some(required) = action.night_turn() else {
            return Err(GameError::rejected("not a night action"));
        };
        if current != required {
            return Err(GameError::rejected(format!("it is the {current}'s turn")));
        }
        if me.role.night_turn() != Some(required) {
            return Err(GameError::rejected(format!("only the {required} can act now")));
        }
        if self.actions.acted_this_turn {
            return Err(GameError::rejected("already acted this turn"));
        }
        Ok(())
    }

    fn resolve_night_action(&mut self, action: PlayerAction, me: &Player) -> Result<ActionOutcome, GameError> {
        match action {
            PlayerAction::Protect { target } => {
                self.living_target(target, me, true)?;
                self.roster.set_protection(target, true);
                Ok(ActionOutcome::Protected { target })
            }
            PlayerAction::Inspect { target } => {
                let role = self.living_target(target, me, false)?.role;
                Ok(ActionOutcome::Revealed { target, role })
            }
            PlayerAction::Kill { target } => {
                self.living_target(target, me, false)?;
                Ok(ActionOutcome::Submitted { call: LedgerAction::NightAction { target } })
            }
            PlayerAction::Pair { first, second } => {
                if first == second {
                    return Err(GameError::rejected("lovers must be two different players"));
                }
                self.living_target(first, me, true)?;
                self.living_target(second, me, true)?;
                Ok(ActionOutcome::Submitted {
                    call: LedgerAction::CupidAction { lover1: first, lover2: second },
                })
            }
            PlayerAction::Vote { .. } | PlayerAction::Revenge { .. } => {
                Err(GameError::rejected("not a night action"))
            }
        }
    }

    fn living_target(&self, target: PlayerId, me: &Player, allow_self: bool) -> Result<&Player, GameError> {
        if !allow_self && target == me.id {
            return Err(GameError::rejected("cannot target yourself"));
        }
        let player = self
            .roster
            .get(target)
            .ok_or_else(|| GameError::rejected(format!("unknown player {target}")))?;
        if !player.is_alive() {
            return Err(GameError::rejected(format!("{} is already dead", player.name)));
        }
        Ok(player)
    }
}

fn require_alive(me: &Player) -> Result<(), GameError> {
    if me.is_alive() {
        Ok(())
    } else {
        Err(GameError::rejected("dead players cannot act"))
    }
}

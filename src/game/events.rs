//! Popup events and the FIFO queue they are displayed from.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::game::error::GameError;
use crate::game::types::{NightTurn, Player, PlayerId, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    Turn,
    Death,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    Turn {
        turn: NightTurn,
    },
    #[serde(rename_all = "camelCase")]
    Death {
        player_id: PlayerId,
        player_name: String,
        role: Role,
        is_self: bool,
    },
    #[serde(rename_all = "camelCase")]
    GameOver {
        is_village_win: bool,
    },
}

impl GameEvent {
    pub fn death(player: &Player) -> Self {
        GameEvent::Death {
            player_id: player.id,
            player_name: player.name.clone(),
            role: player.role,
            is_self: player.is_player,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::Turn { .. } => EventKind::Turn,
            GameEvent::Death { .. } => EventKind::Death,
            GameEvent::GameOver { .. } => EventKind::GameOver,
        }
    }

    pub fn title(&self) -> String {
        match self {
            GameEvent::Turn { turn } => format!("{}'s Turn", turn.title()),
            GameEvent::Death { is_self: true, .. } => "You Have Died!".to_string(),
            GameEvent::Death { role: Role::Werewolf, .. } => "A Werewolf Has Died!".to_string(),
            GameEvent::Death { .. } => "A Villager Has Died!".to_string(),
            GameEvent::GameOver { is_village_win: true } => "Victory!".to_string(),
            GameEvent::GameOver { is_village_win: false } => "Defeat!".to_string(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            GameEvent::Turn { turn } => format!("It is now the {turn}'s turn to act."),
            GameEvent::Death { is_self: true, role, .. } => {
                format!("You were a {role}. Your journey ends here!")
            }
            GameEvent::Death { player_name, .. } => {
                format!("{player_name} has been eliminated from the game.")
            }
            GameEvent::GameOver { is_village_win: true } => {
                "All werewolves have been eliminated. The village is safe!".to_string()
            }
            GameEvent::GameOver { is_village_win: false } => {
                "The werewolves have taken over the village...".to_string()
            }
        }
    }
}

/// What the display layer renders for the popup at the head of the queue.
#[derive(Debug, Clone, Serialize)]
pub struct PopupView {
    pub kind: EventKind,
    pub title: String,
    pub message: String,
    pub event: GameEvent,
}

impl From<&GameEvent> for PopupView {
    fn from(event: &GameEvent) -> Self {
        Self {
            kind: event.kind(),
            title: event.title(),
            message: event.message(),
            event: event.clone(),
        }
    }
}

/// Popups are shown one at a time, oldest first.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    pub fn peek_front(&self) -> Option<&GameEvent> {
        self.events.front()
    }

    /// Remove and return the head. Callers should check `is_empty` first.
    pub fn close_front(&mut self) -> Result<GameEvent, GameError> {
        self.events.pop_front().ok_or(GameError::EmptyQueue)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }
}

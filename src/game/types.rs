use std::fmt;

use serde::{Deserialize, Serialize};

pub type PlayerId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Villager,
    Werewolf,
    Seer,
    Witch,
    Hunter,
    Guard,
    Cupid,
}

impl Role {
    /// Display order of the role cards.
    pub const ALL: [Role; 7] = [
        Role::Cupid,
        Role::Guard,
        Role::Seer,
        Role::Hunter,
        Role::Werewolf,
        Role::Witch,
        Role::Villager,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Villager => "villager",
            Role::Werewolf => "werewolf",
            Role::Seer => "seer",
            Role::Witch => "witch",
            Role::Hunter => "hunter",
            Role::Guard => "guard",
            Role::Cupid => "cupid",
        }
    }

    /// The night turn this role acts in, if any.
    pub fn night_turn(&self) -> Option<NightTurn> {
        match self {
            Role::Cupid => Some(NightTurn::Cupid),
            Role::Guard => Some(NightTurn::Guard),
            Role::Seer => Some(NightTurn::Seer),
            Role::Werewolf => Some(NightTurn::Werewolf),
            Role::Witch => Some(NightTurn::Witch),
            Role::Villager | Role::Hunter => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roles that act during the night, in no particular order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NightTurn {
    Cupid,
    Guard,
    Seer,
    Werewolf,
    Witch,
}

impl NightTurn {
    pub fn as_str(&self) -> &'static str {
        match self {
            NightTurn::Cupid => "cupid",
            NightTurn::Guard => "guard",
            NightTurn::Seer => "seer",
            NightTurn::Werewolf => "werewolf",
            NightTurn::Witch => "witch",
        }
    }

    /// Capitalized name used in popup titles ("Seer's Turn").
    pub fn title(&self) -> &'static str {
        match self {
            NightTurn::Cupid => "Cupid",
            NightTurn::Guard => "Guard",
            NightTurn::Seer => "Seer",
            NightTurn::Werewolf => "Werewolf",
            NightTurn::Witch => "Witch",
        }
    }
}

impl fmt::Display for NightTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whose turn it is. `Day` is the sentinel used for the whole day phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    Night(NightTurn),
    Day,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Night,
    Day,
}

/// Before the first night the protagonist sees their role and may rename themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    PreGame,
    InProgress,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    Alive,
    Dead,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
    pub status: PlayerStatus,
    pub is_protected: bool,
    pub has_death_popup_shown: bool,
    pub is_player: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: String, role: Role, is_player: bool) -> Self {
        Self {
            id,
            name,
            role,
            status: PlayerStatus::Alive,
            is_protected: false,
            has_death_popup_shown: false,
            is_player,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.status == PlayerStatus::Alive
    }
}

/// Seat description used to build a roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub is_player: bool,
}

impl PlayerSpec {
    pub fn new(name: &str, role: Role) -> Self {
        Self { name: name.to_string(), role, is_player: false }
    }

    pub fn protagonist(name: &str, role: Role) -> Self {
        Self { name: name.to_string(), role, is_player: true }
    }
}

/// Phase/turn state of a running game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamePhase {
    pub phase: Phase,
    pub day: u32,
    pub time_left: u32,
    pub current_turn: Option<Turn>,
}

impl GamePhase {
    /// The acting night role, if the night has assigned one.
    pub fn night_turn(&self) -> Option<NightTurn> {
        match self.current_turn {
            Some(Turn::Night(turn)) => Some(turn),
            _ => None,
        }
    }
}
